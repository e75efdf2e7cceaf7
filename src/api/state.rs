//! Shared handler state.

use crate::db::{Conn, Pool};

/// Cloned into every handler. Holds only the pool; configuration stays in `main`.
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
}

impl AppState {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Check out the connection a single request runs on. It returns to the
    /// pool when dropped, on every exit path.
    pub async fn acquire(&self) -> Result<Conn, sqlx::Error> {
        self.pool.acquire().await
    }
}
