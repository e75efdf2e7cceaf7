use super::row::row_to_json;
use crate::config::Database;
use crate::model::{NewBooking, NewEmployee};
use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions,
    SqliteSynchronous,
};
use sqlx::{Connection, Row, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};

pub type Pool = SqlitePool;
pub type Conn = PoolConnection<Sqlite>;

/// Build the connection pool every request checks a connection out of.
pub async fn init_pool(cfg: &Database) -> Result<Pool> {
    let url = prepare_sqlite_url(&cfg.url);
    let in_memory = is_memory_url(&url);

    let mut options = SqliteConnectOptions::from_str(&url)
        .with_context(|| format!("invalid database url {url}"))?
        .create_if_missing(true)
        .foreign_keys(true);
    if !in_memory {
        // Enable WAL and stricter durability.
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full);
    }

    let mut pool_options = SqlitePoolOptions::new().max_connections(cfg.max_connections);
    if in_memory {
        // An in-memory database lives only as long as one of its connections.
        pool_options = pool_options
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open database {url}"))?;
    debug!(%url, max_connections = cfg.max_connections, "database pool ready");
    Ok(pool)
}

fn is_memory_url(url: &str) -> bool {
    url.starts_with("sqlite::memory") || url.contains("mode=memory")
}

/// If using a file-backed SQLite URL, expand a leading `~/` and ensure the parent
/// directory exists. Leaves in-memory URLs untouched. Returns possibly-updated URL.
fn prepare_sqlite_url(url: &str) -> String {
    let Some(rest) = url.strip_prefix("sqlite:") else {
        return url.to_string();
    };
    if is_memory_url(url) {
        return url.to_string();
    }

    let path_with_query = rest.strip_prefix("//").unwrap_or(rest);
    let (path_part, query_part) = match path_with_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_with_query, None),
    };
    if path_part.is_empty() {
        return url.to_string();
    }

    let expanded_path = match (path_part.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => format!("{}/{}", home.trim_end_matches('/'), rest),
        _ => path_part.to_string(),
    };

    if let Some(parent) = std::path::Path::new(&expanded_path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    match query_part {
        Some(q) => format!("sqlite://{expanded_path}?{q}"),
        None => format!("sqlite://{expanded_path}"),
    }
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// `id` is bound as text, the way it arrives in the URL; the engine applies
/// the key column's integer affinity, so text that is not a number matches nothing.
async fn fetch_by_id(
    conn: &mut SqliteConnection,
    sql: &str,
    id: &str,
) -> Result<Option<Value>, sqlx::Error> {
    let row = sqlx::query(sql).bind(id).fetch_optional(&mut *conn).await?;
    row.as_ref().map(row_to_json).transpose()
}

async fn fetch_all(conn: &mut SqliteConnection, sql: &str) -> Result<Vec<Value>, sqlx::Error> {
    let rows = sqlx::query(sql).fetch_all(&mut *conn).await?;
    rows.iter().map(row_to_json).collect()
}

#[instrument(skip_all)]
pub async fn list_employees(conn: &mut SqliteConnection) -> Result<Vec<Value>, sqlx::Error> {
    fetch_all(conn, "SELECT * FROM employees").await
}

#[instrument(skip(conn))]
pub async fn fetch_employee(
    conn: &mut SqliteConnection,
    employee_id: &str,
) -> Result<Option<Value>, sqlx::Error> {
    fetch_by_id(conn, "SELECT * FROM employees WHERE employee_id = ?", employee_id).await
}

/// Insert one employee and commit before returning the new `employee_id`.
#[instrument(skip_all)]
pub async fn insert_employee(
    conn: &mut SqliteConnection,
    employee: &NewEmployee,
) -> Result<i64, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let id: i64 = sqlx::query(
        "INSERT INTO employees \
         (first_name, last_name, email, phone_number, hire_date, job_id, salary, manager_id, department_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING employee_id",
    )
    .bind(&employee.first_name)
    .bind(&employee.last_name)
    .bind(&employee.email)
    .bind(employee.phone_number.as_deref())
    .bind(employee.hire_date)
    .bind(&employee.job_id)
    .bind(employee.salary)
    .bind(employee.manager_id)
    .bind(employee.department_id)
    .fetch_one(&mut *tx)
    .await?
    .get("employee_id");
    tx.commit().await?;
    Ok(id)
}

#[instrument(skip_all)]
pub async fn list_buses(conn: &mut SqliteConnection) -> Result<Vec<Value>, sqlx::Error> {
    fetch_all(conn, "SELECT * FROM buses").await
}

#[instrument(skip(conn))]
pub async fn fetch_bus(
    conn: &mut SqliteConnection,
    bus_id: &str,
) -> Result<Option<Value>, sqlx::Error> {
    fetch_by_id(conn, "SELECT * FROM buses WHERE bus_id = ?", bus_id).await
}

#[instrument(skip(conn))]
pub async fn fetch_route(
    conn: &mut SqliteConnection,
    route_id: &str,
) -> Result<Option<Value>, sqlx::Error> {
    fetch_by_id(conn, "SELECT * FROM routes WHERE route_id = ?", route_id).await
}

/// Insert one booking and commit before returning the new `booking_id`.
#[instrument(skip_all)]
pub async fn insert_booking(
    conn: &mut SqliteConnection,
    booking: &NewBooking,
) -> Result<i64, sqlx::Error> {
    let mut tx = conn.begin().await?;
    let id: i64 = sqlx::query(
        "INSERT INTO bookings (passenger_id, schedule_id, seats_booked, total_amount) \
         VALUES (?, ?, ?, ?) RETURNING booking_id",
    )
    .bind(booking.passenger_id)
    .bind(booking.schedule_id)
    .bind(booking.seats_booked)
    .bind(booking.total_amount)
    .fetch_one(&mut *tx)
    .await?
    .get("booking_id");
    tx.commit().await?;
    Ok(id)
}
