//! HTTP API server

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, StatusCode, Uri},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::{Config, Service};

pub mod employees;
pub mod state;
pub mod transit;

pub use state::AppState;

/// Build the router for one registry. Every response, errors and preflight
/// included, carries the permissive CORS headers.
pub fn router(service: Service, state: AppState) -> Router {
    let routes = match service {
        Service::Employees => employees::routes(),
        Service::Transit => transit::routes(),
    };

    routes
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `OPTIONS` on any path: 200 with an empty body.
pub(crate) async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Id for single-row lookups: whatever follows the last `/`, possibly empty.
pub(crate) fn last_segment(uri: &Uri) -> &str {
    uri.path().rsplit('/').next().unwrap_or_default()
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(cfg: &Config, state: AppState) -> anyhow::Result<()> {
    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    info!(service = %cfg.service, %addr, "listening for HTTP traffic");

    axum::serve(listener, router(cfg.service, state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_segment_keeps_trailing_empty_id() {
        let cases = [
            ("/employees/5", "5"),
            ("/employees/5/", ""),
            ("/employees/", ""),
            ("/buses/a/7?x=1", "7"),
        ];
        for (path, id) in cases {
            let uri: Uri = path.parse().unwrap();
            assert_eq!(last_segment(&uri), id, "{path}");
        }
    }
}
