//! HTTP serving layer.
//!
//! Provides two equivalent endpoints:
//! - `/health`
//! - `/healthchecker`
//!
//! Each request runs one health check and answers `200` with the report, or
//! `500` with the error envelope when the run fails. All requests share one
//! [`HealthChecker`], so the aggregated-platform cache outlives a request.

mod handlers;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::HealthChecker;
use handlers::report_handler;

/// Builds the router serving reports from `checker`.
pub fn router(checker: Arc<HealthChecker>) -> Router {
    Router::new()
        .route("/health", get(report_handler))
        .route("/healthchecker", get(report_handler))
        .with_state(checker)
}

/// Serves reports on an already bound listener until the server stops.
pub async fn serve(listener: TcpListener, checker: Arc<HealthChecker>) -> Result<(), anyhow::Error> {
    axum::serve(listener, router(checker))
        .await
        .map_err(|e| anyhow::anyhow!("Status server error: {}", e))
}

/// Binds `127.0.0.1:<port>` and serves reports.
pub async fn start_status_server(port: u16, checker: Arc<HealthChecker>) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind status server to port {}: {}", port, e))?;

    log::info!("Status server listening on http://127.0.0.1:{}/", port);
    log::info!("  - Report: http://127.0.0.1:{}/health", port);
    log::info!("  - Report: http://127.0.0.1:{}/healthchecker", port);

    serve(listener, checker).await
}
