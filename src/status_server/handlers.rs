//! Report handler.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error_handling::ErrorEnvelope;
use crate::HealthChecker;

/// Runs one health check and returns its report.
pub async fn report_handler(State(checker): State<Arc<HealthChecker>>) -> Response {
    match checker.run().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            log::error!("Health check failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorEnvelope::from_run_error(&e)),
            )
                .into_response()
        }
    }
}
