//! Health check endpoint.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server is running.
    pub status: &'static str,
    /// Server time at the moment of the check.
    pub timestamp: chrono::DateTime<Utc>,
}

/// Liveness health check.
///
/// Unauthenticated and unconditional; does not touch dependencies.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
