//! Health check endpoint for liveness probes.
//!
//! Returns 200 OK with a small JSON payload. Intended for load balancers and
//! orchestration systems.

use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Service name reported by the health and root endpoints.
pub const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    service: &'static str,
}

/// Health check handler.
///
/// # Example
///
/// ```ignore
/// GET /health HTTP/1.1
///
/// HTTP/1.1 200 OK
/// {"status":"healthy","timestamp":"2026-08-25T12:00:00+00:00","service":"zendesk-phone-reconciler"}
/// ```
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        service: SERVICE_NAME,
    })
}
