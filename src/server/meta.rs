//! Root endpoint: service metadata and endpoint listing.

use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use super::health::SERVICE_NAME;

#[derive(Serialize)]
struct ServiceMeta {
    service: &'static str,
    version: &'static str,
    endpoints: Endpoints,
}

#[derive(Serialize)]
struct Endpoints {
    webhook: &'static str,
    health: &'static str,
}

/// Root handler: returns service metadata and the endpoint listing.
pub async fn meta_handler() -> impl IntoResponse {
    Json(ServiceMeta {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            webhook: "POST /webhook/ticket-created",
            health: "GET /health",
        },
    })
}
