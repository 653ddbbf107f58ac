//! HTTP server for the phone reconciler.
//!
//! This module implements the HTTP surface around the reconciler:
//! - Accepts ticket-created webhooks and runs the reconciliation procedure
//! - Provides a health check for liveness probes
//! - Provides a root endpoint with service metadata
//!
//! # Endpoints
//!
//! - `POST /webhook/ticket-created` - Accepts ticket-created events
//! - `GET /health` - Returns 200 with a health payload
//! - `GET /` - Returns service metadata and the endpoint listing

use std::sync::Arc;

pub mod health;
pub mod meta;
pub mod shutdown;
pub mod webhook;

pub use health::health_handler;
pub use meta::meta_handler;
pub use shutdown::{serve, DRAIN_DEADLINE};
pub use webhook::webhook_handler;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::zendesk::{TicketingApi, ZendeskClient};

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor. It holds the
/// ticketing client; generic over the `TicketingApi` implementation so router
/// tests can run against a stub.
pub struct AppState<T = ZendeskClient> {
    inner: Arc<T>,
}

impl<T> AppState<T> {
    /// Creates a new `AppState` around a ticketing client.
    pub fn new(api: T) -> Self {
        AppState {
            inner: Arc::new(api),
        }
    }

    /// Returns the ticketing client.
    pub fn api(&self) -> &T {
        &self.inner
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builds the axum Router with all endpoints.
///
/// Every request is logged by the tracing layer (method, path, status).
pub fn build_router<T>(state: AppState<T>) -> Router
where
    T: TicketingApi + Send + Sync + 'static,
{
    Router::new()
        .route("/webhook/ticket-created", post(webhook_handler::<T>))
        .route("/health", get(health_handler))
        .route("/", get(meta_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
