//! Webhook endpoint handler.
//!
//! Accepts ticket-created deliveries and runs the reconciler synchronously:
//! the response reports the reconciliation outcome, and the webhook sender
//! owns any redelivery policy. Inbound requests are not authenticated.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::phone::PhoneNumber;
use crate::reconciler::{process_ticket_created, ReconcileError, ReconcileOutcome, SkipReason};
use crate::types::{TicketEvent, TicketId, UserId};
use crate::zendesk::TicketingApi;

use super::AppState;

/// Errors that turn into non-200 webhook responses.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request body is not valid JSON for a ticket-created event.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The payload carries neither a ticket identifier nor an inline ticket.
    #[error("No ticket ID provided")]
    MissingTicketId,

    /// The ticket could not be fetched from the platform.
    #[error("Could not fetch ticket details")]
    TicketNotFound { ticket: TicketId },
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::InvalidJson(_) | WebhookError::MissingTicketId => {
                StatusCode::BAD_REQUEST
            }
            WebhookError::TicketNotFound { .. } => StatusCode::NOT_FOUND,
        };

        match &self {
            WebhookError::TicketNotFound { ticket } => {
                warn!(status = %status, ticket = %ticket, error = %self, "webhook request failed");
            }
            _ => warn!(status = %status, error = %self, "webhook request failed"),
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Successful reconciliation response body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReconcileResponse {
    success: bool,
    message: &'static str,
    ticket_id: TicketId,
    requester_id: UserId,
    phone: PhoneNumber,
}

/// No-op response body for skipped tickets.
#[derive(Serialize)]
struct SkipResponse {
    message: &'static str,
}

/// Ticket-created webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Body: JSON ticket-created event. Either a bare identifier
///   (`{"id": 101}`) or a full inline ticket object; both shapes are
///   permanently supported.
///
/// # Response
///
/// - 200: reconciled (`{"success":true,...}`) or skipped (`{"message":...}`)
/// - 400: malformed body or missing ticket identifier
/// - 404: ticket could not be fetched
pub async fn webhook_handler<T>(
    State(state): State<AppState<T>>,
    body: Bytes,
) -> Result<Response, WebhookError>
where
    T: TicketingApi + Send + Sync + 'static,
{
    let event: TicketEvent = serde_json::from_slice(&body)?;

    info!(ticket = ?event.id, "received ticket-created webhook");

    match process_ticket_created(state.api(), event).await {
        Ok(ReconcileOutcome::Updated {
            ticket,
            requester,
            phone,
        }) => Ok(Json(ReconcileResponse {
            success: true,
            message: "Ticket processed successfully",
            ticket_id: ticket,
            requester_id: requester,
            phone,
        })
        .into_response()),

        Ok(ReconcileOutcome::Skipped(SkipReason::NotVoice)) => Ok(Json(SkipResponse {
            message: "Not a voice ticket, skipped",
        })
        .into_response()),

        Ok(ReconcileOutcome::Skipped(SkipReason::NoPhone)) => Ok(Json(SkipResponse {
            message: "No phone number found",
        })
        .into_response()),

        Err(ReconcileError::MissingTicketId) => Err(WebhookError::MissingTicketId),
        Err(ReconcileError::TicketNotFound(id)) => {
            Err(WebhookError::TicketNotFound { ticket: id })
        }
    }
}
