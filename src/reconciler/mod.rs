//! The ticket reconciliation procedure.
//!
//! One stateless operation, invoked once per inbound webhook delivery: given
//! a ticket-created event, decide whether the ticket came in over the voice
//! channel, normalize the caller's phone number, reconcile it against
//! existing users, and write the enrichment back to the ticket.
//!
//! The control flow is a strictly sequential chain of at most four outbound
//! calls, gated by two conditionals:
//!
//! 1. Resolve the full ticket (fetch by id unless the payload is inline).
//! 2. Gate: not a voice ticket → skip.
//! 3. Gate: no extractable caller phone → skip.
//! 4. Normalize the phone to E.164.
//! 5. Search for an existing user with that phone. Found → that user becomes
//!    the requester. Not found → write the phone onto the auto-created
//!    requester.
//! 6. Update the ticket with the final requester and the phone custom field.
//!
//! Outbound failures after the resolve step are soft: logged, degraded to a
//! best-effort default, and the procedure continues. The only hard failures
//! are a payload without a ticket identifier and a ticket that cannot be
//! fetched.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::phone::{self, PhoneNumber};
use crate::types::{Ticket, TicketEvent, TicketId, UserId};
use crate::zendesk::TicketingApi;

#[cfg(test)]
mod tests;

/// Why the reconciler declined to touch a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The ticket did not arrive over the voice channel.
    NotVoice,
    /// The origin descriptor carries no caller phone.
    NoPhone,
}

/// The result of a completed reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The ticket was left untouched; zero outbound writes were issued.
    Skipped(SkipReason),

    /// The ticket was enriched.
    Updated {
        ticket: TicketId,
        /// The final requester: either a matched existing user or the
        /// platform's auto-created requester.
        requester: UserId,
        phone: PhoneNumber,
    },
}

/// Hard failures that abort the whole procedure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The webhook payload carries neither a ticket identifier nor an inline
    /// ticket.
    #[error("no ticket ID provided")]
    MissingTicketId,

    /// The ticket could not be fetched from the platform (absent, or the
    /// fetch call itself failed).
    #[error("could not fetch ticket {0}")]
    TicketNotFound(TicketId),
}

/// Processes one ticket-created event.
///
/// Idempotent with respect to the external platform: re-running it for the
/// same ticket re-derives the same requester and phone and issues the same
/// writes. Concurrent deliveries for the same ticket are not guarded against.
pub async fn process_ticket_created<T: TicketingApi>(
    api: &T,
    event: TicketEvent,
) -> Result<ReconcileOutcome, ReconcileError> {
    let ticket = resolve_ticket(api, event).await?;

    if !ticket.is_voice() {
        debug!(
            ticket = %ticket.id,
            channel = ticket.channel().unwrap_or("<none>"),
            "not a voice ticket, skipping"
        );
        return Ok(ReconcileOutcome::Skipped(SkipReason::NotVoice));
    }

    let Some(normalized) = ticket.caller_phone().and_then(phone::normalize) else {
        debug!(ticket = %ticket.id, "no caller phone in origin descriptor, skipping");
        return Ok(ReconcileOutcome::Skipped(SkipReason::NoPhone));
    };

    info!(ticket = %ticket.id, phone = %normalized, "processing voice ticket");

    // Soft failure: a failed search is treated as "no existing user" and the
    // procedure falls through to the update-requester branch.
    let existing = match api.search_user_by_phone(&normalized).await {
        Ok(user) => user,
        Err(error) => {
            warn!(
                ticket = %ticket.id,
                status = ?error.status(),
                %error,
                "user search failed, treating as no match"
            );
            None
        }
    };

    let requester = match existing {
        Some(user) => {
            info!(ticket = %ticket.id, user = %user.id, "matched existing user by phone");
            user.id
        }
        None => {
            // The platform auto-created the requester on ticket intake; give
            // that user the normalized phone so future calls match.
            if let Err(error) = api.update_user_phone(ticket.requester_id, &normalized).await {
                warn!(
                    ticket = %ticket.id,
                    user = %ticket.requester_id,
                    %error,
                    "failed to update requester phone"
                );
            }
            ticket.requester_id
        }
    };

    if let Err(error) = api.update_ticket(ticket.id, requester, &normalized).await {
        warn!(ticket = %ticket.id, %error, "failed to update ticket");
    }

    info!(
        ticket = %ticket.id,
        requester = %requester,
        phone = %normalized,
        "ticket reconciled"
    );

    Ok(ReconcileOutcome::Updated {
        ticket: ticket.id,
        requester,
        phone: normalized,
    })
}

/// Resolves the full ticket from either payload variant.
///
/// Inline payloads are used directly; bare-identifier payloads trigger a
/// fetch. A fetch call failure is folded into `TicketNotFound`: the original
/// caller cannot distinguish "no such ticket" from "could not ask".
async fn resolve_ticket<T: TicketingApi>(
    api: &T,
    event: TicketEvent,
) -> Result<Ticket, ReconcileError> {
    let Some(id) = event.id else {
        return Err(ReconcileError::MissingTicketId);
    };

    if let Some(ticket) = event.into_inline_ticket() {
        debug!(ticket = %id, "using inline ticket payload");
        return Ok(ticket);
    }

    debug!(ticket = %id, "fetching ticket");
    match api.fetch_ticket(id).await {
        Ok(Some(ticket)) => Ok(ticket),
        Ok(None) => Err(ReconcileError::TicketNotFound(id)),
        Err(error) => {
            warn!(ticket = %id, status = ?error.status(), %error, "ticket fetch failed");
            Err(ReconcileError::TicketNotFound(id))
        }
    }
}
