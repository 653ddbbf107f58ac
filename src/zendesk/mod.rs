//! Outbound Zendesk API integration.
//!
//! This module provides:
//! - [`TicketingApi`], the trait describing the four operations the
//!   reconciler needs from the ticketing platform
//! - [`ZendeskClient`], the reqwest-based implementation against the real
//!   Zendesk REST API
//!
//! The trait-based seam enables mock implementations for reconciler tests.

use std::future::Future;

pub mod client;
pub mod error;

pub use client::ZendeskClient;
pub use error::ZendeskApiError;

use crate::phone::PhoneNumber;
use crate::types::{Ticket, TicketId, User, UserId};

/// The ticketing-platform operations the reconciler depends on.
///
/// All four calls are fire-and-forget from the reconciler's point of view:
/// results are reported to the webhook caller, never retried internally.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct MockApi {
///     ticket: Option<Ticket>,
/// }
///
/// impl TicketingApi for MockApi {
///     async fn fetch_ticket(&self, _: TicketId) -> Result<Option<Ticket>, ZendeskApiError> {
///         Ok(self.ticket.clone())
///     }
///     // ...
/// }
/// ```
pub trait TicketingApi {
    /// Fetches a ticket by identifier. `Ok(None)` means the platform has no
    /// such ticket (HTTP 404).
    fn fetch_ticket(
        &self,
        ticket: TicketId,
    ) -> impl Future<Output = Result<Option<Ticket>, ZendeskApiError>> + Send;

    /// Searches for an existing user whose phone attribute matches the
    /// normalized number. Returns the first match, if any.
    fn search_user_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> impl Future<Output = Result<Option<User>, ZendeskApiError>> + Send;

    /// Sets a user's phone attribute to the normalized number.
    fn update_user_phone(
        &self,
        user: UserId,
        phone: &PhoneNumber,
    ) -> impl Future<Output = Result<(), ZendeskApiError>> + Send;

    /// Sets a ticket's requester and writes the normalized phone into the
    /// configured custom field.
    fn update_ticket(
        &self,
        ticket: TicketId,
        requester: UserId,
        phone: &PhoneNumber,
    ) -> impl Future<Output = Result<(), ZendeskApiError>> + Send;
}
