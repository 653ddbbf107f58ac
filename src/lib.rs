//! Zendesk Phone Reconciler - a webhook service that enriches voice tickets.
//!
//! When the ticketing platform delivers a ticket-created event, this service
//! checks whether the ticket arrived over the voice channel, normalizes the
//! caller's phone number to E.164, reconciles it against existing users, and
//! writes the requester and phone enrichment back to the ticket.

pub mod config;
pub mod phone;
pub mod reconciler;
pub mod server;
pub mod types;
pub mod zendesk;
