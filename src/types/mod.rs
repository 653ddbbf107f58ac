//! Core domain types for the phone reconciler.
//!
//! This module contains the identifier newtypes and the typed schema for
//! tickets, users, and the inbound webhook event.

pub mod ids;
pub mod ticket;

// Re-export commonly used types at the module level
pub use ids::{CustomFieldId, TicketId, UserId};
pub use ticket::{CallerRef, Ticket, TicketEvent, User, Via, ViaSource, VOICE_CHANNEL};
