//! Ticket, user, and inbound event schema.
//!
//! The ticketing platform's JSON is modelled with explicit optional fields
//! rather than dynamic value poking: the webhook payload is deserialized into
//! `TicketEvent` and validated before any nested field is touched.

use serde::{Deserialize, Serialize};

use super::ids::{TicketId, UserId};

/// Channel tag for tickets that originated from a phone call.
pub const VOICE_CHANNEL: &str = "voice";

/// A ticket snapshot from the ticketing platform.
///
/// Fetched fresh per invocation and never cached; the reconciler only reads
/// the fields it gates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,

    /// The user attributed as the originator of the ticket. The platform
    /// auto-creates this user on ticket intake if the caller is unknown.
    pub requester_id: UserId,

    /// Intake channel metadata. Absent on some API responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<Via>,
}

impl Ticket {
    /// Returns the intake channel tag, if present.
    pub fn channel(&self) -> Option<&str> {
        self.via.as_ref().and_then(|via| via.channel.as_deref())
    }

    /// Returns true if this ticket originated from a phone call.
    pub fn is_voice(&self) -> bool {
        self.channel() == Some(VOICE_CHANNEL)
    }

    /// Returns the raw caller phone from the origin descriptor.
    ///
    /// Prefers the `phone` sub-field and falls back to `address`, which is
    /// where the platform puts the caller number on some voice integrations.
    /// Empty strings count as absent, so an empty `phone` still falls back
    /// to `address`.
    pub fn caller_phone(&self) -> Option<&str> {
        let from = self
            .via
            .as_ref()
            .and_then(|via| via.source.as_ref())
            .and_then(|source| source.from.as_ref())?;
        from.phone
            .as_deref()
            .filter(|phone| !phone.is_empty())
            .or(from.address.as_deref().filter(|address| !address.is_empty()))
    }
}

/// Intake channel metadata on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Via {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ViaSource>,
}

/// Origin descriptor nested under `via`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<CallerRef>,
}

/// Caller reference inside the origin descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// A user record on the ticketing platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The inbound ticket-created webhook payload.
///
/// Two payload shapes are in the wild and both are permanently supported:
/// some deployments deliver only the ticket identifier (the reconciler then
/// fetches the full ticket), others deliver the full ticket inline. Every
/// field is optional; validation happens in the reconciler, which returns a
/// typed error for a payload carrying no identifier at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TicketEvent {
    #[serde(default)]
    pub id: Option<TicketId>,

    #[serde(default)]
    pub requester_id: Option<UserId>,

    #[serde(default)]
    pub via: Option<Via>,
}

impl TicketEvent {
    /// Converts an inline-ticket payload into a full `Ticket`.
    ///
    /// Returns `None` for the bare-identifier variant: a payload only counts
    /// as inline when it carries the identifier, the requester, and the
    /// channel metadata the reconciler gates on. Anything less falls back to
    /// a fresh fetch.
    pub fn into_inline_ticket(self) -> Option<Ticket> {
        match (self.id, self.requester_id, self.via) {
            (Some(id), Some(requester_id), Some(via)) => Some(Ticket {
                id,
                requester_id,
                via: Some(via),
            }),
            _ => None,
        }
    }
}
