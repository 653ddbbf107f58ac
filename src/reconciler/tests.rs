//! Reconciler tests against a recording mock of the ticketing API.

use std::sync::Mutex;

use super::*;
use crate::types::{CallerRef, User, Via, ViaSource};
use crate::zendesk::ZendeskApiError;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    FetchTicket(TicketId),
    SearchUser(String),
    UpdateUserPhone(UserId, String),
    UpdateTicket(TicketId, UserId, String),
}

/// Mock ticketing API with scripted responses and a call recorder.
#[derive(Default)]
struct MockApi {
    ticket: Option<Ticket>,
    fetch_fails: bool,
    user: Option<User>,
    search_fails: bool,
    user_update_fails: bool,
    ticket_update_fails: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockApi {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that write to the platform (user or ticket updates).
    fn write_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(call, Call::UpdateUserPhone(..) | Call::UpdateTicket(..))
            })
            .collect()
    }
}

fn upstream_error(endpoint: &'static str) -> ZendeskApiError {
    ZendeskApiError::Status {
        endpoint,
        status: 500,
        body: "boom".to_string(),
    }
}

impl TicketingApi for MockApi {
    async fn fetch_ticket(&self, ticket: TicketId) -> Result<Option<Ticket>, ZendeskApiError> {
        self.record(Call::FetchTicket(ticket));
        if self.fetch_fails {
            return Err(upstream_error("tickets/show"));
        }
        Ok(self.ticket.clone())
    }

    async fn search_user_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<User>, ZendeskApiError> {
        self.record(Call::SearchUser(phone.to_string()));
        if self.search_fails {
            return Err(upstream_error("users/search"));
        }
        Ok(self.user.clone())
    }

    async fn update_user_phone(
        &self,
        user: UserId,
        phone: &PhoneNumber,
    ) -> Result<(), ZendeskApiError> {
        self.record(Call::UpdateUserPhone(user, phone.to_string()));
        if self.user_update_fails {
            return Err(upstream_error("users/update"));
        }
        Ok(())
    }

    async fn update_ticket(
        &self,
        ticket: TicketId,
        requester: UserId,
        phone: &PhoneNumber,
    ) -> Result<(), ZendeskApiError> {
        self.record(Call::UpdateTicket(ticket, requester, phone.to_string()));
        if self.ticket_update_fails {
            return Err(upstream_error("tickets/update"));
        }
        Ok(())
    }
}

// ─── Fixtures ─────────────────────────────────────────────────────────────────

fn voice_via(phone: Option<&str>, address: Option<&str>) -> Via {
    Via {
        channel: Some("voice".to_string()),
        source: Some(ViaSource {
            from: Some(CallerRef {
                phone: phone.map(str::to_string),
                address: address.map(str::to_string),
            }),
        }),
    }
}

fn voice_ticket(id: u64, requester: u64, phone: &str) -> Ticket {
    Ticket {
        id: TicketId(id),
        requester_id: UserId(requester),
        via: Some(voice_via(Some(phone), None)),
    }
}

fn bare_event(id: u64) -> TicketEvent {
    TicketEvent {
        id: Some(TicketId(id)),
        ..TicketEvent::default()
    }
}

// ─── Hard failures ────────────────────────────────────────────────────────────

#[tokio::test]
async fn event_without_id_is_rejected() {
    let api = MockApi::default();

    let result = process_ticket_created(&api, TicketEvent::default()).await;

    assert_eq!(result.unwrap_err(), ReconcileError::MissingTicketId);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn unknown_ticket_is_not_found() {
    let api = MockApi::default();

    let result = process_ticket_created(&api, bare_event(101)).await;

    assert_eq!(result.unwrap_err(), ReconcileError::TicketNotFound(TicketId(101)));
    assert_eq!(api.calls(), vec![Call::FetchTicket(TicketId(101))]);
}

#[tokio::test]
async fn fetch_failure_is_not_found() {
    let api = MockApi {
        fetch_fails: true,
        ..MockApi::default()
    };

    let result = process_ticket_created(&api, bare_event(101)).await;

    assert_eq!(result.unwrap_err(), ReconcileError::TicketNotFound(TicketId(101)));
}

// ─── Skip gates ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn non_voice_ticket_skips_without_writes() {
    let api = MockApi {
        ticket: Some(Ticket {
            id: TicketId(101),
            requester_id: UserId(555),
            via: Some(Via {
                channel: Some("email".to_string()),
                source: None,
            }),
        }),
        ..MockApi::default()
    };

    let outcome = process_ticket_created(&api, bare_event(101)).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Skipped(SkipReason::NotVoice));
    assert!(api.write_calls().is_empty());
}

#[tokio::test]
async fn ticket_without_channel_metadata_skips() {
    let api = MockApi {
        ticket: Some(Ticket {
            id: TicketId(101),
            requester_id: UserId(555),
            via: None,
        }),
        ..MockApi::default()
    };

    let outcome = process_ticket_created(&api, bare_event(101)).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Skipped(SkipReason::NotVoice));
}

#[tokio::test]
async fn voice_ticket_without_phone_skips_without_writes() {
    let api = MockApi {
        ticket: Some(Ticket {
            id: TicketId(101),
            requester_id: UserId(555),
            via: Some(voice_via(None, None)),
        }),
        ..MockApi::default()
    };

    let outcome = process_ticket_created(&api, bare_event(101)).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Skipped(SkipReason::NoPhone));
    assert!(api.write_calls().is_empty());
}

// ─── Reconciliation branches ──────────────────────────────────────────────────

#[tokio::test]
async fn matched_user_becomes_requester_without_user_mutation() {
    let api = MockApi {
        ticket: Some(voice_ticket(101, 555, "(303) 587-2087")),
        user: Some(User {
            id: UserId(999),
            phone: Some("+13035872087".to_string()),
        }),
        ..MockApi::default()
    };

    let outcome = process_ticket_created(&api, bare_event(101)).await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Updated {
            ticket: TicketId(101),
            requester: UserId(999),
            phone: PhoneNumber("+13035872087".to_string()),
        }
    );
    assert_eq!(
        api.write_calls(),
        vec![Call::UpdateTicket(
            TicketId(101),
            UserId(999),
            "+13035872087".to_string()
        )]
    );
}

#[tokio::test]
async fn unmatched_phone_updates_auto_created_requester() {
    let api = MockApi {
        ticket: Some(voice_ticket(101, 555, "3035872087")),
        user: None,
        ..MockApi::default()
    };

    let outcome = process_ticket_created(&api, bare_event(101)).await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Updated {
            ticket: TicketId(101),
            requester: UserId(555),
            phone: PhoneNumber("+13035872087".to_string()),
        }
    );
    assert_eq!(
        api.write_calls(),
        vec![
            Call::UpdateUserPhone(UserId(555), "+13035872087".to_string()),
            Call::UpdateTicket(TicketId(101), UserId(555), "+13035872087".to_string()),
        ]
    );
}

#[tokio::test]
async fn search_is_performed_with_the_normalized_number() {
    let api = MockApi {
        ticket: Some(voice_ticket(101, 555, "303-587-2087")),
        ..MockApi::default()
    };

    process_ticket_created(&api, bare_event(101)).await.unwrap();

    assert!(api
        .calls()
        .contains(&Call::SearchUser("+13035872087".to_string())));
}

#[tokio::test]
async fn caller_phone_falls_back_to_address_field() {
    let api = MockApi {
        ticket: Some(Ticket {
            id: TicketId(101),
            requester_id: UserId(555),
            via: Some(voice_via(None, Some("13035872087"))),
        }),
        ..MockApi::default()
    };

    let outcome = process_ticket_created(&api, bare_event(101)).await.unwrap();

    assert!(matches!(
        outcome,
        ReconcileOutcome::Updated { phone, .. } if phone.as_str() == "+13035872087"
    ));
}

#[tokio::test]
async fn empty_phone_field_falls_back_to_address() {
    // Telephony integrations sometimes send an empty phone string alongside
    // a populated address; the empty value must not mask the address.
    let api = MockApi {
        ticket: Some(Ticket {
            id: TicketId(101),
            requester_id: UserId(555),
            via: Some(voice_via(Some(""), Some("3035872087"))),
        }),
        ..MockApi::default()
    };

    let outcome = process_ticket_created(&api, bare_event(101)).await.unwrap();

    assert!(matches!(
        outcome,
        ReconcileOutcome::Updated { phone, .. } if phone.as_str() == "+13035872087"
    ));
}

// ─── Soft failures ────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_failure_degrades_to_update_branch() {
    // Even though a matching user is scripted, the failed search must be
    // treated as "not found" and the auto-created requester kept.
    let api = MockApi {
        ticket: Some(voice_ticket(101, 555, "3035872087")),
        user: Some(User {
            id: UserId(999),
            phone: None,
        }),
        search_fails: true,
        ..MockApi::default()
    };

    let outcome = process_ticket_created(&api, bare_event(101)).await.unwrap();

    assert!(matches!(
        outcome,
        ReconcileOutcome::Updated { requester: UserId(555), .. }
    ));
    assert!(api
        .calls()
        .contains(&Call::UpdateUserPhone(UserId(555), "+13035872087".to_string())));
}

#[tokio::test]
async fn write_failures_do_not_abort_the_procedure() {
    let api = MockApi {
        ticket: Some(voice_ticket(101, 555, "3035872087")),
        user_update_fails: true,
        ticket_update_fails: true,
        ..MockApi::default()
    };

    let outcome = process_ticket_created(&api, bare_event(101)).await.unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Updated { .. }));
}

// ─── Payload variants ─────────────────────────────────────────────────────────

#[tokio::test]
async fn inline_payload_is_used_without_fetching() {
    let api = MockApi::default(); // no ticket scripted: a fetch would 404

    let event = TicketEvent {
        id: Some(TicketId(101)),
        requester_id: Some(UserId(555)),
        via: Some(voice_via(Some("3035872087"), None)),
    };

    let outcome = process_ticket_created(&api, event).await.unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Updated { .. }));
    assert!(!api
        .calls()
        .iter()
        .any(|call| matches!(call, Call::FetchTicket(_))));
}

#[tokio::test]
async fn partial_inline_payload_falls_back_to_fetch() {
    // Has via but no requester: not enough to operate on inline.
    let api = MockApi {
        ticket: Some(voice_ticket(101, 555, "3035872087")),
        ..MockApi::default()
    };

    let event = TicketEvent {
        id: Some(TicketId(101)),
        requester_id: None,
        via: Some(voice_via(Some("3035872087"), None)),
    };

    process_ticket_created(&api, event).await.unwrap();

    assert!(api.calls().contains(&Call::FetchTicket(TicketId(101))));
}
