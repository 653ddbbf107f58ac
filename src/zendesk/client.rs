//! Reqwest-based Zendesk REST client.
//!
//! One shared `reqwest::Client` serves all four operations. Authentication is
//! HTTP basic auth with the `{email}/token` username convention. No retries
//! and no timeouts beyond the client defaults: the reconciler treats call
//! failures as soft and the webhook sender owns any redelivery policy.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::error::ZendeskApiError;
use super::TicketingApi;
use crate::config::Config;
use crate::phone::PhoneNumber;
use crate::types::{CustomFieldId, Ticket, TicketId, User, UserId};

/// Client for the Zendesk REST API, scoped to one account.
#[derive(Clone)]
pub struct ZendeskClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    api_token: String,
    phone_field: CustomFieldId,
}

impl ZendeskClient {
    /// Creates a client from startup configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(
            config.api_base(),
            &config.email,
            config.api_token.clone(),
            config.phone_custom_field_id,
        )
    }

    /// Creates a client against an explicit base URL.
    ///
    /// Exists so tests can point the client at a local server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        email: &str,
        api_token: String,
        phone_field: CustomFieldId,
    ) -> Self {
        ZendeskClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            username: api_username(email),
            api_token,
            phone_field,
        }
    }

    /// Returns the custom field that receives the normalized phone.
    pub fn phone_field(&self) -> CustomFieldId {
        self.phone_field
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.api_token))
    }

    fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .put(format!("{}{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.api_token))
    }
}

/// Basic-auth username for token authentication: `{email}/token`.
fn api_username(email: &str) -> String {
    format!("{email}/token")
}

/// Converts a non-success response into a `Status` error, capturing the body
/// for logging context.
async fn status_error(endpoint: &'static str, response: reqwest::Response) -> ZendeskApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ZendeskApiError::Status {
        endpoint,
        status,
        body,
    }
}

// ─── Wire envelopes ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TicketEnvelope {
    ticket: Ticket,
}

#[derive(Deserialize)]
struct UserSearchEnvelope {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Serialize)]
struct UserUpdateBody<'a> {
    user: UserPhonePatch<'a>,
}

#[derive(Serialize)]
struct UserPhonePatch<'a> {
    phone: &'a str,
}

#[derive(Serialize)]
struct TicketUpdateBody<'a> {
    ticket: TicketPatch<'a>,
}

#[derive(Serialize)]
struct TicketPatch<'a> {
    requester_id: UserId,
    custom_fields: Vec<CustomFieldValue<'a>>,
}

#[derive(Serialize)]
struct CustomFieldValue<'a> {
    id: CustomFieldId,
    value: &'a str,
}

impl TicketingApi for ZendeskClient {
    async fn fetch_ticket(&self, ticket: TicketId) -> Result<Option<Ticket>, ZendeskApiError> {
        const ENDPOINT: &str = "tickets/show";

        let response = self
            .get(&format!("/tickets/{ticket}.json"))
            .send()
            .await
            .map_err(|source| ZendeskApiError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(ENDPOINT, response).await);
        }

        let envelope: TicketEnvelope =
            response
                .json()
                .await
                .map_err(|source| ZendeskApiError::Decode {
                    endpoint: ENDPOINT,
                    source,
                })?;
        Ok(Some(envelope.ticket))
    }

    async fn search_user_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<User>, ZendeskApiError> {
        const ENDPOINT: &str = "users/search";

        let response = self
            .get("/users/search.json")
            .query(&[("query", format!("phone:{phone}"))])
            .send()
            .await
            .map_err(|source| ZendeskApiError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        if !response.status().is_success() {
            return Err(status_error(ENDPOINT, response).await);
        }

        let envelope: UserSearchEnvelope =
            response
                .json()
                .await
                .map_err(|source| ZendeskApiError::Decode {
                    endpoint: ENDPOINT,
                    source,
                })?;
        Ok(envelope.users.into_iter().next())
    }

    async fn update_user_phone(
        &self,
        user: UserId,
        phone: &PhoneNumber,
    ) -> Result<(), ZendeskApiError> {
        const ENDPOINT: &str = "users/update";

        let body = UserUpdateBody {
            user: UserPhonePatch {
                phone: phone.as_str(),
            },
        };

        let response = self
            .put(&format!("/users/{user}.json"))
            .json(&body)
            .send()
            .await
            .map_err(|source| ZendeskApiError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        if !response.status().is_success() {
            return Err(status_error(ENDPOINT, response).await);
        }
        Ok(())
    }

    async fn update_ticket(
        &self,
        ticket: TicketId,
        requester: UserId,
        phone: &PhoneNumber,
    ) -> Result<(), ZendeskApiError> {
        const ENDPOINT: &str = "tickets/update";

        let body = TicketUpdateBody {
            ticket: TicketPatch {
                requester_id: requester,
                custom_fields: vec![CustomFieldValue {
                    id: self.phone_field,
                    value: phone.as_str(),
                }],
            },
        };

        let response = self
            .put(&format!("/tickets/{ticket}.json"))
            .json(&body)
            .send()
            .await
            .map_err(|source| ZendeskApiError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        if !response.status().is_success() {
            return Err(status_error(ENDPOINT, response).await);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ZendeskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZendeskClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("phone_field", &self.phone_field)
            .finish_non_exhaustive()
    }
}
