//! Zendesk API error types.
//!
//! Every outbound call failure is reported through [`ZendeskApiError`]. The
//! reconciler catches these at the call site, logs them, and degrades to a
//! soft failure; only the ticket-fetch step turns one into a hard failure.

use thiserror::Error;

/// An error from one of the four outbound Zendesk calls.
#[derive(Debug, Error)]
pub enum ZendeskApiError {
    /// The HTTP request never produced a response (connect failure, timeout,
    /// TLS error).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-2xx status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        /// Response body, captured for logging context.
        body: String,
    },

    /// The response body did not match the expected schema.
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ZendeskApiError {
    /// Returns the HTTP status code, if the API produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ZendeskApiError::Status { status, .. } => Some(*status),
            ZendeskApiError::Transport { .. } | ZendeskApiError::Decode { .. } => None,
        }
    }
}
