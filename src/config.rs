//! Service configuration.
//!
//! All configuration comes from the process environment and is read exactly
//! once at startup into an explicit [`Config`] value; nothing else in the
//! crate touches the environment. The struct is passed into the Zendesk
//! client constructor, so there is no ambient global state.

use thiserror::Error;

use crate::types::CustomFieldId;

/// Default listen port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Default identifier of the ticket custom field that receives the
/// normalized caller phone. Overridable via `PHONE_CUSTOM_FIELD_ID`.
pub const DEFAULT_PHONE_CUSTOM_FIELD_ID: CustomFieldId = CustomFieldId(31_133_639_456_535);

/// Errors from reading configuration out of the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable is set but does not parse.
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },
}

/// Startup configuration for the reconciler service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Zendesk account subdomain (`https://{subdomain}.zendesk.com`).
    pub subdomain: String,

    /// Account email used for API basic auth (`{email}/token`).
    pub email: String,

    /// Zendesk API token.
    pub api_token: String,

    /// Port the HTTP server listens on.
    pub port: u16,

    /// Ticket custom field that receives the normalized phone.
    pub phone_custom_field_id: CustomFieldId,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// Keeps the parsing logic testable without mutating process-global
    /// environment state from tests.
    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, ConfigError> {
        let subdomain = required(&lookup, "ZENDESK_SUBDOMAIN")?;
        let email = required(&lookup, "ZENDESK_EMAIL")?;
        let api_token = required(&lookup, "ZENDESK_API_TOKEN")?;

        let port = match lookup("PORT") {
            Some(value) => parse_var("PORT", &value)?,
            None => DEFAULT_PORT,
        };

        let phone_custom_field_id = match lookup("PHONE_CUSTOM_FIELD_ID") {
            Some(value) => CustomFieldId(parse_var("PHONE_CUSTOM_FIELD_ID", &value)?),
            None => DEFAULT_PHONE_CUSTOM_FIELD_ID,
        };

        Ok(Config {
            subdomain,
            email,
            api_token,
            port,
            phone_custom_field_id,
        })
    }

    /// Base URL of the Zendesk REST API for this account.
    pub fn api_base(&self) -> String {
        format!("https://{}.zendesk.com/api/v2", self.subdomain)
    }
}

fn required(
    lookup: &impl Fn(&'static str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidVar {
        name,
        value: value.to_string(),
    })
}
