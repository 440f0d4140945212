use crate::constants::{
    ACCESS_TOKEN_MINUTES, ACTIVATION_TOKEN_HOURS, PASSWORD_RESET_TOKEN_HOURS, REFRESH_TOKEN_DAYS,
};
use chrono::Duration;
use serde::Deserialize;

/// Token signing and route protection settings
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub activation_ttl: Duration,
    pub password_reset_ttl: Duration,
    /// Require a bearer token on agent, tool and webhook routes
    pub protect_resources: bool,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::minutes(ACCESS_TOKEN_MINUTES),
            refresh_ttl: Duration::days(REFRESH_TOKEN_DAYS),
            activation_ttl: Duration::hours(ACTIVATION_TOKEN_HOURS),
            password_reset_ttl: Duration::hours(PASSWORD_RESET_TOKEN_HOURS),
            protect_resources: true,
        }
    }

    pub fn with_protect_resources(mut self, protect: bool) -> Self {
        self.protect_resources = protect;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("activation_ttl", &self.activation_ttl)
            .field("password_reset_ttl", &self.password_reset_ttl)
            .field("protect_resources", &self.protect_resources)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawAuth {
    pub(super) secret: Option<String>,
    pub(super) secret_env: Option<String>,
    pub(super) access_token_minutes: Option<i64>,
    pub(super) refresh_token_days: Option<i64>,
    pub(super) activation_token_hours: Option<i64>,
    pub(super) password_reset_token_hours: Option<i64>,
    pub(super) protect_resources: Option<bool>,
}
