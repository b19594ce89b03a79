//! Domain types for the Gondor global configuration file.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use serde::{Deserialize, Serialize};

use crate::domain::credentials::Credentials;

// ── Constants ────────────────────────────────────────────────────────────────

/// OAuth client id registered for the command-line client.
pub const DEFAULT_CLIENT_ID: &str = "KtcICiPMAII8FAeArUoDB97zmjqltllyUDev8HOS";
/// Default control-plane API URL.
pub const DEFAULT_BASE_URL: &str = "https://api.us2.gondor.io";
/// Default identity provider URL.
pub const DEFAULT_IDENTITY_URL: &str = "https://identity.gondor.io";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `<config dir>/gondor/config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GondorConfig {
    /// API client settings and stored tokens.
    pub client: ClientConfig,
}

/// API client settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub identity_url: String,
    pub auth: AuthConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_CLIENT_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            auth: AuthConfig::default(),
        }
    }
}

/// Stored authentication state.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub access_token: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub refresh_token: String,
}

impl GondorConfig {
    /// Build the in-memory credentials, filling blank settings with defaults.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        let or_default = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        Credentials {
            client_id: or_default(&self.client.id, DEFAULT_CLIENT_ID),
            base_url: or_default(&self.client.base_url, DEFAULT_BASE_URL),
            identity_url: or_default(&self.client.identity_url, DEFAULT_IDENTITY_URL),
            access_token: self.client.auth.access_token.clone(),
            refresh_token: self.client.auth.refresh_token.clone(),
            username: self.client.auth.username.clone(),
        }
    }

    /// Copy the username and tokens back into the persisted shape.
    ///
    /// Client id and endpoint URLs are left as stored: the in-memory values
    /// may carry per-invocation overrides.
    pub fn set_credentials(&mut self, creds: &Credentials) {
        self.client.auth.username.clone_from(&creds.username);
        self.client.auth.access_token.clone_from(&creds.access_token);
        self.client.auth.refresh_token.clone_from(&creds.refresh_token);
    }
}
