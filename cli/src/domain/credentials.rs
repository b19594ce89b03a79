//! In-memory API credentials.

/// Client identity, endpoints and OAuth tokens for one process.
///
/// Mutated only by the identity client (login, refresh, revoke); every
/// mutation is followed by a persist call before the mutating call returns.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub base_url: String,
    pub identity_url: String,
    pub access_token: String,
    pub refresh_token: String,
    pub username: String,
}

impl Credentials {
    /// Returns `true` once a login has stored an access token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Replace both tokens after a successful grant.
    pub fn set_tokens(&mut self, access_token: String, refresh_token: String) {
        self.access_token = access_token;
        self.refresh_token = refresh_token;
    }

    /// Forget the user and both tokens.
    pub fn clear(&mut self) {
        self.username.clear();
        self.access_token.clear();
        self.refresh_token.clear();
    }
}

// Tokens stay out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |s: &str| if s.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("base_url", &self.base_url)
            .field("identity_url", &self.identity_url)
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("username", &self.username)
            .finish()
    }
}
