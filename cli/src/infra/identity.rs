//! OAuth client for the identity host: password grant, refresh grant and
//! token revocation.

use serde::Deserialize;

use crate::application::ports::{CredentialStore, TokenRefresher};
use crate::domain::{ApiError, Credentials};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    error: String,
    error_description: String,
}

/// Issues and revokes tokens; persists credentials after every change.
#[derive(Clone)]
pub struct IdentityClient<S> {
    http: reqwest::Client,
    store: S,
}

impl<S: CredentialStore> IdentityClient<S> {
    pub fn new(http: reqwest::Client, store: S) -> Self {
        Self { http, store }
    }

    /// Exchange a username and password for tokens and persist them.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] when the identity host rejects the
    /// credentials, or [`ApiError::Persist`] if the new tokens cannot be saved.
    pub async fn authenticate(
        &self,
        creds: &mut Credentials,
        username: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let (access, refresh) = self
            .token_grant(
                creds,
                &[
                    ("grant_type", "password"),
                    ("username", username),
                    ("password", password),
                    ("client_id", creds.client_id.as_str()),
                ],
            )
            .await?;
        creds.username = username.to_string();
        creds.set_tokens(access, refresh);
        self.persist(creds)?;
        tracing::info!(username, "logged in");
        Ok(())
    }

    /// Revoke the refresh token, then clear and persist the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] if the identity host does not answer `200`;
    /// the stored credentials are left untouched in that case.
    pub async fn revoke(&self, creds: &mut Credentials) -> Result<(), ApiError> {
        let url = identity_endpoint(creds, "oauth/revoke_token/");
        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", creds.client_id.as_str()),
                ("token", creds.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport(&url, &e))?;
        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), "revoke response");
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::Auth(format!("unable to log out ({status})")));
        }
        creds.clear();
        self.persist(creds)
    }

    async fn token_grant(
        &self,
        creds: &Credentials,
        form: &[(&str, &str)],
    ) -> Result<(String, String), ApiError> {
        let url = identity_endpoint(creds, "oauth/token/");
        let response = self
            .http
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| transport(&url, &e))?;
        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), "token response");
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Auth("authentication failed".to_string()));
        }

        let bytes = response.bytes().await.map_err(|e| transport(&url, &e))?;
        let token: TokenResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Decode(format!("invalid token response: {e}")))?;
        if !token.error.is_empty() {
            return Err(ApiError::Auth(format!(
                "authentication request failed: {:?}",
                token.error_description
            )));
        }
        if token.access_token.is_empty() {
            return Err(ApiError::Decode(
                "token response has no access_token".to_string(),
            ));
        }
        Ok((token.access_token, token.refresh_token))
    }

    fn persist(&self, creds: &Credentials) -> Result<(), ApiError> {
        self.store.persist(creds).map_err(ApiError::Persist)
    }
}

impl<S: CredentialStore> TokenRefresher for IdentityClient<S> {
    async fn refresh(&self, creds: &mut Credentials) -> Result<(), ApiError> {
        if creds.refresh_token.is_empty() {
            return Err(ApiError::Auth("not logged in".to_string()));
        }
        let (access, refresh) = self
            .token_grant(
                creds,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", creds.refresh_token.as_str()),
                    ("client_id", creds.client_id.as_str()),
                ],
            )
            .await?;
        creds.set_tokens(access, refresh);
        self.persist(creds)?;
        tracing::debug!("access token refreshed");
        Ok(())
    }
}

fn identity_endpoint(creds: &Credentials, path: &str) -> String {
    format!("{}/{path}", creds.identity_url.trim_end_matches('/'))
}

fn transport(url: &str, err: &reqwest::Error) -> ApiError {
    ApiError::Transport {
        url: url.to_string(),
        message: err.to_string(),
    }
}
