//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, or `reqwest`. Every failure the API
//! transport, the identity client and the poller can produce is one
//! variant of [`ApiError`]; callers convert to `anyhow::Error` via `?`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Field name the API uses for messages not tied to a specific field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

// ── Validation errors ─────────────────────────────────────────────────────────

/// Field → messages mapping decoded from a `400 Bad Request` body.
///
/// Never empty: [`FieldErrors::from_body`] rejects an empty mapping as a
/// decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Decode a `400` response body.
    ///
    /// Accepts either a JSON object mapping field names to message arrays, or
    /// a JSON array whose first element has that shape (the rest is ignored).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body matches neither shape or the
    /// mapping is empty.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ApiError::Decode(format!("invalid error body: {e}")))?;
        let first = match value {
            serde_json::Value::Array(items) => items.into_iter().next().ok_or_else(|| {
                ApiError::Decode("error body is an empty list".to_string())
            })?,
            other => other,
        };
        let errors: Self = serde_json::from_value(first)
            .map_err(|e| ApiError::Decode(format!("unexpected error body: {e}")))?;
        if errors.0.is_empty() {
            return Err(ApiError::Decode("error body has no messages".to_string()));
        }
        Ok(errors)
    }

    /// One rendered line per (field, message) pair.
    ///
    /// `non_field_errors` messages render without a field prefix.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(field, msgs)| {
                msgs.iter().map(move |msg| {
                    if field == NON_FIELD_ERRORS {
                        msg.clone()
                    } else {
                        format!("{field}: {msg}")
                    }
                })
            })
            .collect()
    }

    /// Messages reported for a single field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }
}

impl<const N: usize> From<[(&str, &[&str]); N]> for FieldErrors {
    fn from(pairs: [(&str, &[&str]); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(field, msgs)| {
                    (
                        field.to_string(),
                        msgs.iter().map(ToString::to_string).collect(),
                    )
                })
                .collect(),
        )
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = self.messages();
        match messages.as_slice() {
            [] => f.write_str("API error list is empty"),
            [single] => f.write_str(single),
            many => {
                f.write_str("multiple issues reported:")?;
                for msg in many {
                    write!(f, "\n\t * {msg}")?;
                }
                Ok(())
            }
        }
    }
}

// ── API errors ────────────────────────────────────────────────────────────────

/// Every failure surfaced by the API transport, identity client and poller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `400` with a field → messages body.
    #[error("{0}")]
    Validation(FieldErrors),

    /// `401` after the single refresh-and-retry, or a failed token grant.
    #[error("{0}\nRun 'gondor login' to authenticate again.")]
    Auth(String),

    /// `500` / `502`.
    #[error("{reason}\nOur staff has been notified of this error. Please try again later.")]
    Server { status: u16, reason: &'static str },

    /// Any status outside the mapped set.
    #[error("unknown response: {0}")]
    UnknownResponse(u16),

    /// Body present but not parseable as the expected shape.
    #[error("cannot decode response: {0}")]
    Decode(String),

    /// Bounded wait deadline exceeded.
    #[error("timed out after {0}s")]
    Timeout(u64),

    /// A polled resource reported a state the waiter does not understand.
    #[error("unknown instance state: {0}")]
    UnknownState(String),

    /// Network-level failure to reach the host.
    #[error("cannot reach {url}: {message}")]
    Transport { url: String, message: String },

    /// The persist callback failed after a credential mutation.
    #[error("cannot persist credentials: {0:#}")]
    Persist(anyhow::Error),
}

impl ApiError {
    /// Build the error for a `500` / `502` status.
    #[must_use]
    pub fn server(status: u16) -> Self {
        let reason = if status == 502 {
            "Bad Gateway"
        } else {
            "Internal Server Error"
        };
        Self::Server { status, reason }
    }

    /// Returns `true` for errors the user resolves by logging in again.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
