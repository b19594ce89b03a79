//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{ApiError, AttachSession, Credentials};

// ── Credential Ports ──────────────────────────────────────────────────────────

/// The persist capability invoked after every credential mutation.
///
/// Synchronous: the write must complete (or fail) before the login, refresh
/// or revoke call that triggered it returns.
pub trait CredentialStore {
    /// Durably store `creds`.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be written.
    fn persist(&self, creds: &Credentials) -> Result<()>;
}

/// Exchanges the refresh token for a new access token.
#[allow(async_fn_in_trait)]
pub trait TokenRefresher {
    /// Refresh `creds` in place and persist them.
    ///
    /// On failure `creds` is left unchanged.
    async fn refresh(&self, creds: &mut Credentials) -> Result<(), ApiError>;
}

// ── Resource Port ─────────────────────────────────────────────────────────────

/// Authenticated JSON calls against the control-plane API.
///
/// Services use this instead of a concrete client so status interpretation
/// stays in one place and tests can substitute canned responses.
#[allow(async_fn_in_trait)]
pub trait ResourceApi {
    /// `GET url`, decoding the body when present.
    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, ApiError>;

    /// `POST url` with a JSON payload, decoding the body when present.
    async fn post<P, T>(&self, url: &str, payload: &P) -> Result<Option<T>, ApiError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned;

    /// `PUT url` with an opaque body of `content_type`, decoding the JSON
    /// response when present.
    async fn upload<T: DeserializeOwned>(
        &self,
        url: &str,
        content_type: &'static str,
        body: Vec<u8>,
    ) -> Result<Option<T>, ApiError>;

    /// `DELETE url`.
    async fn delete(&self, url: &str) -> Result<(), ApiError>;

    /// Absolute URL of a collection endpoint such as `releases/`.
    async fn resource_url(&self, endpoint: &str) -> String;
}

// ── Source Port ───────────────────────────────────────────────────────────────

/// Packs a revision of the local source tree for a build.
#[allow(async_fn_in_trait)]
pub trait SourceArchiver {
    /// Tar archive of the tree at `git_ref`.
    ///
    /// # Errors
    ///
    /// Returns an error if the revision cannot be archived.
    async fn archive(&self, git_ref: &str) -> Result<Vec<u8>>;
}

// ── Attach Ports ──────────────────────────────────────────────────────────────

/// Checks whether an execution endpoint has finished provisioning.
#[allow(async_fn_in_trait)]
pub trait ReadinessProbe {
    /// `true` only when the endpoint answered its health path with `200`.
    /// Connection failures and other statuses are "not yet".
    async fn is_ready(&self, endpoint: &str) -> bool;
}

/// Local terminal mode control.
pub trait TerminalControl {
    /// Whether standard input is attached to a terminal.
    fn stdin_is_terminal(&self) -> bool;

    /// Terminal `(width, height)` in cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    fn size(&self) -> Result<(u16, u16)>;

    /// Capture the current mode and switch to raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal mode cannot be changed.
    fn enter_raw_mode(&self) -> Result<()>;

    /// Restore the mode captured by [`TerminalControl::enter_raw_mode`].
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal mode cannot be restored.
    fn restore(&self) -> Result<()>;
}

/// Establishes the byte stream to a remote process.
#[allow(async_fn_in_trait)]
pub trait StreamTransport {
    type Stream: InteractiveStream;

    /// Open a session to `session.endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be established.
    async fn connect(&self, session: &AttachSession) -> Result<Self::Stream>;
}

/// A live session to a remote process.
#[allow(async_fn_in_trait)]
pub trait InteractiveStream {
    /// Forward local stdio until the remote process exits; returns its exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream breaks before an exit code is received.
    async fn interact(self) -> Result<i32>;
}

// ── Progress Port ─────────────────────────────────────────────────────────────

/// Cosmetic "Attaching..." indicator. Sync trait; redraws are driven by the
/// attach service's background task.
pub trait ActivityIndicator: Send + Sync + 'static {
    /// Draw the next frame.
    fn tick(&self);
    /// Replace the indicator with a final status word (`ok` or `failed`).
    fn finish(&self, status: &str);
}
