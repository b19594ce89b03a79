//! Shared `reqwest` client construction.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default per-request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings applied to every HTTPS client the CLI builds.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Extra PEM root certificate to trust.
    pub ca_cert: Option<PathBuf>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
            ca_cert: None,
        }
    }
}

/// Build an HTTP client honouring `settings`.
///
/// # Errors
///
/// Returns an error if the CA certificate cannot be read or parsed, or the
/// TLS backend fails to initialise.
pub fn build_client(settings: &HttpSettings) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(settings.timeout)
        .user_agent(concat!("gondor-cli/", env!("CARGO_PKG_VERSION")));

    if let Some(path) = &settings.ca_cert {
        let pem = std::fs::read(path)
            .with_context(|| format!("cannot read CA certificate {}", path.display()))?;
        let cert = reqwest::Certificate::from_pem(&pem)
            .with_context(|| format!("invalid CA certificate {}", path.display()))?;
        builder = builder.add_root_certificate(cert);
    }

    builder.build().context("failed to build HTTP client")
}
