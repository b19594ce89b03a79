//! HTTP readiness probe for execution endpoints.

use crate::application::ports::ReadinessProbe;

/// Health path every execution endpoint serves once provisioned.
pub const HEALTH_PATH: &str = "ok";

/// `GET {scheme}://{endpoint}/ok`; ready only on `200`.
#[derive(Debug, Clone)]
pub struct HttpReadinessProbe {
    client: reqwest::Client,
    scheme: &'static str,
}

impl HttpReadinessProbe {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            scheme: "https",
        }
    }

    /// Probe over a different scheme (plain `http` for local endpoints).
    #[must_use]
    pub fn with_scheme(mut self, scheme: &'static str) -> Self {
        self.scheme = scheme;
        self
    }

    #[must_use]
    pub fn health_url(&self, endpoint: &str) -> String {
        format!(
            "{}://{}/{HEALTH_PATH}",
            self.scheme,
            endpoint.trim_end_matches('/')
        )
    }
}

impl ReadinessProbe for HttpReadinessProbe {
    async fn is_ready(&self, endpoint: &str) -> bool {
        let url = self.health_url(endpoint);
        match self.client.get(&url).send().await {
            Ok(resp) => {
                tracing::debug!(url = %url, status = resp.status().as_u16(), "readiness probe");
                resp.status() == reqwest::StatusCode::OK
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "readiness probe unreachable");
                false
            }
        }
    }
}
