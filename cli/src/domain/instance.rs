//! Instance shapes used by the run and deployment-wait flows.

use serde::{Deserialize, Serialize};

/// Lifecycle state reported by the API for an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Running,
    Deploying,
    Other(String),
}

impl From<&str> for InstanceState {
    fn from(raw: &str) -> Self {
        match raw {
            "running" => Self::Running,
            "deploying" => Self::Deploying,
            other => Self::Other(other.to_string()),
        }
    }
}

/// The subset of an instance resource the core needs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Instance {
    pub url: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub state: String,
}

impl Instance {
    #[must_use]
    pub fn lifecycle(&self) -> InstanceState {
        InstanceState::from(self.state.as_str())
    }
}

/// Body of `POST {instance}/run/`.
#[derive(Debug, Serialize)]
pub struct RunRequest {
    pub mode: String,
    pub command: String,
}

impl RunRequest {
    /// A `normal`-mode run of `argv` joined with spaces.
    #[must_use]
    pub fn normal(argv: &[String]) -> Self {
        Self {
            mode: "normal".to_string(),
            command: argv.join(" "),
        }
    }
}

/// Response of `POST {instance}/run/`.
#[derive(Debug, Deserialize)]
pub struct RunResponse {
    pub endpoint: String,
}

/// Join `path` onto an instance URL, keeping exactly one slash between them.
#[must_use]
pub fn instance_subpath(instance_url: &str, path: &str) -> String {
    format!("{}/{path}", instance_url.trim_end_matches('/'))
}
