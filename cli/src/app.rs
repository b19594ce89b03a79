//! Application context — unified state passed to every command handler.
//!
//! `AppContext` is the composition root: it loads the config file, builds
//! the shared HTTP client, and wires the identity client, API client,
//! attach orchestrator and source archiver to their concrete adapters.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::application::services::attach::AttachOrchestrator;
use crate::domain::Credentials;
use crate::infra::api_client::ApiClient;
use crate::infra::config::YamlConfigStore;
use crate::infra::git::GitArchiver;
use crate::infra::http::{HttpSettings, build_client};
use crate::infra::identity::IdentityClient;
use crate::infra::readiness::HttpReadinessProbe;
use crate::infra::stream::CommandStreamTransport;
use crate::infra::terminal::CrosstermTerminal;
use crate::output::OutputContext;
use crate::output::progress::SpinnerIndicator;

/// Identity client persisting to the YAML config file.
pub type Identity = IdentityClient<YamlConfigStore>;
/// API client refreshing through [`Identity`].
pub type Api = ApiClient<Identity>;
/// Attach orchestrator wired to the process's terminal and helper program.
pub type Orchestrator =
    AttachOrchestrator<HttpReadinessProbe, CrosstermTerminal, CommandStreamTransport, SpinnerIndicator>;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Explicit config file; `None` uses the default location.
    pub config: Option<PathBuf>,
    /// Override of the stored API base URL.
    pub api_url: Option<String>,
    /// Extra PEM root certificate.
    pub ca_cert: Option<PathBuf>,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Config file the credentials are persisted to.
    pub store: YamlConfigStore,
    /// Credentials shared with the API client.
    pub credentials: Arc<RwLock<Credentials>>,
    /// OAuth client for login, logout and refresh.
    pub identity: Identity,
    /// Authenticated control-plane client.
    pub api: Api,
    http: reqwest::Client,
    archiver: GitArchiver,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be located or parsed, or
    /// the HTTP client cannot be built.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let path = match &flags.config {
            Some(path) => path.clone(),
            None => YamlConfigStore::default_path()?,
        };
        let store = YamlConfigStore::new(path);
        let mut creds = store.load()?.credentials();
        if let Some(url) = &flags.api_url {
            creds.base_url.clone_from(url);
        }
        tracing::debug!(config = %store.path().display(), base_url = %creds.base_url, "config loaded");

        let http = build_client(&HttpSettings {
            timeout: flags.timeout,
            ca_cert: flags.ca_cert.clone(),
        })?;
        let credentials = Arc::new(RwLock::new(creds));
        let identity = IdentityClient::new(http.clone(), store.clone());
        let api = ApiClient::new(http.clone(), Arc::clone(&credentials), identity.clone());

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            store,
            credentials,
            identity,
            api,
            http,
            archiver: GitArchiver::default(),
        })
    }

    /// Snapshot of the current credentials.
    pub async fn credentials(&self) -> Credentials {
        self.credentials.read().await.clone()
    }

    /// Orchestrator for one attach invocation.
    #[must_use]
    pub fn attach_orchestrator(&self) -> Orchestrator {
        AttachOrchestrator::new(
            HttpReadinessProbe::new(self.http.clone()),
            CrosstermTerminal,
            CommandStreamTransport::from_env(),
            Arc::new(SpinnerIndicator::new(self.output.show_progress())),
        )
    }

    /// Archiver for the repository in the current directory.
    #[must_use]
    pub fn source_archiver(&self) -> &GitArchiver {
        &self.archiver
    }
}
