//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::infra::http::DEFAULT_HTTP_TIMEOUT;

/// Command-line client for the Gondor platform
#[derive(Parser)]
#[command(
    name = "gondor",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file [default: <config dir>/gondor/config.yml]
    #[arg(long, global = true, env = "GONDOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// API base URL, overriding the config file
    #[arg(long, global = true, env = "GONDOR_API_URL")]
    pub api_url: Option<Url>,

    /// Extra PEM root certificate to trust
    #[arg(long, global = true)]
    pub ca_cert: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_HTTP_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Log HTTP requests and responses to stderr
    #[arg(long, global = true)]
    pub log_http: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store API tokens
    Login(commands::login::LoginArgs),

    /// Revoke stored API tokens
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Run a one-off command on an instance and attach to it
    Run(commands::run::RunArgs),

    /// Attach to an execution endpoint
    Attach(commands::attach::AttachArgs),

    /// Wait for an instance deployment to finish
    Wait(commands::wait::WaitArgs),

    /// Build a git revision and deploy it to an instance
    Deploy(commands::deploy::DeployArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be built or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        init_tracing(self.log_http);

        let flags = AppFlags {
            config: self.config,
            api_url: self
                .api_url
                .map(|url| url.as_str().trim_end_matches('/').to_string()),
            ca_cert: self.ca_cert,
            timeout: Duration::from_secs(self.timeout),
            no_color: self.no_color,
            quiet: self.quiet,
        };
        let app = AppContext::new(&flags)?;

        match self.command {
            Command::Login(args) => commands::login::run(&app, args).await,
            Command::Logout => commands::logout::run(&app).await,
            Command::Whoami => commands::whoami::run(&app).await,
            Command::Run(args) => commands::run::run(&app, args).await,
            Command::Attach(args) => commands::attach::run(&app, args).await,
            Command::Wait(args) => commands::wait::run(&app, args).await,
            Command::Deploy(args) => commands::deploy::run(&app, args).await,
        }
    }
}

/// Default log filter; `RUST_LOG` replaces it entirely.
fn default_filter(log_http: bool) -> &'static str {
    if log_http {
        "warn,gondor_cli::infra=debug"
    } else {
        "warn"
    }
}

fn init_tracing(log_http: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_http)));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
