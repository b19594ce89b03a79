//! `gondor run` — start a one-off command on an instance and attach to it.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use url::Url;

use crate::app::AppContext;
use crate::application::services::instances::request_run;
use crate::commands::finish_attach;

/// Arguments for the run command.
#[derive(Args)]
#[command(trailing_var_arg = true)]
pub struct RunArgs {
    /// API URL of the instance
    pub instance_url: Url,

    /// Do not allocate a TTY even when stdin is a terminal
    #[arg(long)]
    pub no_tty: bool,

    /// Command and arguments to run
    #[arg(required = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Request the run, then attach to the returned endpoint.
///
/// Exits with the remote process's exit code.
///
/// # Errors
///
/// Returns an error if the run request is rejected.
pub async fn run(app: &AppContext, args: RunArgs) -> Result<ExitCode> {
    let endpoint = request_run(&app.api, args.instance_url.as_str(), &args.command)
        .await
        .with_context(|| format!("cannot run command on {}", args.instance_url))?;
    tracing::info!(endpoint = %endpoint, "run accepted");

    let outcome = app
        .attach_orchestrator()
        .run(&endpoint, !args.no_tty)
        .await;
    Ok(finish_attach(&app.output, &outcome))
}
