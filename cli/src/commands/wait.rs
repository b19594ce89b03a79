//! `gondor wait` — block until an instance finishes deploying.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use url::Url;

use crate::app::AppContext;
use crate::application::services::deployment::{DEPLOYMENT_TIMEOUT, wait_for_deployment};
use crate::output::progress;

/// Arguments for the wait command.
#[derive(Args)]
pub struct WaitArgs {
    /// API URL of the instance
    pub instance_url: Url,

    /// Give up after this many seconds
    #[arg(long, default_value_t = DEPLOYMENT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

/// Poll the instance until it is running.
///
/// # Errors
///
/// Returns an error on timeout, an unknown instance state, or any API error.
pub async fn run(app: &AppContext, args: WaitArgs) -> Result<ExitCode> {
    let pb = progress::spinner("Waiting for deployment...", app.output.show_progress());
    let result = wait_for_deployment(
        &app.api,
        args.instance_url.as_str(),
        Duration::from_secs(args.timeout_secs),
    )
    .await;
    progress::finish_with_status(&pb, if result.is_ok() { "ok" } else { "failed" });

    result.with_context(|| format!("deployment of {} did not complete", args.instance_url))?;
    app.output.success("Instance is running");
    Ok(ExitCode::SUCCESS)
}
