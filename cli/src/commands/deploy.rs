//! `gondor deploy` — build a git revision on the platform and roll it out.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use url::Url;

use crate::app::AppContext;
use crate::application::services::deploy::{BuildResult, build_release, deploy_release};
use crate::application::services::deployment::DEPLOYMENT_TIMEOUT;
use crate::commands::exit_status;
use crate::output::progress;

/// Arguments for the deploy command.
#[derive(Args)]
pub struct DeployArgs {
    /// API URL of the instance
    pub instance_url: Url,

    /// Git revision to build (branch, tag or commit)
    pub git_ref: String,

    /// Give up waiting for the rollout after this many seconds
    #[arg(long, default_value_t = DEPLOYMENT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

/// Build `git_ref`, stream the build output, then deploy the release.
///
/// A failed build exits with the build's exit code.
///
/// # Errors
///
/// Returns an error if any API call, the source archive, the attach to the
/// build or the rollout wait fails.
pub async fn run(app: &AppContext, args: DeployArgs) -> Result<ExitCode> {
    let built = build_release(
        &app.api,
        app.source_archiver(),
        &app.attach_orchestrator(),
        args.instance_url.as_str(),
        &args.git_ref,
    )
    .await
    .with_context(|| format!("cannot build {}", args.git_ref))?;

    let pending = match built {
        BuildResult::Built(pending) => pending,
        BuildResult::Failed { exit_code } => {
            app.output
                .error(&format!("build of {} exited with {exit_code}", args.git_ref));
            return Ok(exit_status(exit_code));
        }
    };

    let pb = progress::spinner("Deploying...", app.output.show_progress());
    let result = deploy_release(&app.api, &pending, Duration::from_secs(args.timeout_secs)).await;
    progress::finish_with_status(&pb, if result.is_ok() { "ok" } else { "failed" });
    result?;

    app.output
        .success(&format!("Deployed {} to {}", args.git_ref, args.instance_url));
    Ok(ExitCode::SUCCESS)
}
