//! Deploy a git revision to an instance: release, build, attach to the build
//! output, then roll the release out and wait for it.
//!
//! Imports only from `crate::domain` and `crate::application`.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::IgnoredAny;

use crate::application::ports::{
    ActivityIndicator, ReadinessProbe, ResourceApi, SourceArchiver, StreamTransport,
    TerminalControl,
};
use crate::application::services::attach::AttachOrchestrator;
use crate::application::services::deployment::wait_for_deployment;
use crate::application::services::instances::get_instance;
use crate::domain::release::{NewRelease, ReleaseTarget};
use crate::domain::{ApiError, AttachOutcome, Build, BuildStarted, Instance, Release};

/// Media type of the uploaded source archive.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/x-tar";

/// A built release waiting to be rolled out.
#[derive(Debug)]
pub struct PendingRelease {
    pub instance: Instance,
    pub release: Release,
}

/// Result of the build phase.
#[derive(Debug)]
pub enum BuildResult {
    /// The build finished with exit code 0.
    Built(PendingRelease),
    /// The build process exited non-zero; nothing was deployed.
    Failed { exit_code: i32 },
}

/// Create a release and a build for the instance, upload `git_ref` as the
/// build source and stream the build's output without a TTY.
///
/// The release is deleted again if the build cannot be created or started.
///
/// # Errors
///
/// Returns an error if the instance or release cannot be fetched or created,
/// the source cannot be archived or uploaded, or the attach sequence fails.
pub async fn build_release<A, S, P, T, X, I>(
    api: &A,
    archiver: &S,
    attach: &AttachOrchestrator<P, T, X, I>,
    instance_url: &str,
    git_ref: &str,
) -> Result<BuildResult>
where
    A: ResourceApi,
    S: SourceArchiver,
    P: ReadinessProbe,
    T: TerminalControl,
    X: StreamTransport,
    I: ActivityIndicator,
{
    let instance = get_instance(api, instance_url)
        .await
        .with_context(|| format!("cannot load instance {instance_url}"))?;
    let release = create_release(api, &instance).await?;
    tracing::info!(release = %release.url, git_ref, "release created");

    let endpoint = match start_build(api, archiver, &instance, &release, git_ref).await {
        Ok(endpoint) => endpoint,
        Err(error) => return Err(discard_release(api, &release, error).await),
    };
    tracing::info!(endpoint = %endpoint, "build started");

    match attach.run(&endpoint, false).await {
        AttachOutcome::Succeeded { exit_code: 0 } => {
            Ok(BuildResult::Built(PendingRelease { instance, release }))
        }
        AttachOutcome::Succeeded { exit_code } => Ok(BuildResult::Failed { exit_code }),
        AttachOutcome::Failed { error } => Err(error.context("cannot attach to build")),
    }
}

/// Create a deployment of the built release and wait until the instance is
/// running again.
///
/// The release is deleted if the deployment cannot be created.
///
/// # Errors
///
/// Returns an error if the deployment is rejected, or the wait fails or
/// times out.
pub async fn deploy_release(
    api: &impl ResourceApi,
    pending: &PendingRelease,
    timeout: Duration,
) -> Result<()> {
    let url = api.resource_url("deployments/").await;
    let target = ReleaseTarget {
        instance: &pending.instance,
        release: &pending.release,
    };
    if let Err(e) = api.post::<_, IgnoredAny>(&url, &target).await {
        let error = anyhow::Error::new(e).context("cannot create deployment");
        return Err(discard_release(api, &pending.release, error).await);
    }

    wait_for_deployment(api, &pending.instance.url, timeout)
        .await
        .with_context(|| format!("deployment of {} did not complete", pending.instance.url))
}

async fn create_release(api: &impl ResourceApi, instance: &Instance) -> Result<Release> {
    let url = api.resource_url("releases/").await;
    let release: Option<Release> = api
        .post(&url, &NewRelease {
            instance: &instance.url,
        })
        .await
        .context("cannot create release")?;
    release.ok_or_else(|| ApiError::Decode("empty release response".to_string()).into())
}

async fn start_build(
    api: &impl ResourceApi,
    archiver: &impl SourceArchiver,
    instance: &Instance,
    release: &Release,
    git_ref: &str,
) -> Result<String> {
    let url = api.resource_url("builds/").await;
    let build: Option<Build> = api
        .post(&url, &ReleaseTarget { instance, release })
        .await
        .context("cannot create build")?;
    let build = build.ok_or_else(|| ApiError::Decode("empty build response".to_string()))?;

    let source = archiver
        .archive(git_ref)
        .await
        .with_context(|| format!("cannot archive {git_ref}"))?;
    tracing::debug!(bytes = source.len(), build = %build.url, "uploading source");

    let started: Option<BuildStarted> = api
        .upload(&build.url, ARCHIVE_CONTENT_TYPE, source)
        .await
        .context("cannot start build")?;
    match started {
        Some(BuildStarted { endpoint }) if !endpoint.is_empty() => Ok(endpoint),
        _ => Err(ApiError::Decode("build response has no endpoint".to_string()).into()),
    }
}

/// Delete `release` after `error`; a failed delete is reported instead.
async fn discard_release(
    api: &impl ResourceApi,
    release: &Release,
    error: anyhow::Error,
) -> anyhow::Error {
    match api.delete(&release.url).await {
        Ok(()) => {
            tracing::info!(release = %release.url, "release discarded");
            error
        }
        Err(e) => anyhow::Error::new(e).context(format!(
            "cannot delete release {} after: {error:#}",
            release.url
        )),
    }
}
