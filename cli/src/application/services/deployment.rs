//! Deployment completion wait.
//!
//! Imports only from `crate::domain` and `crate::application`.

use std::time::Duration;

use crate::application::ports::ResourceApi;
use crate::application::services::instances::get_instance;
use crate::application::services::wait::wait_for;
use crate::domain::{ApiError, InstanceState};

/// How long a deployment may take before the wait gives up.
pub const DEPLOYMENT_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Poll the instance at `instance_url` until it reports `running`.
///
/// `deploying` keeps waiting; any other state fails immediately.
///
/// # Errors
///
/// Returns the transport error of any poll, [`ApiError::Decode`] for an empty
/// instance body, [`ApiError::UnknownState`] for an unexpected state, or
/// [`ApiError::Timeout`] when `timeout` elapses.
pub async fn wait_for_deployment(
    api: &impl ResourceApi,
    instance_url: &str,
    timeout: Duration,
) -> Result<(), ApiError> {
    wait_for(timeout, move || async move {
        let state = get_instance(api, instance_url).await?.lifecycle();
        tracing::debug!(instance_url, ?state, "deployment poll");
        match state {
            InstanceState::Running => Ok(true),
            InstanceState::Deploying => Ok(false),
            InstanceState::Other(raw) => Err(ApiError::UnknownState(raw)),
        }
    })
    .await
}
