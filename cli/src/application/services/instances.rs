//! Instance operations the attach flows depend on.
//!
//! Imports only from `crate::domain` and `crate::application`.

use crate::application::ports::ResourceApi;
use crate::domain::instance::{RunRequest, RunResponse, instance_subpath};
use crate::domain::{ApiError, Instance};

/// Fetch an instance by its API URL.
///
/// # Errors
///
/// Returns the transport error, or [`ApiError::Decode`] on an empty body.
pub async fn get_instance(api: &impl ResourceApi, instance_url: &str) -> Result<Instance, ApiError> {
    api.get(instance_url)
        .await?
        .ok_or_else(|| ApiError::Decode("empty instance response".to_string()))
}

/// Ask the platform to start `argv` on the instance and return the
/// ephemeral execution endpoint to attach to.
///
/// # Errors
///
/// Returns the transport error, or [`ApiError::Decode`] when the response
/// carries no endpoint.
pub async fn request_run(
    api: &impl ResourceApi,
    instance_url: &str,
    argv: &[String],
) -> Result<String, ApiError> {
    let url = instance_subpath(instance_url, "run/");
    let response: Option<RunResponse> = api.post(&url, &RunRequest::normal(argv)).await?;
    match response {
        Some(RunResponse { endpoint }) if !endpoint.is_empty() => Ok(endpoint),
        _ => Err(ApiError::Decode("run response has no endpoint".to_string())),
    }
}
