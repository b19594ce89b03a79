//! Release, build and deployment shapes used by the deploy flow.

use serde::{Deserialize, Serialize};

use crate::domain::Instance;

/// A release created for one instance; deleted again if the deploy fails
/// before a deployment exists.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

/// Body of `POST releases/`.
#[derive(Debug, Serialize)]
pub struct NewRelease<'a> {
    pub instance: &'a str,
}

/// Body of `POST builds/` and `POST deployments/`.
#[derive(Debug, Serialize)]
pub struct ReleaseTarget<'a> {
    pub instance: &'a Instance,
    pub release: &'a Release,
}

/// Response of `POST builds/`.
#[derive(Debug, Deserialize)]
pub struct Build {
    pub url: String,
}

/// Response of uploading the source archive to a build.
#[derive(Debug, Deserialize)]
pub struct BuildStarted {
    #[serde(default)]
    pub endpoint: String,
}
