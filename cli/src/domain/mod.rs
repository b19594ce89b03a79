//! Domain layer — pure types, error taxonomy, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `reqwest`, or `std::fs`.
//! All functions are synchronous and take data in, returning data out.

pub mod attach;
pub mod config;
pub mod credentials;
pub mod error;
pub mod instance;
pub mod release;

pub use attach::{AttachOutcome, AttachSession, AttachState};
pub use config::GondorConfig;
pub use credentials::Credentials;
pub use error::{ApiError, FieldErrors};
pub use instance::{Instance, InstanceState};
pub use release::{Build, BuildStarted, Release};
