//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod attach;
pub mod deploy;
pub mod deployment;
pub mod indicator;
pub mod instances;
pub mod wait;
