//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTPS calls to the API and
//! identity hosts, the config file, the local terminal, `git` and the
//! streaming helper process.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod api_client;
pub mod config;
pub mod git;
pub mod http;
pub mod identity;
pub mod readiness;
pub mod stream;
pub mod terminal;
