//! Unit tests for the gondor CLI
//!
//! These tests use mocked ports or a local HTTP server and run fast without
//! touching real hosts.

mod architecture;
mod deployment_wait;
mod property_tests;
