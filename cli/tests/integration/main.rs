//! Integration tests for the gondor CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! They are slower and should be run separately from unit tests.

mod cli_tests;
mod deploy_command;
mod wait_command;
