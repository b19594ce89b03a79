//! Command implementations

pub mod attach;
pub mod deploy;
pub mod login;
pub mod logout;
pub mod run;
pub mod wait;
pub mod whoami;

use std::process::ExitCode;

use crate::domain::AttachOutcome;
use crate::output::OutputContext;

/// Process exit status for a remote exit code.
#[must_use]
pub fn exit_status(code: i32) -> ExitCode {
    ExitCode::from(exit_byte(code))
}

/// Out-of-range codes saturate to 255.
fn exit_byte(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(u8::MAX)
}

/// Report a failed attach after the terminal has been restored, then map
/// the outcome to the process exit status.
pub fn finish_attach(ctx: &OutputContext, outcome: &AttachOutcome) -> ExitCode {
    if let Some(error) = outcome.error() {
        ctx.error(&format!("{error:#}"));
    }
    exit_status(outcome.exit_code())
}
