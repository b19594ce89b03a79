//! Streaming transport backed by an external helper program.
//!
//! The helper owns the wire protocol. It is started with the caller's stdio
//! inherited and its exit status is the remote process's exit code.

use std::ffi::OsString;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};

use crate::application::ports::{InteractiveStream, StreamTransport};
use crate::domain::AttachSession;

/// Environment variable naming the helper program.
pub const PIPE_HELPER_ENV: &str = "GONDOR_PIPE_HELPER";
/// Helper looked up on `PATH` when the variable is unset.
pub const DEFAULT_PIPE_HELPER: &str = "gondor-pipe";

/// Exit code reported when the helper was killed by a signal.
const SIGNALLED_EXIT_CODE: i32 = 255;

/// Spawns `<program> <endpoint> [--tty --width W --height H]`.
#[derive(Debug, Clone)]
pub struct CommandStreamTransport {
    program: OsString,
}

impl CommandStreamTransport {
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use `$GONDOR_PIPE_HELPER`, else `gondor-pipe`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os(PIPE_HELPER_ENV).unwrap_or_else(|| DEFAULT_PIPE_HELPER.into()),
        )
    }

    #[must_use]
    pub fn args(session: &AttachSession) -> Vec<String> {
        let mut args = vec![session.endpoint.clone()];
        if session.tty {
            args.extend([
                "--tty".to_string(),
                "--width".to_string(),
                session.width.to_string(),
                "--height".to_string(),
                session.height.to_string(),
            ]);
        }
        args
    }
}

impl StreamTransport for CommandStreamTransport {
    type Stream = ChildStream;

    async fn connect(&self, session: &AttachSession) -> Result<ChildStream> {
        let child = Command::new(&self.program)
            .args(Self::args(session))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("cannot start {}", self.program.to_string_lossy()))?;
        tracing::debug!(endpoint = %session.endpoint, tty = session.tty, "stream helper started");
        Ok(ChildStream { child })
    }
}

/// A running helper process.
#[derive(Debug)]
pub struct ChildStream {
    child: Child,
}

impl InteractiveStream for ChildStream {
    async fn interact(mut self) -> Result<i32> {
        let status = self
            .child
            .wait()
            .await
            .context("stream helper did not exit cleanly")?;
        Ok(status.code().unwrap_or(SIGNALLED_EXIT_CODE))
    }
}
