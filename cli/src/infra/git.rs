//! Source archives produced by `git archive`.

use std::ffi::OsString;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;

use crate::application::ports::SourceArchiver;

/// Runs `git archive --format=tar <ref>` and buffers the tarball.
#[derive(Debug, Clone)]
pub struct GitArchiver {
    program: OsString,
}

impl Default for GitArchiver {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitArchiver {
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SourceArchiver for GitArchiver {
    async fn archive(&self, git_ref: &str) -> Result<Vec<u8>> {
        let output = Command::new(&self.program)
            .args(["archive", "--format=tar", git_ref])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("cannot start {}", self.program.to_string_lossy()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "git archive {git_ref} failed ({}): {}",
                output.status,
                stderr.trim()
            );
        }
        tracing::debug!(git_ref, bytes = output.stdout.len(), "source archived");
        Ok(output.stdout)
    }
}
