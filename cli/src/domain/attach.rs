//! Attach session types and the orchestrator's state machine.
//!
//! ```text
//! WaitingReady ──ready──▶ Attaching ──established──▶ Interacting ──exit──▶ Succeeded
//!      │                      │                           │
//!      └──timeout─────────────┴──establish error──────────┴──stream error──▶ Failed
//! ```

use std::time::Duration;

/// Exit code reported when the attach sequence itself fails.
pub const ATTACH_FAILURE_EXIT_CODE: i32 = 1;

/// Readiness probe deadline.
pub const READY_TIMEOUT: Duration = Duration::from_secs(120);
/// Deadline for establishing the streaming session once the endpoint is ready.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Parameters handed to the streaming transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachSession {
    /// Execution endpoint host (and optional port), without scheme.
    pub endpoint: String,
    /// `true` only when a TTY was requested and stdin is a terminal.
    pub tty: bool,
    pub width: u16,
    pub height: u16,
}

impl AttachSession {
    /// A session without terminal negotiation.
    #[must_use]
    pub fn non_interactive(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            tty: false,
            width: 0,
            height: 0,
        }
    }

    /// A TTY session with the local terminal's geometry.
    #[must_use]
    pub fn interactive(endpoint: &str, width: u16, height: u16) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            tty: true,
            width,
            height,
        }
    }
}

/// Orchestrator states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachState {
    WaitingReady,
    Attaching,
    Interacting,
    Succeeded,
    Failed,
}

impl AttachState {
    /// Whether `self → next` is an edge of the state machine.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use AttachState::{Attaching, Failed, Interacting, Succeeded, WaitingReady};
        matches!(
            (self, next),
            (WaitingReady, Attaching | Failed)
                | (Attaching, Interacting | Failed)
                | (Interacting, Succeeded | Failed)
        )
    }
}

/// Final result of one attach invocation.
#[derive(Debug)]
pub enum AttachOutcome {
    /// The remote process exited; its code is passed through unchanged.
    Succeeded { exit_code: i32 },
    /// Readiness, establishment or streaming failed.
    Failed { error: anyhow::Error },
}

impl AttachOutcome {
    /// Process exit code the caller should terminate with.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Succeeded { exit_code } => *exit_code,
            Self::Failed { .. } => ATTACH_FAILURE_EXIT_CODE,
        }
    }

    /// The underlying error, if the sequence failed.
    #[must_use]
    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}
