//! Interactive attach: wait for an execution endpoint, negotiate the local
//! terminal, hand off to the streaming transport, and report the remote
//! exit code.
//!
//! Imports only from `crate::domain` and `crate::application`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::Instant;

use crate::application::ports::{
    ActivityIndicator, InteractiveStream, ReadinessProbe, StreamTransport, TerminalControl,
};
use crate::application::services::indicator::{IndicatorStatus, IndicatorTask, REDRAW_INTERVAL};
use crate::application::services::wait::{POLL_INTERVAL, wait_for_every};
use crate::domain::attach::{CONNECT_TIMEOUT, READY_TIMEOUT};
use crate::domain::{AttachOutcome, AttachSession, AttachState};

// ── Raw mode guard ────────────────────────────────────────────────────────────

/// Scoped raw-mode acquisition.
///
/// The captured terminal mode is restored exactly once: by
/// [`RawModeGuard::restore`] on the normal path, or by `Drop` on early
/// returns and unwinding.
pub struct RawModeGuard<'a, T: TerminalControl> {
    terminal: &'a T,
    active: bool,
}

impl<'a, T: TerminalControl> RawModeGuard<'a, T> {
    /// Capture the current mode and switch to raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be entered; nothing needs restoring.
    pub fn enter(terminal: &'a T) -> Result<Self> {
        terminal.enter_raw_mode()?;
        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// Restore the captured mode now.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal rejects the restore.
    pub fn restore(mut self) -> Result<()> {
        self.active = false;
        self.terminal.restore()
    }
}

impl<T: TerminalControl> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            if let Err(e) = self.terminal.restore() {
                tracing::warn!(error = %e, "cannot restore terminal mode");
            }
        }
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Drives one attach invocation through
/// `WaitingReady → Attaching → Interacting → {Succeeded, Failed}`.
pub struct AttachOrchestrator<P, T, X, I> {
    probe: P,
    terminal: T,
    transport: X,
    indicator: Arc<I>,
    ready_timeout: Duration,
    connect_timeout: Duration,
    interval: Duration,
}

impl<P, T, X, I> AttachOrchestrator<P, T, X, I>
where
    P: ReadinessProbe,
    T: TerminalControl,
    X: StreamTransport,
    I: ActivityIndicator,
{
    /// Orchestrator with the standard 2-minute readiness and 10-second
    /// connect deadlines, polling every second.
    pub fn new(probe: P, terminal: T, transport: X, indicator: Arc<I>) -> Self {
        Self {
            probe,
            terminal,
            transport,
            indicator,
            ready_timeout: READY_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
            interval: POLL_INTERVAL,
        }
    }

    /// Override the readiness and connect deadlines.
    #[must_use]
    pub fn with_timeouts(mut self, ready: Duration, connect: Duration) -> Self {
        self.ready_timeout = ready;
        self.connect_timeout = connect;
        self
    }

    /// Attach to `endpoint`. A TTY is negotiated only when `tty_requested`
    /// and standard input is a terminal.
    pub async fn run(&self, endpoint: &str, tty_requested: bool) -> AttachOutcome {
        let mut state = AttachState::WaitingReady;

        if let Err(e) = self.wait_ready(endpoint).await {
            advance(&mut state, AttachState::Failed);
            return AttachOutcome::Failed {
                error: anyhow::Error::new(e)
                    .context(format!("endpoint {endpoint} did not become ready")),
            };
        }
        advance(&mut state, AttachState::Attaching);

        let (guard, session) = match self.negotiate_terminal(endpoint, tty_requested) {
            Ok(pair) => pair,
            Err(error) => {
                advance(&mut state, AttachState::Failed);
                return AttachOutcome::Failed { error };
            }
        };

        let stream = match self.connect(&session).await {
            Ok(stream) => stream,
            Err(error) => {
                let error = finish_restore(guard, error);
                advance(&mut state, AttachState::Failed);
                return AttachOutcome::Failed { error };
            }
        };
        advance(&mut state, AttachState::Interacting);

        let result = stream.interact().await;
        if let Some(Err(e)) = guard.map(RawModeGuard::restore) {
            tracing::warn!(error = %e, "cannot restore terminal mode");
        }

        match result {
            Ok(exit_code) => {
                advance(&mut state, AttachState::Succeeded);
                AttachOutcome::Succeeded { exit_code }
            }
            Err(error) => {
                advance(&mut state, AttachState::Failed);
                AttachOutcome::Failed { error }
            }
        }
    }

    /// WaitingReady: poll the endpoint while the indicator redraws.
    async fn wait_ready(&self, endpoint: &str) -> Result<(), crate::domain::ApiError> {
        let indicator = IndicatorTask::start(Arc::clone(&self.indicator), REDRAW_INTERVAL);
        let probe = &self.probe;
        let result = wait_for_every(self.ready_timeout, self.interval, move || async move {
            Ok(probe.is_ready(endpoint).await)
        })
        .await;
        let status = if result.is_ok() {
            IndicatorStatus::Ok
        } else {
            IndicatorStatus::Failed
        };
        indicator.stop(status).await;
        result
    }

    /// Attaching: raw mode and geometry when interactive.
    fn negotiate_terminal(
        &self,
        endpoint: &str,
        tty_requested: bool,
    ) -> Result<(Option<RawModeGuard<'_, T>>, AttachSession)> {
        if !tty_requested || !self.terminal.stdin_is_terminal() {
            return Ok((None, AttachSession::non_interactive(endpoint)));
        }
        let (width, height) = self.terminal.size()?;
        let guard = RawModeGuard::enter(&self.terminal)?;
        Ok((
            Some(guard),
            AttachSession::interactive(endpoint, width, height),
        ))
    }

    /// Establish the stream, retrying until the connect deadline.
    async fn connect(&self, session: &AttachSession) -> Result<X::Stream> {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match self.transport.connect(session).await {
                Ok(stream) => {
                    tracing::debug!(attempts, endpoint = %session.endpoint, "session established");
                    return Ok(stream);
                }
                Err(e) if started.elapsed() + self.interval > self.connect_timeout => {
                    return Err(e.context(format!(
                        "cannot establish session with {} after {attempts} attempts",
                        session.endpoint
                    )));
                }
                Err(e) => {
                    tracing::debug!(attempts, error = %e, "session not established yet");
                    tokio::time::sleep(self.interval).await;
                }
            }
        }
    }
}

fn advance(state: &mut AttachState, next: AttachState) {
    debug_assert!(state.can_transition_to(next), "{state:?} -> {next:?}");
    tracing::debug!(from = ?*state, to = ?next, "attach state");
    *state = next;
}

/// Restore the terminal (if raw) before surfacing `error`.
fn finish_restore<T: TerminalControl>(
    guard: Option<RawModeGuard<'_, T>>,
    error: anyhow::Error,
) -> anyhow::Error {
    if let Some(Err(e)) = guard.map(RawModeGuard::restore) {
        tracing::warn!(error = %e, "cannot restore terminal mode");
    }
    error
}
