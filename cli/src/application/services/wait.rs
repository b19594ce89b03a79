//! Bounded condition polling shared by readiness and deployment waits.
//!
//! Imports only from `crate::domain`.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::domain::ApiError;

/// Fixed delay between predicate evaluations.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Poll `predicate` every [`POLL_INTERVAL`] until it is satisfied, fails, or
/// `timeout` has elapsed since the call started.
///
/// # Errors
///
/// Propagates the first predicate error unchanged, or returns
/// [`ApiError::Timeout`] once the deadline is reached.
pub async fn wait_for<F, Fut>(timeout: Duration, predicate: F) -> Result<(), ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, ApiError>>,
{
    wait_for_every(timeout, POLL_INTERVAL, predicate).await
}

/// [`wait_for`] with an explicit interval.
///
/// Each cycle sleeps one `interval` first, then evaluates the predicate, then
/// checks the deadline. A zero `timeout` therefore still performs exactly one
/// sleep-then-check cycle, and a satisfied predicate always wins over an
/// expired deadline on the same cycle.
///
/// # Errors
///
/// Propagates the first predicate error unchanged, or returns
/// [`ApiError::Timeout`] once the deadline is reached.
pub async fn wait_for_every<F, Fut>(
    timeout: Duration,
    interval: Duration,
    mut predicate: F,
) -> Result<(), ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, ApiError>>,
{
    let started = Instant::now();
    let mut polls: u32 = 0;
    loop {
        tokio::time::sleep(interval).await;
        polls += 1;

        if predicate().await? {
            tracing::debug!(polls, elapsed_ms = elapsed_ms(started), "condition satisfied");
            return Ok(());
        }

        if started.elapsed() >= timeout {
            tracing::debug!(polls, timeout_secs = timeout.as_secs(), "condition timed out");
            return Err(ApiError::Timeout(timeout.as_secs()));
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
