//! Background redraw task for the attach indicator.
//!
//! The task lives only while its owner holds the [`IndicatorTask`]; `stop`
//! signals it, waits for it to exit, and only then draws the final status.
//! Dropping the handle without `stop` aborts the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::application::ports::ActivityIndicator;

/// Redraw period of the indicator.
pub const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Final status word shown after "Attaching...".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorStatus {
    Ok,
    Failed,
}

impl IndicatorStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
        }
    }
}

/// Handle to a running redraw task.
pub struct IndicatorTask<I: ActivityIndicator> {
    indicator: Arc<I>,
    done: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl<I: ActivityIndicator> IndicatorTask<I> {
    /// Spawn the redraw loop.
    #[must_use]
    pub fn start(indicator: Arc<I>, period: Duration) -> Self {
        let (done_tx, mut done_rx) = oneshot::channel();
        let drawer = Arc::clone(&indicator);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut done_rx => break,
                    _ = ticker.tick() => drawer.tick(),
                }
            }
        });
        Self {
            indicator,
            done: Some(done_tx),
            handle: Some(handle),
        }
    }

    /// Signal the loop, wait for it to exit, then draw `status`.
    pub async fn stop(mut self, status: IndicatorStatus) {
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::debug!(error = %e, "indicator task ended abnormally");
            }
        }
        self.indicator.finish(status.as_str());
    }
}

impl<I: ActivityIndicator> Drop for IndicatorTask<I> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
