//! Progress indicators using indicatif

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::application::ports::ActivityIndicator;

const TICK_STRINGS: &[&str] = &["|", "/", "-", "\\", "|"];

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_strings(TICK_STRINGS)
        .template("{msg} {spinner}")
        .expect("valid template")
}

/// Create a self-ticking spinner on stderr; hidden unless `visible`.
///
/// # Panics
///
/// Panics if the spinner template string is invalid (it is a compile-time constant and will not panic).
#[must_use]
pub fn spinner(msg: &str, visible: bool) -> ProgressBar {
    let pb = stderr_bar(visible);
    pb.set_message(msg.to_string());
    if visible {
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb
}

fn stderr_bar(visible: bool) -> ProgressBar {
    let pb = if visible {
        ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(spinner_style());
    pb
}

/// Finish a spinner by replacing the frame with `status`.
pub fn finish_with_status(pb: &ProgressBar, status: &str) {
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{msg}")
            .expect("valid template"),
    );
    let msg = format!("{} {status}", pb.message());
    pb.finish_with_message(msg);
}

/// "Attaching..." indicator redrawn by the attach service.
pub struct SpinnerIndicator {
    bar: ProgressBar,
}

impl SpinnerIndicator {
    /// Label shown while the endpoint is provisioning.
    pub const LABEL: &'static str = "Attaching...";

    /// A spinner on stderr, or a no-op indicator when `visible` is false.
    #[must_use]
    pub fn new(visible: bool) -> Self {
        let bar = stderr_bar(visible);
        bar.set_message(Self::LABEL);
        Self { bar }
    }
}

impl ActivityIndicator for SpinnerIndicator {
    fn tick(&self) {
        self.bar.tick();
    }

    fn finish(&self, status: &str) {
        finish_with_status(&self.bar, status);
    }
}
