//! Progress reporting for long-running batches
//!
//! Two channels reach the user: an `indicatif` bar on stderr, and tracing
//! events under [`REPORT_TARGET`], which stay enabled at `info` whatever the
//! verbosity.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;

/// Tracing target for run milestones shown to the user by default
pub const REPORT_TARGET: &str = "consulta::report";

/// Log filter for `level` that keeps [`REPORT_TARGET`] at `info`
pub fn report_filter(level: &str) -> String {
    format!("{},{}=info", level, REPORT_TARGET)
}

const TEMPLATE: &str = "{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}";

/// Progress bar drawn on stderr, or hidden when stderr is not a terminal
#[derive(Debug, Clone)]
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Create a progress tracker for `total` steps
    ///
    /// The bar is only drawn when `visible` is set and stderr is a terminal.
    pub fn new(total: u64, visible: bool) -> Self {
        if !visible || !std::io::stderr().is_terminal() {
            return Self::hidden(total);
        }

        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        bar.set_style(
            ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Progress { bar }
    }

    /// Create a tracker that never draws
    pub fn hidden(total: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total);
        Progress { bar }
    }

    pub fn advance(&self) {
        self.bar.inc(1);
    }

    pub fn set_message(&self, message: &'static str) {
        self.bar.set_message(message);
    }

    pub fn finish(&self) {
        self.bar.finish();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}
