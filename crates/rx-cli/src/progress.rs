//! Terminal progress display.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rx_engine::{ProgressError, ProgressSink};

/// Spinner showing the latest progress message on stderr.
pub struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {elapsed:>3} {msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// A spinner that draws nothing.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Removes the spinner line.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for SpinnerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for SpinnerProgress {
    fn report(&self, message: &str) -> Result<(), ProgressError> {
        if self.bar.is_finished() {
            return Err(ProgressError::new("spinner already finished"));
        }
        self.bar.set_message(message.trim().to_string());
        Ok(())
    }
}
