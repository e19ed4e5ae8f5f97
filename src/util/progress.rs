//! Saving/busy indicators around store round trips.
//!
//! Each mutating operation is one outstanding network round trip; while it
//! is in flight the CLI shows an advisory "saving" spinner so the user knows
//! not to fire another mutation at the same record. The indicator is purely
//! presentational and only appears when stderr is an interactive terminal.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{IsTerminal, stderr};
use std::time::Duration;

/// Check if we should show busy indicators.
///
/// Shown only if stderr is an interactive terminal, so piped output and
/// non-interactive environments stay clean.
#[must_use]
pub fn should_show_progress() -> bool {
    stderr().is_terminal()
}

/// Create a spinner for an in-flight store round trip.
///
/// # Panics
///
/// Panics if the spinner template string is invalid.
#[must_use]
pub fn create_spinner(message: &str, show: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    if show {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("valid template"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb
}

/// Spinner wrapper shown for the duration of one store round trip.
pub struct SavingIndicator {
    bar: ProgressBar,
}

impl SavingIndicator {
    /// Start a "Saving..." spinner (hidden when not on a terminal).
    #[must_use]
    pub fn start(message: &str) -> Self {
        Self {
            bar: create_spinner(message, should_show_progress()),
        }
    }

    /// Finish and clear the spinner.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for SavingIndicator {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_hidden_when_not_terminal() {
        let spinner = create_spinner("Saving...", false);
        spinner.finish();
    }

    #[test]
    fn test_saving_indicator_finishes_on_drop() {
        {
            let _indicator = SavingIndicator::start("Saving client...");
        }
        // Drop must not panic or leave output behind.
    }
}
