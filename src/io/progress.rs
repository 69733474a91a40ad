//! Progress display for long-running trial and optimizer loops

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{prefix}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar that can be switched off entirely
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a bar over `total` steps labelled `label`
    pub fn new(label: &str, total: usize, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_message(label.to_string());
        Self { bar }
    }

    /// Create a bar that never draws
    pub fn hidden() -> Self {
        Self::new("", 0, false)
    }

    /// Advance by one step
    pub fn tick(&self) {
        self.bar.inc(1);
    }

    /// Show a short status next to the bar, e.g. the current loss
    pub fn set_status(&self, status: String) {
        self.bar.set_prefix(status);
    }

    /// Number of completed steps
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
