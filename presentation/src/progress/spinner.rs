//! "Thinking" indicator shown while a reply has no text yet

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner on stderr, cleared when the first fragment arrives.
pub struct ThinkingSpinner {
    bar: ProgressBar,
}

impl ThinkingSpinner {
    pub const MESSAGE: &'static str = "Thinking...";

    pub fn start() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_message(Self::MESSAGE);
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    #[cfg(test)]
    fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }

    pub fn stop(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ThinkingSpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
