//! Progress indicator shown while waiting for a reply

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner displayed between sending a message and its first fragment.
///
/// Hidden when progress is disabled so callers never need to branch.
pub struct ReplySpinner {
    bar: Option<ProgressBar>,
}

impl ReplySpinner {
    pub fn start(message: &str, enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::style());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    /// A spinner that never draws.
    pub fn hidden() -> Self {
        Self { bar: None }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Remove the spinner line. Safe to call more than once.
    pub fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }
}

impl Drop for ReplySpinner {
    fn drop(&mut self) {
        self.clear();
    }
}
