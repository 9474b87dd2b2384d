//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::shell::OutputLine;

use super::theme::ScanTheme;
use super::SpinnerHandle;

const MAX_LINE_WIDTH: usize = 72;

/// A progress spinner for long-running operations.
pub struct ProgressSpinner {
    bar: ProgressBar,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar }
    }

    /// Create a spinner that doesn't show (for silent mode).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    fn finish_with(&mut self, msg: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(msg);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let msg = ScanTheme::new().format_success(msg);
        self.finish_with(msg);
    }

    fn finish_error(&mut self, msg: &str) {
        let msg = ScanTheme::new().format_error(msg);
        self.finish_with(msg);
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        Some(self.bar.clone())
    }
}

/// Create an output callback that shows the latest output lines under a
/// spinner's base message.
///
/// Keeps the last `max_lines` non-empty lines; long lines are truncated.
pub fn live_output_callback(
    bar: ProgressBar,
    base_message: String,
    max_lines: usize,
) -> impl Fn(&OutputLine) {
    let buffer: Mutex<VecDeque<String>> = Mutex::new(VecDeque::new());
    let theme = ScanTheme::new();

    move |line: &OutputLine| {
        let text = line.text().trim_end();
        if text.is_empty() {
            return;
        }

        let display_text = if text.chars().count() > MAX_LINE_WIDTH {
            let head: String = text.chars().take(MAX_LINE_WIDTH - 3).collect();
            format!("{}...", head)
        } else {
            text.to_string()
        };

        let Ok(mut buf) = buffer.lock() else {
            return;
        };
        buf.push_back(display_text);
        while buf.len() > max_lines {
            buf.pop_front();
        }

        let mut msg = base_message.clone();
        for line in buf.iter() {
            msg.push_str("\n    ");
            msg.push_str(&theme.dim.apply_to(format!("» {}", line)).to_string());
        }

        bar.set_message(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_spinner_finishes() {
        let mut spinner = ProgressSpinner::hidden();
        spinner.set_message("Installing requests");
        spinner.finish_success("Installed requests");
    }

    #[test]
    fn hidden_spinner_progress_bar_returns_some() {
        let spinner = ProgressSpinner::hidden();
        assert!(spinner.progress_bar().is_some());
    }

    #[test]
    fn live_output_callback_keeps_last_lines() {
        let bar = ProgressBar::hidden();
        let callback = live_output_callback(bar.clone(), "Installing...".to_string(), 2);

        callback(&OutputLine::Stdout("Collecting requests".to_string()));
        let msg = bar.message();
        assert!(msg.contains("Installing..."));
        assert!(msg.contains("Collecting requests"));

        callback(&OutputLine::Stderr("Downloading".to_string()));
        callback(&OutputLine::Stdout("Successfully installed".to_string()));
        let msg = bar.message();
        assert!(!msg.contains("Collecting requests"));
        assert!(msg.contains("Downloading"));
        assert!(msg.contains("Successfully installed"));

        bar.finish();
    }

    #[test]
    fn live_output_callback_skips_empty_lines() {
        let bar = ProgressBar::hidden();
        let callback = live_output_callback(bar.clone(), "Installing...".to_string(), 2);

        callback(&OutputLine::Stdout("   ".to_string()));
        callback(&OutputLine::Stdout("real output".to_string()));

        let msg = bar.message();
        assert!(msg.contains("real output"));
        assert_eq!(msg.matches('\n').count(), 1);

        bar.finish();
    }

    #[test]
    fn live_output_callback_truncates_long_lines() {
        let bar = ProgressBar::hidden();
        let callback = live_output_callback(bar.clone(), "Installing...".to_string(), 2);

        callback(&OutputLine::Stdout("é".repeat(100)));
        let msg = bar.message();
        assert!(msg.contains("..."));
        assert!(!msg.contains(&"é".repeat(100)));

        bar.finish();
    }
}
