//! Spinner helpers using indicatif
//!
//! The pipeline's long operations (polars collects, gradient descent) are
//! all indeterminate, so spinners are the only progress shape in use.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a steadily ticking spinner for indeterminate work
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Replace the spinner with a check mark and a final message
pub fn finish_with_success(spinner: &ProgressBar, message: &str) {
    spinner.finish_with_message(format!("✓ {}", message));
}
