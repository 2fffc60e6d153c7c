//! Progress reporting for CLI commands, using indicatif

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner template used by CLI commands
pub const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

/// Create a steadily ticking spinner with a message
#[must_use]
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Stop a spinner and leave a final message on screen
pub fn finish_spinner(spinner: &ProgressBar, message: &str) {
    spinner.finish_with_message(message.to_string());
}
