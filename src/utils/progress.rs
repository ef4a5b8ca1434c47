//! Progress indicators for CLI mode
//!
//! This module provides progress display using indicatif and console.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress tracker for a batch of inspections
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Create a new progress tracker for the given number of targets
    pub fn new(total_targets: u64, message: &str) -> Self {
        let bar = ProgressBar::new(total_targets);
        if let Ok(progress_style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(progress_style.progress_chars("#>-"));
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Hidden tracker, used when output must stay machine-readable
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Record one finished target
    pub fn complete_target(&self, line: &str) {
        self.bar.println(line);
        self.bar.inc(1);
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Create a simple spinner for indeterminate operations
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Print a pass status
pub fn print_pass(message: &str) {
    println!("  {} {}", style("✓").green(), message);
}

/// Print a fail status
pub fn print_fail(message: &str) {
    println!("  {} {}", style("✗").red(), message);
}

/// Print an info status
pub fn print_info(message: &str) {
    println!("  {} {}", style("ℹ").cyan(), message);
}
