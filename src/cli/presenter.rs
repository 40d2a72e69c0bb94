//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::device::DeviceInventory;
use crate::domain::permission::{Capability, PermissionStatus, PermissionTracker};
use crate::domain::session::Elapsed;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.red} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Format the recording timer, with the auto-stop limit when one is set
    pub fn format_recording(&self, elapsed_seconds: u64, limit: Option<u64>) -> String {
        match limit {
            Some(limit) => format!(
                "Recording {} / {}",
                Elapsed(elapsed_seconds),
                Elapsed(limit)
            ),
            None => format!("Recording {}  (Ctrl-C to stop)", Elapsed(elapsed_seconds)),
        }
    }

    /// Update recording progress
    pub fn update_recording_progress(&self, elapsed_seconds: u64, limit: Option<u64>) {
        self.update_spinner(&self.format_recording(elapsed_seconds, limit));
    }

    /// Print the device inventory as a grouped list
    pub fn devices(&self, inventory: &DeviceInventory) {
        println!("{}", "Screens".bold());
        for screen in &inventory.screens {
            println!("  {} {}", screen.name, format!("(display {})", screen.display_index).dimmed());
        }
        println!("{}", "Cameras".bold());
        if inventory.cameras.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for camera in &inventory.cameras {
            println!("  {} {}", camera.name, format!("[{}]", camera.id).dimmed());
        }
        println!("{}", "Microphones".bold());
        if inventory.microphones.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for mic in &inventory.microphones {
            println!("  {} {}", mic.name, format!("[{}]", mic.id).dimmed());
        }
    }

    /// Print one line per capability
    pub fn permissions(&self, tracker: &PermissionTracker) {
        for capability in Capability::ALL {
            let status = tracker.status(capability);
            println!("{}: {}", capability.as_str().cyan(), colorize_status(status));
        }
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

fn colorize_status(status: PermissionStatus) -> ColoredString {
    match status {
        PermissionStatus::Granted => status.as_str().green(),
        PermissionStatus::Denied => status.as_str().red(),
        PermissionStatus::Loading => status.as_str().yellow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_recording_at_start() {
        let presenter = Presenter::new();
        let progress = presenter.format_recording(0, Some(10));
        assert!(progress.contains("00:00 / 00:10"));
    }

    #[test]
    fn format_recording_without_limit() {
        let presenter = Presenter::new();
        let progress = presenter.format_recording(75, None);
        assert!(progress.contains("01:15"));
        assert!(progress.contains("Ctrl-C"));
    }

    #[test]
    fn spinner_lifecycle() {
        let mut presenter = Presenter::new();
        assert!(presenter.spinner.is_none());
        presenter.start_spinner("Recording");
        assert!(presenter.spinner.is_some());
        presenter.spinner_success("done");
        assert!(presenter.spinner.is_none());
    }
}
