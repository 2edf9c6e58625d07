//! CLI console utilities

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Formatted terminal output; silent on stdout when JSON output is requested
pub struct CliConsole {
    json: bool,
    progress_bar: Option<ProgressBar>,
}

impl CliConsole {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            progress_bar: None,
        }
    }

    /// Print an informational line
    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{}", message);
        }
    }

    /// Print an error and its remediation steps to stderr
    pub fn error(&self, name: &str, message: &str, actions: &[String]) {
        eprintln!("{} {}", format!("Error ({}):", name).red().bold(), message);
        if !actions.is_empty() {
            eprintln!();
            eprintln!("{}", "Try this:".bold());
            for action in actions {
                eprintln!("  {}", action);
            }
        }
    }

    /// Start a spinner on stderr
    pub fn start_progress(&mut self, message: &str) {
        if self.json {
            return;
        }
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        self.progress_bar = Some(pb);
    }

    /// Remove the spinner
    pub fn finish_progress(&mut self) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for CliConsole {
    fn drop(&mut self) {
        self.finish_progress();
    }
}
