//! Progress reporting for the extractor
//!
//! Provides a live spinner using indicatif and the header and summary
//! printed around a run.

use crate::walker::{ExtractProgress, ExtractResult};
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter that displays run status
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, progress: &ExtractProgress) {
        let msg = format!(
            "Mailboxes: {} | Messages: {} | Attachments: {} | Rate: {:.0} msg/s | Queue: {} | Workers: {}",
            format_number(progress.totals.mailboxes),
            format_number(progress.totals.messages),
            format_number(progress.totals.attachments),
            progress.messages_per_second(),
            progress.queue_size,
            progress.total_workers,
        );

        self.bar.set_message(msg);
    }

    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Elapsed time as `Xm Ys`
pub fn format_elapsed(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}

/// Print a summary of the run
pub fn print_summary(result: &ExtractResult, output_dir: &str, dry_run: bool) {
    let totals = &result.totals;

    println!();
    if dry_run {
        println!("{}", style("Dry Run Complete").green().bold());
    } else {
        println!("{}", style("Extraction Complete").green().bold());
    }
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  Processed {} mailboxes with {} mails.",
        format_number(totals.mailboxes),
        format_number(totals.messages)
    );
    println!(
        "  Extracted {} attachments.",
        format_number(totals.attachments)
    );
    if !dry_run {
        println!(
            "  {} {} ({})",
            style("Output:").bold(),
            output_dir,
            format_size(totals.bytes, BINARY)
        );
    }
    if totals.failures > 0 {
        println!(
            "  {} {}",
            style("Failed:").yellow().bold(),
            format_number(totals.failures)
        );
    }
    if result.targets_skipped > 0 {
        println!(
            "  {} {} (not a directory)",
            style("Skipped targets:").yellow().bold(),
            result.targets_skipped
        );
    }
    println!("  Finished after {}.", format_elapsed(result.duration));
    println!();
}

/// Print a header at the start of the run
pub fn print_header(targets: usize, workers: usize, output: &str, pattern: &str) {
    println!();
    println!(
        "{} {}",
        style("maildir-extract").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Targets:").bold(), targets);
    println!("  {} {}", style("Workers:").bold(), workers);
    println!("  {} {}", style("Pattern:").bold(), pattern);
    println!("  {} {}", style("Output:").bold(), output);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0m 0s");
        assert_eq!(format_elapsed(Duration::from_secs(59)), "0m 59s");
        assert_eq!(format_elapsed(Duration::from_millis(125_900)), "2m 5s");
    }
}
