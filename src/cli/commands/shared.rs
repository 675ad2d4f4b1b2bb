//! Shared components for CLI commands
//!
//! Logging setup, progress bars and the human-readable run summary used
//! by both commands.

use crate::app::models::{Diagnostic, DiagnosticKind};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use tracing::debug;

/// Processing statistics for the run summary
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    /// Records accepted by schema validation
    pub records_parsed: usize,
    /// Records rejected across all stages
    pub records_rejected: usize,
    /// Records absorbed by interval aggregation
    pub records_aggregated: usize,
    /// Rows in the output table
    pub rows_written: usize,
    /// Cross-source duplicate pairs annotated
    pub duplicate_pairs: usize,
    /// Fields replaced by de-identification
    pub fields_redacted: usize,
    /// Fields flagged for manual review after a detection timeout
    pub fields_timed_out: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
}

/// Set up structured logging to stderr at the given level
pub fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mlife_processor={}", log_level)));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Create a progress bar for a pipeline stage
pub fn create_progress_bar(len: u64, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
            .expect("progress template is valid")
            .progress_chars("=> "),
    );
    pb.set_message(message);
    pb
}

/// Count diagnostics per failure classification, in a stable order
pub fn diagnostics_by_kind(diagnostics: &[Diagnostic]) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for diagnostic in diagnostics {
        *counts.entry(diagnostic.kind.label()).or_insert(0) += 1;
    }
    counts
}

/// Print the human-readable run summary
pub fn print_summary(stats: &ProcessingStats, diagnostics: &[Diagnostic], deidentified: bool) {
    println!();
    println!("{}", "Processing complete".green().bold());
    println!("  Records accepted:     {}", stats.records_parsed);
    println!("  Rows written:         {}", stats.rows_written);
    if stats.records_aggregated > 0 {
        println!("  Interval-aggregated:  {}", stats.records_aggregated);
    }
    if stats.duplicate_pairs > 0 {
        println!(
            "  Duplicate pairs:      {} (cross-referenced, both copies kept)",
            stats.duplicate_pairs
        );
    }
    if deidentified {
        println!("  Fields redacted:      {}", stats.fields_redacted);
        if stats.fields_timed_out > 0 {
            println!(
                "  {}",
                format!(
                    "Fields for manual review (detection timeout): {}",
                    stats.fields_timed_out
                )
                .yellow()
            );
        }
    }
    println!("  Processing time:      {:.2}s", stats.processing_time.as_secs_f64());

    if stats.records_rejected > 0 {
        println!();
        println!(
            "{}",
            format!("{} records rejected:", stats.records_rejected).yellow().bold()
        );
        for (kind, count) in diagnostics_by_kind(diagnostics) {
            if kind == DiagnosticKind::DetectionTimeout.label() {
                continue;
            }
            println!("  {:<22} {}", kind, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::Diagnostic;

    #[test]
    fn test_diagnostics_by_kind_counts() {
        let diagnostics = vec![
            Diagnostic::new("a:1", DiagnosticKind::MissingField, "x"),
            Diagnostic::new("a:2", DiagnosticKind::MissingField, "y"),
            Diagnostic::new("b:3", DiagnosticKind::MalformedTimestamp, "z"),
        ];

        let counts = diagnostics_by_kind(&diagnostics);
        assert_eq!(counts.get("missing field"), Some(&2));
        assert_eq!(counts.get("malformed timestamp"), Some(&1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_stats_default_is_zeroed() {
        let stats = ProcessingStats::default();
        assert_eq!(stats.records_parsed, 0);
        assert_eq!(stats.rows_written, 0);
    }
}
