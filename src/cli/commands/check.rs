//! Check command implementation
//!
//! Validates an export without writing output: parses, normalizes and
//! consolidates with the default configuration, then lists every
//! diagnostic so the input can be fixed before a real run.

use super::shared::{diagnostics_by_kind, setup_logging, ProcessingStats};
use crate::app::services::consolidator::consolidate;
use crate::app::services::export_parser::ExportParser;
use crate::app::services::normalizer::normalize_all;
use crate::cli::args::CheckArgs;
use crate::config::Config;
use anyhow::Context;
use colored::Colorize;
use std::time::Instant;
use tracing::info;

/// Run validation only
pub async fn run_check(args: CheckArgs) -> anyhow::Result<ProcessingStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), false);
    info!("Checking export {}", args.input.display());

    let config = Config::default();
    let parser = ExportParser::new();
    let parse_outcome = parser
        .parse_file(&args.input)
        .with_context(|| format!("failed to parse export {}", args.input.display()))?;

    let mut diagnostics = parse_outcome.diagnostics;
    let normalize_outcome = normalize_all(parse_outcome.records, &config).await;
    diagnostics.extend(normalize_outcome.diagnostics.clone());

    let table = consolidate(normalize_outcome.rows, &config);

    println!();
    if diagnostics.is_empty() {
        println!("{}", "Export is valid".green().bold());
    } else {
        println!(
            "{}",
            format!("{} records would be rejected:", diagnostics.len()).yellow().bold()
        );
        for (kind, count) in diagnostics_by_kind(&diagnostics) {
            println!("  {:<22} {}", kind, count);
        }
        println!();
        for diagnostic in &diagnostics {
            println!("  {}", diagnostic);
        }
    }
    println!();
    println!(
        "  {} records accepted, {} table rows, {} duplicate pairs",
        normalize_outcome.records_in,
        table.rows.len(),
        table.stats.duplicate_pairs
    );

    Ok(ProcessingStats {
        records_parsed: normalize_outcome.records_in,
        records_rejected: diagnostics.len(),
        records_aggregated: normalize_outcome.records_aggregated,
        rows_written: 0,
        duplicate_pairs: table.stats.duplicate_pairs,
        fields_redacted: 0,
        fields_timed_out: 0,
        processing_time: start_time.elapsed(),
    })
}
