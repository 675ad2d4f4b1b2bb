//! Process command implementation
//!
//! Orchestrates the complete pipeline: parse and validate the export,
//! normalize per source type, consolidate, optionally de-identify, write
//! the output table and report the outcome. The output table is always
//! produced from whatever records validated successfully; rejected-record
//! counts are surfaced alongside it, never swallowed.

use super::shared::{create_progress_bar, print_summary, setup_logging, ProcessingStats};
use crate::app::services::consolidator::consolidate;
use crate::app::services::deidentifier::Deidentifier;
use crate::app::services::export_parser::ExportParser;
use crate::app::services::normalizer::normalize_all;
use crate::app::services::table_writer::{write_report, write_table, RunReport};
use crate::cli::args::ProcessArgs;
use anyhow::Context;
use std::time::Instant;
use tracing::{debug, info};

/// Run the full processing pipeline
pub async fn run_process(args: ProcessArgs) -> anyhow::Result<ProcessingStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet);
    info!("Starting m.life processor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.to_config()?;

    // Configuration errors are fatal before any record is touched: the
    // model and the blacklist load first
    let deidentifier = if config.deidentify.enabled {
        Some(Deidentifier::from_config(&config).context("de-identification setup failed")?)
    } else {
        None
    };

    // Parse and validate
    let parser = ExportParser::new();
    let parse_outcome = parser
        .parse_file(&args.input)
        .with_context(|| format!("failed to parse export {}", args.input.display()))?;
    info!(
        "Parsed export: {} records accepted, {} rejected",
        parse_outcome.records.len(),
        parse_outcome.rejected_count()
    );

    let mut diagnostics = parse_outcome.diagnostics;

    // Normalize per source type (concurrent batches)
    let normalize_outcome = normalize_all(parse_outcome.records, &config).await;
    let records_parsed = normalize_outcome.records_in;
    let records_aggregated = normalize_outcome.records_aggregated;
    diagnostics.extend(normalize_outcome.diagnostics.clone());

    // Consolidate into the canonical table
    let mut table = consolidate(normalize_outcome.rows, &config);

    // De-identify in place (values only)
    let mut fields_redacted = 0;
    let mut fields_timed_out = 0;
    if let Some(deidentifier) = &deidentifier {
        let progress = args
            .show_progress()
            .then(|| create_progress_bar(table.rows.len() as u64, "De-identifying"));

        let (deid_stats, deid_diagnostics) = deidentifier
            .deidentify_table(&mut table, progress.clone())
            .await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        fields_redacted = deid_stats.fields_redacted;
        fields_timed_out = deid_stats.fields_timed_out;
        diagnostics.extend(deid_diagnostics);
    }

    // Write the output table
    let rows_written = write_table(&table, &args.output)
        .with_context(|| format!("failed to write output table {}", args.output.display()))?;

    let stats = ProcessingStats {
        records_parsed,
        records_rejected: diagnostics
            .iter()
            .filter(|d| d.kind != crate::app::models::DiagnosticKind::DetectionTimeout)
            .count(),
        records_aggregated,
        rows_written,
        duplicate_pairs: table.stats.duplicate_pairs,
        fields_redacted,
        fields_timed_out,
        processing_time: start_time.elapsed(),
    };

    // Optional machine-readable report
    if let Some(report_path) = &args.report {
        let report = RunReport {
            records_parsed: stats.records_parsed,
            records_rejected: stats.records_rejected,
            rows_written: stats.rows_written,
            duplicate_pairs: stats.duplicate_pairs,
            fields_redacted: stats.fields_redacted,
            fields_timed_out: stats.fields_timed_out,
            diagnostics: diagnostics.clone(),
        };
        write_report(&report, report_path)
            .with_context(|| format!("failed to write report {}", report_path.display()))?;
    }

    if !args.quiet {
        print_summary(&stats, &diagnostics, deidentifier.is_some());
        println!(
            "\nOutput table: {}",
            args.output.display()
        );
    }

    Ok(stats)
}
