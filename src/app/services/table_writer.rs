//! Output table and run report writing
//!
//! The output is one semicolon-delimited UTF-8 file with exactly the five
//! long-format columns, one row per measurement or event, already sorted
//! by the consolidator. Row metadata (policy, value kind, duplicate
//! relations) is never written to the table; the optional JSON report
//! carries the run counters and the collected diagnostics instead.

use crate::app::models::Diagnostic;
use crate::app::services::consolidator::ConsolidatedTable;
use crate::constants::OUTPUT_DATETIME_FORMAT;
use crate::Result;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Column headers of the output table
const OUTPUT_HEADERS: [&str; 5] = ["timestamp", "source_type", "category", "parameter", "value"];

/// Write the consolidated table to a file; returns the row count
pub fn write_table(table: &ConsolidatedTable, path: &Path) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .map_err(|e| {
            crate::Error::table_writing(
                format!("cannot create output file {}", path.display()),
                Some(e),
            )
        })?;

    let rows = write_table_to(table, &mut writer)?;
    info!("Wrote {} rows to {}", rows, path.display());
    Ok(rows)
}

/// Write the consolidated table to an open writer; returns the row count
pub fn write_table_to<W: Write>(
    table: &ConsolidatedTable,
    writer: &mut csv::Writer<W>,
) -> Result<usize> {
    writer.write_record(OUTPUT_HEADERS)?;

    for row in &table.rows {
        writer.write_record([
            row.timestamp.format(OUTPUT_DATETIME_FORMAT).to_string().as_str(),
            row.source_type.to_string().as_str(),
            row.category.as_str(),
            row.parameter.as_str(),
            row.value.as_str(),
        ])?;
    }

    writer
        .flush()
        .map_err(|e| crate::Error::io("flushing output table failed", e))?;
    Ok(table.rows.len())
}

/// Machine-readable run report: counters plus every collected diagnostic
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Records accepted by schema validation
    pub records_parsed: usize,
    /// Records rejected across all stages
    pub records_rejected: usize,
    /// Rows in the output table
    pub rows_written: usize,
    /// Cross-source duplicate pairs annotated
    pub duplicate_pairs: usize,
    /// Fields replaced by de-identification
    pub fields_redacted: usize,
    /// Fields flagged for manual review after a detection timeout
    pub fields_timed_out: usize,
    /// All diagnostics in collection order
    pub diagnostics: Vec<Diagnostic>,
}

/// Write the run report as pretty-printed JSON
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| crate::Error::internal(format!("report serialization failed: {}", e)))?;
    fs::write(path, json)
        .map_err(|e| crate::Error::io(format!("cannot write report {}", path.display()), e))?;
    info!("Wrote run report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{AggregationPolicy, LongRow, SourceType, ValueKind};
    use crate::app::services::consolidator::consolidate;
    use crate::config::Config;
    use chrono::{TimeZone, Utc};

    fn sample_table() -> ConsolidatedTable {
        let rows = vec![
            LongRow::new(
                Utc.with_ymd_and_hms(2024, 8, 6, 14, 50, 0).unwrap(),
                SourceType::Vitals,
                "Vitalwerte online",
                "HF",
                "82",
                ValueKind::Numeric,
                AggregationPolicy::HourlyFirst,
            ),
            LongRow::new(
                Utc.with_ymd_and_hms(2024, 8, 6, 15, 10, 0).unwrap(),
                SourceType::Documentation,
                "Visite",
                "Eintrag",
                "Patient wach; Kreislauf stabil",
                ValueKind::FreeText,
                AggregationPolicy::Exact,
            ),
        ];
        consolidate(rows, &Config::default())
    }

    fn render(table: &ConsolidatedTable) -> String {
        let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(Vec::new());
        write_table_to(table, &mut writer).unwrap();
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_output_has_exactly_five_columns() {
        let output = render(&sample_table());
        let mut lines = output.lines();
        assert_eq!(
            lines.next().unwrap(),
            "timestamp;source_type;category;parameter;value"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-08-06 14:50:00;Vitals;Vitalwerte online;HF;82"
        );
    }

    #[test]
    fn test_free_text_with_delimiter_is_quoted() {
        let output = render(&sample_table());
        // The csv writer quotes values containing the delimiter
        assert!(output.contains("\"Patient wach; Kreislauf stabil\""));
    }

    #[test]
    fn test_timestamps_render_sortable() {
        let output = render(&sample_table());
        let data_lines: Vec<&str> = output.lines().skip(1).collect();
        let timestamps: Vec<&str> = data_lines
            .iter()
            .map(|line| line.split(';').next().unwrap())
            .collect();
        let mut sorted = timestamps.to_vec();
        sorted.sort();
        assert_eq!(timestamps, sorted);
    }
}
