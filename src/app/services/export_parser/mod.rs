//! m.life export file parsing
//!
//! The export is a UTF-8, semicolon-delimited file organized in sections.
//! A section starts with a `[SectionName]` marker line naming the export
//! category; the rows that follow use that section's layout until the next
//! marker. Blank lines and `#`-prefixed comment lines are skipped.
//!
//! Rejected records do not abort the run: each failure is recorded as one
//! classified [`Diagnostic`] and parsing continues with the next row. Only
//! structural problems (data before any section marker, no sections at
//! all) are fatal.

pub mod field_parsers;
pub mod record_parser;

#[cfg(test)]
mod tests;

use crate::app::models::{Diagnostic, RawRecord, SourceType};
use crate::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Result of parsing one export file
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Schema-validated records ready for normalization
    pub records: Vec<RawRecord>,
    /// One entry per rejected record
    pub diagnostics: Vec<Diagnostic>,
    /// Data rows seen (excluding markers, comments and blank lines)
    pub rows_seen: usize,
    /// Rows skipped because their section is not recognized
    pub rows_in_unknown_sections: usize,
}

impl ParseOutcome {
    /// Number of records rejected with a diagnostic
    pub fn rejected_count(&self) -> usize {
        self.diagnostics.len()
    }
}

/// Parser for sectioned m.life export files
#[derive(Debug, Default)]
pub struct ExportParser;

impl ExportParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse an export file from disk
    pub fn parse_file(&self, path: &Path) -> Result<ParseOutcome> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("failed to read export file {}", path.display()), e))?;
        self.parse_str(&content)
    }

    /// Parse export content
    pub fn parse_str(&self, content: &str) -> Result<ParseOutcome> {
        let mut outcome = ParseOutcome::default();
        // None until the first marker; Some(None) inside an unknown section
        let mut current_section: Option<Option<SourceType>> = None;
        let mut sections_seen = 0usize;

        for (index, raw_line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = parse_section_marker(line) {
                sections_seen += 1;
                match SourceType::from_section(name) {
                    Some(source_type) => {
                        debug!("Entering section [{}] at line {}", name, line_no);
                        current_section = Some(Some(source_type));
                    }
                    None => {
                        warn!(
                            "Unknown section [{}] at line {}; its rows will be skipped",
                            name, line_no
                        );
                        current_section = Some(None);
                    }
                }
                continue;
            }

            let section = match current_section {
                Some(section) => section,
                None => {
                    return Err(Error::export_format(
                        line_no,
                        "data row before the first section marker",
                    ));
                }
            };

            outcome.rows_seen += 1;

            let source_type = match section {
                Some(source_type) => source_type,
                None => {
                    outcome.rows_in_unknown_sections += 1;
                    continue;
                }
            };

            let fields: Vec<&str> = line.split(';').collect();
            let record_id = format!("{}:{}", source_type.section_name(), line_no);

            match record_parser::parse_record(source_type, &fields, &record_id) {
                Ok(record) => outcome.records.push(record),
                Err(error) => {
                    debug!("Rejected record {}: {}", record_id, error);
                    outcome.diagnostics.push(error.into_diagnostic(record_id));
                }
            }
        }

        if sections_seen == 0 {
            return Err(Error::export_format(
                0,
                "no section markers found; not an m.life export",
            ));
        }

        debug!(
            "Parsed export: {} records accepted, {} rejected, {} rows in unknown sections",
            outcome.records.len(),
            outcome.rejected_count(),
            outcome.rows_in_unknown_sections
        );

        Ok(outcome)
    }
}

/// Extract the section name from a `[SectionName]` marker line
fn parse_section_marker(line: &str) -> Option<&str> {
    line.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}
