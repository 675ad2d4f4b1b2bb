//! Tests for export file parsing and section handling

use super::{create_faulty_export, create_test_export};
use crate::app::models::{DiagnosticKind, SourceType};
use crate::app::services::export_parser::ExportParser;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_parse_complete_export() {
    let parser = ExportParser::new();
    let outcome = parser.parse_str(&create_test_export()).unwrap();

    assert_eq!(outcome.rejected_count(), 0);
    assert_eq!(outcome.records.len(), 15);
    assert_eq!(outcome.rows_seen, 15);
    assert_eq!(outcome.rows_in_unknown_sections, 0);

    // Every section contributed records
    for source_type in SourceType::all() {
        assert!(
            outcome
                .records
                .iter()
                .any(|r| r.source_type == source_type),
            "no records parsed for {}",
            source_type
        );
    }
}

#[test]
fn test_rejected_records_are_classified_not_fatal() {
    let parser = ExportParser::new();
    let outcome = parser.parse_str(&create_faulty_export()).unwrap();

    // The one valid vitals row survives
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].parameter, "HF");
    assert_eq!(outcome.records[0].value, "78");

    let kinds: Vec<DiagnosticKind> = outcome.diagnostics.iter().map(|d| d.kind).collect();
    assert!(kinds.contains(&DiagnosticKind::MalformedTimestamp));
    assert!(kinds.contains(&DiagnosticKind::UnknownParameter));
    assert!(kinds.contains(&DiagnosticKind::MalformedNumeric));
    assert!(kinds.contains(&DiagnosticKind::MissingField));
    assert_eq!(outcome.rejected_count(), 4);
}

#[test]
fn test_diagnostic_identifies_section_and_line() {
    let parser = ExportParser::new();
    let outcome = parser.parse_str(&create_faulty_export()).unwrap();

    let timestamp_error = outcome
        .diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::MalformedTimestamp)
        .unwrap();
    assert_eq!(timestamp_error.record_id, "Vitalwerte:2");
}

#[test]
fn test_data_before_section_marker_is_fatal() {
    let parser = ExportParser::new();
    let content = "06.08.2024 14:50;Vitalwerte online;HF;82\n[Vitalwerte]\n";
    assert!(parser.parse_str(content).is_err());
}

#[test]
fn test_no_sections_is_fatal() {
    let parser = ExportParser::new();
    assert!(parser.parse_str("").is_err());
    assert!(parser.parse_str("# nur ein Kommentar\n").is_err());
}

#[test]
fn test_unknown_section_rows_are_skipped_with_count() {
    let parser = ExportParser::new();
    let content = r#"[Vitalwerte]
06.08.2024 14:50;Vitalwerte online;HF;82
[Pflegeplanung]
06.08.2024 14:50;irgendwas
06.08.2024 15:00;noch etwas
"#;
    let outcome = parser.parse_str(content).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.rows_in_unknown_sections, 2);
    assert_eq!(outcome.rejected_count(), 0);
}

#[test]
fn test_comments_and_blank_lines_are_skipped() {
    let parser = ExportParser::new();
    let content = r#"# Kopfzeile

[Vitalwerte]

# Kommentar mitten in der Sektion
06.08.2024 14:50;Vitalwerte online;HF;82
"#;
    let outcome = parser.parse_str(content).unwrap();
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.rows_seen, 1);
}

#[test]
fn test_parse_file_roundtrip() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", create_test_export()).unwrap();

    let parser = ExportParser::new();
    let outcome = parser.parse_file(file.path()).unwrap();
    assert_eq!(outcome.records.len(), 15);
}

#[test]
fn test_missing_file_is_io_error() {
    let parser = ExportParser::new();
    let result = parser.parse_file(std::path::Path::new("/nonexistent/export.csv"));
    assert!(result.is_err());
}
