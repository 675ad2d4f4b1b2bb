//! Tests for the de-identification pipeline policy
//!
//! Covers the exception rules, detector composition and the guarantee
//! that the stage only ever replaces values.

use super::test_model;
use crate::app::models::{AggregationPolicy, LongRow, SourceType, ValueKind};
use crate::app::services::consolidator::{consolidate, ConsolidatedTable};
use crate::app::services::deidentifier::{
    BlacklistIndex, Deidentifier, EntityRecognizer,
};
use crate::config::Config;
use chrono::{TimeZone, Utc};
use std::sync::Arc;

fn row(kind: ValueKind, value: &str) -> LongRow {
    let source_type = match kind {
        ValueKind::Numeric => SourceType::Vitals,
        ValueKind::StructuredText => SourceType::PatientInfo,
        ValueKind::FreeText => SourceType::Documentation,
    };
    LongRow::new(
        Utc.with_ymd_and_hms(2024, 8, 6, 15, 10, 0).unwrap(),
        source_type,
        "Test",
        "Eintrag",
        value,
        kind,
        AggregationPolicy::Exact,
    )
}

fn table_of(rows: Vec<LongRow>) -> ConsolidatedTable {
    consolidate(rows, &Config::default())
}

fn deidentifier(blacklist_terms: &[&str]) -> Deidentifier {
    let recognizer = Arc::new(EntityRecognizer::new(test_model()));
    let blacklist = if blacklist_terms.is_empty() {
        None
    } else {
        Some(Arc::new(BlacklistIndex::new(
            blacklist_terms.iter().map(|t| t.to_string()).collect(),
            true,
            85.0,
        )))
    };
    Deidentifier::new(recognizer, blacklist, None, 2)
}

#[tokio::test]
async fn test_blacklist_term_in_free_text() {
    // Fuzzy blacklist at the default threshold; umlauts keep byte offsets
    // on char boundaries
    let mut table = table_of(vec![row(
        ValueKind::FreeText,
        "Patient Schmidt klagt über Schmerzen",
    )]);

    let (stats, diagnostics) = deidentifier(&["Schmidt"])
        .deidentify_table(&mut table, None)
        .await
        .unwrap();

    assert_eq!(
        table.rows[0].value,
        "Patient <ANONYM> klagt über Schmerzen"
    );
    assert_eq!(stats.fields_redacted, 1);
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn test_numeric_value_is_never_altered() {
    // An SpO2 reading shaped like a blacklist term stays verbatim
    let mut table = table_of(vec![row(ValueKind::Numeric, "97")]);

    let (stats, _) = deidentifier(&["97"])
        .deidentify_table(&mut table, None)
        .await
        .unwrap();

    assert_eq!(table.rows[0].value, "97");
    assert_eq!(stats.fields_redacted, 0);
    assert_eq!(stats.fields_skipped, 1);
}

#[tokio::test]
async fn test_short_text_is_never_altered() {
    // Exact blacklist hit on "ja" must not fire: length rule wins
    let mut table = table_of(vec![row(ValueKind::StructuredText, "ja")]);

    let (stats, _) = deidentifier(&["ja"])
        .deidentify_table(&mut table, None)
        .await
        .unwrap();

    assert_eq!(table.rows[0].value, "ja");
    assert_eq!(stats.fields_scanned, 0);
    assert_eq!(stats.fields_skipped, 1);
}

#[tokio::test]
async fn test_structured_text_gets_blacklist_only() {
    // "Weber" is in the lexicon, but structured fields never see the
    // entity recognizer; only the blacklist fires
    let mut table = table_of(vec![
        row(ValueKind::StructuredText, "Station WDA1I, Weber"),
        row(ValueKind::StructuredText, "Zimmer 12, Schmidt"),
    ]);

    let (_, _) = deidentifier(&["Schmidt"])
        .deidentify_table(&mut table, None)
        .await
        .unwrap();

    let values: Vec<&str> = table.rows.iter().map(|r| r.value.as_str()).collect();
    assert!(values.contains(&"Station WDA1I, Weber"));
    assert!(values.contains(&"Zimmer 12, <ANONYM>"));
}

#[tokio::test]
async fn test_structured_text_without_blacklist_is_skipped() {
    let mut table = table_of(vec![row(ValueKind::StructuredText, "Zimmer 12, Schmidt")]);

    let (stats, _) = deidentifier(&[])
        .deidentify_table(&mut table, None)
        .await
        .unwrap();

    assert_eq!(table.rows[0].value, "Zimmer 12, Schmidt");
    assert_eq!(stats.fields_scanned, 0);
}

#[tokio::test]
async fn test_free_text_gets_entity_recognition_without_blacklist() {
    let mut table = table_of(vec![row(
        ValueKind::FreeText,
        "Visite durch Dr. Maier, Kreislauf stabil",
    )]);

    let (stats, _) = deidentifier(&[])
        .deidentify_table(&mut table, None)
        .await
        .unwrap();

    assert_eq!(
        table.rows[0].value,
        "Visite durch Dr. <ANONYM>, Kreislauf stabil"
    );
    assert_eq!(stats.fields_redacted, 1);
}

#[tokio::test]
async fn test_contact_entities_get_kontakt_placeholder() {
    let mut table = table_of(vec![row(
        ValueKind::FreeText,
        "Angehoerige: erika.muster@klinik.de, Tel. 0176 4455667",
    )]);

    deidentifier(&[]).deidentify_table(&mut table, None).await.unwrap();

    assert_eq!(
        table.rows[0].value,
        "Angehoerige: <KONTAKT>, Tel. <KONTAKT>"
    );
}

#[tokio::test]
async fn test_detectors_compose_on_one_field() {
    let mut table = table_of(vec![row(
        ValueKind::FreeText,
        "Uebergabe an Schwester Meyer, Patient Schmidt stabil",
    )]);

    // "Meyer" only via blacklist, "Schmidt" via lexicon and blacklist
    deidentifier(&["Meyer"])
        .deidentify_table(&mut table, None)
        .await
        .unwrap();

    assert_eq!(
        table.rows[0].value,
        "Uebergabe an Schwester <ANONYM>, Patient <ANONYM> stabil"
    );
}

#[tokio::test]
async fn test_stage_replaces_values_only() {
    let mut table = table_of(vec![
        row(ValueKind::FreeText, "Patient Schmidt klagt ueber Schmerzen"),
        row(ValueKind::Numeric, "97"),
    ]);
    let order_before: Vec<(u64, chrono::DateTime<Utc>)> =
        table.rows.iter().map(|r| (r.row_id, r.timestamp)).collect();

    deidentifier(&["Schmidt"])
        .deidentify_table(&mut table, None)
        .await
        .unwrap();

    let order_after: Vec<(u64, chrono::DateTime<Utc>)> =
        table.rows.iter().map(|r| (r.row_id, r.timestamp)).collect();
    assert_eq!(order_before, order_after);
}

#[tokio::test]
async fn test_repeated_runs_are_deterministic() {
    let build = || {
        table_of(vec![row(
            ValueKind::FreeText,
            "Dr. Weber und Schwester Schmitd besprechen den Befund",
        )])
    };

    let mut first = build();
    let mut second = build();
    let deid = deidentifier(&["Schmidt"]);
    deid.deidentify_table(&mut first, None).await.unwrap();
    deid.deidentify_table(&mut second, None).await.unwrap();

    assert_eq!(first.rows[0].value, second.rows[0].value);
}
