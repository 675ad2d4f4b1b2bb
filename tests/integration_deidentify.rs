//! End-to-end de-identification tests
//!
//! Exercises the pipeline the way the process command does with
//! --deidentify: configuration-driven setup (model artifact and blacklist
//! files on disk), then the policy scenarios.

use mlife_processor::app::services::consolidator::{consolidate, ConsolidatedTable};
use mlife_processor::app::services::deidentifier::Deidentifier;
use mlife_processor::app::services::export_parser::ExportParser;
use mlife_processor::app::services::normalizer::normalize_all;
use mlife_processor::{Config, Error, SourceType};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

const MODEL_JSON: &str = r#"{
    "name": "de_clinical_lexicon",
    "version": "2024.2",
    "given_names": ["Max", "Erika"],
    "family_names": ["Schmidt", "Weber"],
    "titles": ["Dr", "Prof", "Herr", "Frau"]
}"#;

const EXPORT: &str = r#"[Vitalwerte]
06.08.2024 14:50;Vitalwerte online;SpO2;97

[Patientendaten]
06.08.2024 08:00;Eigenanamnese;ja
06.08.2024 08:00;Zimmer;Zimmer 12, Schmidt

[Dokumentation]
06.08.2024 15:10;Visite;Patient Schmidt klagt über Schmerzen
06.08.2024 15:20;Arztnotizen;Angehoerige erreichbar unter 0176 4455667
"#;

struct Fixture {
    _dir: TempDir,
    config: Config,
}

fn fixture(blacklist_terms: &[&str]) -> Fixture {
    let dir = TempDir::new().unwrap();

    let model_path = dir.path().join("lexicon.json");
    std::fs::write(&model_path, MODEL_JSON).unwrap();

    let mut config = Config::default().with_deidentification(model_path);
    if !blacklist_terms.is_empty() {
        let blacklist_path = dir.path().join("blacklist.txt");
        let mut file = std::fs::File::create(&blacklist_path).unwrap();
        for term in blacklist_terms {
            writeln!(file, "{}", term).unwrap();
        }
        config = config.with_blacklist(blacklist_path);
    }

    Fixture { _dir: dir, config }
}

async fn run_pipeline(fixture: &Fixture) -> ConsolidatedTable {
    let parser = ExportParser::new();
    let outcome = parser.parse_str(EXPORT).unwrap();
    let normalized = normalize_all(outcome.records, &fixture.config).await;
    let mut table = consolidate(normalized.rows, &fixture.config);

    let deidentifier = Deidentifier::from_config(&fixture.config).unwrap();
    deidentifier.deidentify_table(&mut table, None).await.unwrap();
    table
}

fn value_of<'a>(table: &'a ConsolidatedTable, source_type: SourceType, parameter: &str) -> &'a str {
    table
        .rows
        .iter()
        .find(|r| r.source_type == source_type && r.parameter == parameter)
        .map(|r| r.value.as_str())
        .unwrap()
}

#[tokio::test]
async fn test_blacklist_scenario_in_free_text() {
    let fixture = fixture(&["Schmidt"]);
    let table = run_pipeline(&fixture).await;

    let visite = table
        .rows
        .iter()
        .find(|r| r.category == "Visite")
        .unwrap();
    assert_eq!(visite.value, "Patient <ANONYM> klagt über Schmerzen");
}

#[tokio::test]
async fn test_numeric_vital_is_never_altered() {
    // A blacklist term shaped like the SpO2 value must not touch it
    let fixture = fixture(&["97"]);
    let table = run_pipeline(&fixture).await;

    assert_eq!(value_of(&table, SourceType::Vitals, "SpO2"), "97");
}

#[tokio::test]
async fn test_short_answer_is_never_altered() {
    // Exact blacklist hit on the two-character answer must not fire
    let fixture = fixture(&["ja"]);
    let table = run_pipeline(&fixture).await;

    assert_eq!(value_of(&table, SourceType::PatientInfo, "Eigenanamnese"), "ja");
}

#[tokio::test]
async fn test_structured_text_blacklist_only() {
    let fixture = fixture(&["Schmidt"]);
    let table = run_pipeline(&fixture).await;

    assert_eq!(
        value_of(&table, SourceType::PatientInfo, "Zimmer"),
        "Zimmer 12, <ANONYM>"
    );
}

#[tokio::test]
async fn test_phone_number_in_notes_becomes_kontakt() {
    let fixture = fixture(&[]);
    let table = run_pipeline(&fixture).await;

    let notes = table
        .rows
        .iter()
        .find(|r| r.category == "Arztnotizen")
        .unwrap();
    assert_eq!(notes.value, "Angehoerige erreichbar unter <KONTAKT>");
}

#[tokio::test]
async fn test_missing_model_is_fatal_at_startup() {
    let config = Config::default().with_deidentification(PathBuf::from("/nonexistent/lexicon.json"));
    let result = Deidentifier::from_config(&config);
    assert!(matches!(result, Err(Error::LanguageModel { .. })));
}

#[tokio::test]
async fn test_unreadable_blacklist_is_fatal_at_startup() {
    let dir = TempDir::new().unwrap();
    let model_path = dir.path().join("lexicon.json");
    std::fs::write(&model_path, MODEL_JSON).unwrap();

    let config = Config::default()
        .with_deidentification(model_path)
        .with_blacklist(dir.path().join("missing_blacklist.txt"));
    let result = Deidentifier::from_config(&config);
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[tokio::test]
async fn test_without_blacklist_ner_still_runs_on_free_text() {
    let fixture = fixture(&[]);
    let table = run_pipeline(&fixture).await;

    // "Schmidt" is in the lexicon: the NER catches it without any blacklist
    let visite = table
        .rows
        .iter()
        .find(|r| r.category == "Visite")
        .unwrap();
    assert_eq!(visite.value, "Patient <ANONYM> klagt über Schmerzen");

    // Structured text stays untouched without a blacklist
    assert_eq!(
        value_of(&table, SourceType::PatientInfo, "Zimmer"),
        "Zimmer 12, Schmidt"
    );
}
