//! Test utilities for de-identification testing

mod pipeline_tests;

use crate::app::services::deidentifier::language_model::LanguageModel;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// A small lexicon artifact with common German test names
pub fn test_artifact_json() -> &'static str {
    r#"{
        "name": "de_clinical_lexicon",
        "version": "2024.2",
        "given_names": ["Max", "Erika", "Hans"],
        "family_names": ["Schmidt", "Muster", "Weber"],
        "titles": ["Dr", "Prof", "Herr", "Frau"]
    }"#
}

/// Write an artifact to a temp file and keep the file alive
pub fn write_artifact(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

/// Load the standard test model
pub fn test_model() -> Arc<LanguageModel> {
    let file = write_artifact(test_artifact_json());
    Arc::new(LanguageModel::load(file.path()).unwrap())
}
