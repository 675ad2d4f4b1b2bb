//! Clinical documentation normalizer: exact event times, free text
//!
//! Rows from the known free-text categories (Arztnotizen, Visite, ...)
//! are the only ones eligible for entity recognition downstream.

use super::{exact_rows, NormalizeOutcome, SourceNormalizer};
use crate::app::models::{RawRecord, SourceType, ValueKind};

pub struct DocumentationNormalizer;

impl SourceNormalizer for DocumentationNormalizer {
    fn source_type(&self) -> SourceType {
        SourceType::Documentation
    }

    fn normalize(&self, records: Vec<RawRecord>) -> NormalizeOutcome {
        exact_rows(records, ValueKind::FreeText)
    }
}
