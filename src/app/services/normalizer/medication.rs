//! Medication normalizer: exact administration event times

use super::{exact_rows, NormalizeOutcome, SourceNormalizer};
use crate::app::models::{RawRecord, SourceType, ValueKind};

pub struct MedicationNormalizer;

impl SourceNormalizer for MedicationNormalizer {
    fn source_type(&self) -> SourceType {
        SourceType::Medication
    }

    fn normalize(&self, records: Vec<RawRecord>) -> NormalizeOutcome {
        // Doses are structured text ("0,12 ug/kg/min"): eligible for
        // blacklist matching but never for entity recognition
        exact_rows(records, ValueKind::StructuredText)
    }
}
