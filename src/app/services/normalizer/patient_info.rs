//! Static patient data normalizer: exact recorded-at times

use super::{exact_rows, NormalizeOutcome, SourceNormalizer};
use crate::app::models::{RawRecord, SourceType, ValueKind};

pub struct PatientInfoNormalizer;

impl SourceNormalizer for PatientInfoNormalizer {
    fn source_type(&self) -> SourceType {
        SourceType::PatientInfo
    }

    fn normalize(&self, records: Vec<RawRecord>) -> NormalizeOutcome {
        exact_rows(records, ValueKind::StructuredText)
    }
}
