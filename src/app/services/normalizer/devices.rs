//! Device normalizer: exact event times
//!
//! Connected device feeds (Impella, ECMO, IABP, dialysis) report at exact
//! recorded times. Some device parameters are auto-mapped into the vitals
//! feed by the export tool; the consolidator annotates those pairs.

use super::{exact_rows, NormalizeOutcome, SourceNormalizer};
use crate::app::models::{RawRecord, SourceType, ValueKind};

pub struct DeviceNormalizer;

impl SourceNormalizer for DeviceNormalizer {
    fn source_type(&self) -> SourceType {
        SourceType::Device
    }

    fn normalize(&self, records: Vec<RawRecord>) -> NormalizeOutcome {
        exact_rows(records, ValueKind::Numeric)
    }
}
