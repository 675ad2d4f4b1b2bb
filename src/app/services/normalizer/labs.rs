//! Laboratory normalizer: first value per 30-minute interval
//!
//! Lab panels are exported half-hour aligned; the bucket stamp sits on the
//! half-hour boundary with no offset.

use super::{first_of_interval, NormalizeOutcome, SourceNormalizer};
use crate::app::models::{AggregationPolicy, RawRecord, SourceType};

pub struct LabNormalizer {
    interval_minutes: u32,
}

impl LabNormalizer {
    pub fn new(interval_minutes: u32) -> Self {
        Self { interval_minutes }
    }
}

impl SourceNormalizer for LabNormalizer {
    fn source_type(&self) -> SourceType {
        SourceType::Lab
    }

    fn normalize(&self, records: Vec<RawRecord>) -> NormalizeOutcome {
        first_of_interval(records, self.interval_minutes, 0, AggregationPolicy::HalfHourlyFirst)
    }
}
