//! Respiratory settings normalizer: first value per minute
//!
//! Online ventilator settings arrive at minute resolution; seconds are
//! truncated.

use super::{first_of_interval, NormalizeOutcome, SourceNormalizer};
use crate::app::models::{AggregationPolicy, RawRecord, SourceType};

pub struct RespiratoryNormalizer {
    interval_minutes: u32,
}

impl RespiratoryNormalizer {
    pub fn new(interval_minutes: u32) -> Self {
        Self { interval_minutes }
    }
}

impl SourceNormalizer for RespiratoryNormalizer {
    fn source_type(&self) -> SourceType {
        SourceType::RespiratorySetting
    }

    fn normalize(&self, records: Vec<RawRecord>) -> NormalizeOutcome {
        first_of_interval(records, self.interval_minutes, 0, AggregationPolicy::MinutelyFirst)
    }
}
