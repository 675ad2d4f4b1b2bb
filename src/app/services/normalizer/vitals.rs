//! Vitals normalizer: first value per 60-minute interval
//!
//! Online and manual vital signs arrive interval-aggregated with the
//! bucket stamp at a fixed minute offset (observed :50). The offset is
//! configuration, not contract; see [`crate::Config::vitals_offset_minutes`].

use super::{first_of_interval, NormalizeOutcome, SourceNormalizer};
use crate::app::models::{AggregationPolicy, RawRecord, SourceType};

pub struct VitalsNormalizer {
    interval_minutes: u32,
    offset_minutes: u32,
}

impl VitalsNormalizer {
    pub fn new(interval_minutes: u32, offset_minutes: u32) -> Self {
        Self {
            interval_minutes,
            offset_minutes,
        }
    }
}

impl SourceNormalizer for VitalsNormalizer {
    fn source_type(&self) -> SourceType {
        SourceType::Vitals
    }

    fn normalize(&self, records: Vec<RawRecord>) -> NormalizeOutcome {
        first_of_interval(
            records,
            self.interval_minutes,
            self.offset_minutes,
            AggregationPolicy::HourlyFirst,
        )
    }
}
