//! Test utilities for normalizer testing


use crate::app::models::{RawRecord, SourceType};
use chrono::{DateTime, TimeZone, Utc};

/// Timestamp helper for the fixed test day
pub fn ts(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 6, hour, minute, second).unwrap()
}

/// Build a raw record with a numeric value
pub fn numeric_record(
    source_type: SourceType,
    timestamp: DateTime<Utc>,
    category: &str,
    parameter: &str,
    value: &str,
) -> RawRecord {
    RawRecord {
        source_type,
        record_id: format!("{}:test", source_type.section_name()),
        timestamp,
        window_end: None,
        category: category.to_string(),
        parameter: parameter.to_string(),
        value: value.to_string(),
        numeric_value: value.replace(',', ".").parse().ok(),
    }
}

/// Build a fluid balance record with an explicit window
pub fn fluid_record(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    parameter: &str,
    value: &str,
) -> RawRecord {
    RawRecord {
        source_type: SourceType::FluidBalance,
        record_id: "Bilanz:test".to_string(),
        timestamp: start,
        window_end: Some(end),
        category: "Bilanz".to_string(),
        parameter: parameter.to_string(),
        value: value.to_string(),
        numeric_value: value.replace(',', ".").parse().ok(),
    }
}
