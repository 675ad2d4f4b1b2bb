//! Test utilities for consolidator testing


use crate::app::models::{AggregationPolicy, LongRow, SourceType, ValueKind};
use chrono::{DateTime, TimeZone, Utc};

pub fn ts(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 6, hour, minute, second).unwrap()
}

pub fn vitals_row(timestamp: DateTime<Utc>, parameter: &str, value: &str) -> LongRow {
    LongRow::new(
        timestamp,
        SourceType::Vitals,
        "Vitalwerte online",
        parameter,
        value,
        ValueKind::Numeric,
        AggregationPolicy::HourlyFirst,
    )
}

pub fn device_row(
    timestamp: DateTime<Utc>,
    device: &str,
    parameter: &str,
    value: &str,
) -> LongRow {
    LongRow::new(
        timestamp,
        SourceType::Device,
        device,
        parameter,
        value,
        ValueKind::Numeric,
        AggregationPolicy::Exact,
    )
}
