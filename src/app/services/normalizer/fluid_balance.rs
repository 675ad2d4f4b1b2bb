//! Fluid balance normalizer: interval sums over multi-day windows
//!
//! One output row represents the summed quantity over a ~72-hour window;
//! the row is stamped at the window end. Windows outside the configured
//! duration bounds are rejected per record with an `InvalidWindow`
//! diagnostic.

use super::{intervals, NormalizeOutcome, SourceNormalizer};
use crate::app::models::{AggregationPolicy, LongRow, RawRecord, SourceType, ValueKind};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub struct FluidBalanceNormalizer {
    window_min_hours: i64,
    window_max_hours: i64,
}

impl FluidBalanceNormalizer {
    pub fn new(window_min_hours: i64, window_max_hours: i64) -> Self {
        Self {
            window_min_hours,
            window_max_hours,
        }
    }
}

impl SourceNormalizer for FluidBalanceNormalizer {
    fn source_type(&self) -> SourceType {
        SourceType::FluidBalance
    }

    fn normalize(&self, records: Vec<RawRecord>) -> NormalizeOutcome {
        let mut outcome = NormalizeOutcome {
            records_in: records.len(),
            ..Default::default()
        };

        // Sum per (window end, window start, parameter); entries sharing a
        // window collapse into one total
        type Key = (DateTime<Utc>, DateTime<Utc>, String);
        let mut sums: BTreeMap<Key, (f64, String)> = BTreeMap::new();

        for record in records {
            let window_end = match record.window_end {
                Some(end) => end,
                None => {
                    outcome.diagnostics.push(
                        crate::app::models::RecordError::invalid_window(
                            "fluid balance record without a window end",
                        )
                        .into_diagnostic(record.record_id),
                    );
                    continue;
                }
            };

            if !intervals::window_within_bounds(
                record.timestamp,
                window_end,
                self.window_min_hours,
                self.window_max_hours,
            ) {
                outcome.diagnostics.push(
                    crate::app::models::RecordError::invalid_window(format!(
                        "window of {} h is outside the accepted {}..{} h bounds",
                        intervals::window_hours(record.timestamp, window_end),
                        self.window_min_hours,
                        self.window_max_hours
                    ))
                    .into_diagnostic(record.record_id),
                );
                continue;
            }

            // Schema validation guarantees a numeric value for this source
            let amount = record.numeric_value.unwrap_or_default();
            let key = (window_end, record.timestamp, record.parameter.clone());
            sums.entry(key)
                .and_modify(|(total, _)| *total += amount)
                .or_insert((amount, record.category.clone()));
        }

        let mut rows = Vec::with_capacity(sums.len());
        for ((window_end, _, parameter), (total, category)) in sums {
            rows.push(LongRow::new(
                window_end,
                SourceType::FluidBalance,
                category,
                parameter,
                format_decimal(total),
                ValueKind::Numeric,
                AggregationPolicy::WindowSum,
            ));
        }

        let accepted = outcome.records_in - outcome.diagnostics.len();
        outcome.records_aggregated = accepted - rows.len();
        outcome.rows = rows;
        outcome
    }
}

/// Render a summed quantity in the export's decimal-comma notation,
/// without trailing fraction noise
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value).replace('.', ",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(8450.0), "8450");
        assert_eq!(format_decimal(-250.0), "-250");
        assert_eq!(format_decimal(550.5), "550,5");
    }
}
