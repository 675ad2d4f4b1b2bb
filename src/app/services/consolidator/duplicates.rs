//! Cross-source duplicate annotation
//!
//! Some device parameters are auto-mapped into the vitals feed by the
//! export tool, so a single physiological measurement appears twice: once
//! under Device at its exact time, once under Vitals stamped on the
//! interval grid. Silently dropping either copy would lose information
//! (the exact copy has the higher resolution, the vitals copy is what
//! interval-based consumers expect), so both rows are retained and the
//! aggregated copy receives a `duplicate_of` back-reference to the exact
//! row. Resolution policy is left to the consumer.

use crate::app::models::{LongRow, SourceType};
use crate::app::services::normalizer::intervals::snap_to_interval;
use crate::constants::auto_mapped_vitals_parameter;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Annotate interval-aggregated vitals rows that duplicate an auto-mapped
/// device measurement in the same bucket. Returns the number of pairs.
pub fn annotate_cross_source_duplicates(
    rows: &mut [LongRow],
    vitals_interval_minutes: u32,
) -> usize {
    // Earliest auto-mapped device row per (vitals parameter, bucket start)
    let mut device_rows: BTreeMap<(String, DateTime<Utc>), (DateTime<Utc>, u64)> = BTreeMap::new();

    for row in rows.iter() {
        if row.source_type != SourceType::Device {
            continue;
        }
        let Some(vitals_parameter) = auto_mapped_vitals_parameter(&row.category, &row.parameter)
        else {
            continue;
        };

        let bucket = snap_to_interval(row.timestamp, vitals_interval_minutes, 0);
        let key = (vitals_parameter.to_string(), bucket);
        match device_rows.get(&key) {
            Some((seen_ts, _)) if *seen_ts <= row.timestamp => {}
            _ => {
                device_rows.insert(key, (row.timestamp, row.row_id));
            }
        }
    }

    if device_rows.is_empty() {
        return 0;
    }

    let mut pairs = 0;
    for row in rows.iter_mut() {
        if row.source_type != SourceType::Vitals {
            continue;
        }
        // The vitals stamp sits inside its bucket, so snapping with a zero
        // offset recovers the bucket start
        let bucket = snap_to_interval(row.timestamp, vitals_interval_minutes, 0);
        let key = (row.parameter.clone(), bucket);

        if let Some((_, device_row_id)) = device_rows.get(&key) {
            row.duplicate_of = Some(*device_row_id);
            pairs += 1;
            debug!(
                "Row {} ({} {} at {}) duplicates device row {}",
                row.row_id, row.category, row.parameter, row.timestamp, device_row_id
            );
        }
    }

    pairs
}
