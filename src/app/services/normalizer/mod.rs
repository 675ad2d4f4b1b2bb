//! Type-specific record normalization
//!
//! Each source type has its own normalizer converting validated raw
//! records into long-format rows under that source's timestamp and
//! aggregation policy:
//!
//! | Policy | Source types |
//! |---|---|
//! | Exact | Device, Medication, PatientInfo, Documentation |
//! | First-of-interval, 60 min (offset stamp) | Vitals |
//! | First-of-interval, 30 min | Lab |
//! | First-of-interval, 1 min | RespiratorySetting |
//! | Interval-sum, ~71-73 h window | FluidBalance |
//!
//! Normalizers operate on their source's whole batch, since
//! first-of-interval and interval-sum policies are defined across records.
//! A failed record is dropped with a classified diagnostic; the batch
//! continues. Batches for distinct sources are independent and run
//! concurrently.

pub mod intervals;

mod devices;
mod documentation;
mod fluid_balance;
mod labs;
mod medication;
mod patient_info;
mod respiratory;
mod vitals;

#[cfg(test)]
mod tests;

pub use devices::DeviceNormalizer;
pub use documentation::DocumentationNormalizer;
pub use fluid_balance::FluidBalanceNormalizer;
pub use labs::LabNormalizer;
pub use medication::MedicationNormalizer;
pub use patient_info::PatientInfoNormalizer;
pub use respiratory::RespiratoryNormalizer;
pub use vitals::VitalsNormalizer;

use crate::app::models::{
    AggregationPolicy, Diagnostic, LongRow, RawRecord, SourceType, ValueKind,
};
use crate::config::Config;
use std::collections::BTreeMap;
use tracing::debug;

/// Output of normalizing one source's batch (or the merged run)
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Normalized rows, in deterministic per-source order
    pub rows: Vec<LongRow>,
    /// One entry per dropped record
    pub diagnostics: Vec<Diagnostic>,
    /// Records handed to the normalizers
    pub records_in: usize,
    /// Records absorbed by first-of-interval or interval-sum aggregation
    pub records_aggregated: usize,
}

impl NormalizeOutcome {
    /// Merge another outcome into this one
    pub fn absorb(&mut self, other: NormalizeOutcome) {
        self.rows.extend(other.rows);
        self.diagnostics.extend(other.diagnostics);
        self.records_in += other.records_in;
        self.records_aggregated += other.records_aggregated;
    }
}

/// Capability shared by all type-specific normalizers: convert one
/// source's raw records into zero or more long-format rows
pub trait SourceNormalizer: Send + Sync {
    /// The source type this normalizer handles
    fn source_type(&self) -> SourceType;

    /// Normalize the source's whole batch
    fn normalize(&self, records: Vec<RawRecord>) -> NormalizeOutcome;
}

/// Build the normalizer for a source type from the pipeline configuration
pub fn normalizer_for(source_type: SourceType, config: &Config) -> Box<dyn SourceNormalizer> {
    match source_type {
        SourceType::Vitals => Box::new(VitalsNormalizer::new(
            config.vitals_interval_minutes,
            config.vitals_offset_minutes,
        )),
        SourceType::Lab => Box::new(LabNormalizer::new(config.lab_interval_minutes)),
        SourceType::RespiratorySetting => {
            Box::new(RespiratoryNormalizer::new(config.respiratory_interval_minutes))
        }
        SourceType::Device => Box::new(DeviceNormalizer),
        SourceType::FluidBalance => Box::new(FluidBalanceNormalizer::new(
            config.fluid_window_min_hours,
            config.fluid_window_max_hours,
        )),
        SourceType::Medication => Box::new(MedicationNormalizer),
        SourceType::PatientInfo => Box::new(PatientInfoNormalizer),
        SourceType::Documentation => Box::new(DocumentationNormalizer),
    }
}

/// Normalize all records, one concurrent batch per source type
pub async fn normalize_all(records: Vec<RawRecord>, config: &Config) -> NormalizeOutcome {
    let mut batches: BTreeMap<SourceType, Vec<RawRecord>> = BTreeMap::new();
    for record in records {
        batches.entry(record.source_type).or_default().push(record);
    }

    let mut handles = Vec::with_capacity(batches.len());
    for (source_type, batch) in batches {
        let normalizer = normalizer_for(source_type, config);
        handles.push(tokio::task::spawn_blocking(move || {
            let outcome = normalizer.normalize(batch);
            (source_type, outcome)
        }));
    }

    let mut merged = NormalizeOutcome::default();
    for handle in handles {
        // spawn_blocking only fails if the task panicked; propagate that
        let (source_type, outcome) = handle.await.expect("normalizer task panicked");
        debug!(
            "Normalized {}: {} records -> {} rows ({} aggregated, {} rejected)",
            source_type,
            outcome.records_in,
            outcome.rows.len(),
            outcome.records_aggregated,
            outcome.diagnostics.len()
        );
        merged.absorb(outcome);
    }

    merged
}

/// Shared first-of-interval implementation for Vitals, Lab and
/// RespiratorySetting batches.
///
/// The upstream export already keeps only the earliest reading per bucket;
/// this re-enforces the policy so merged or re-exported inputs cannot put
/// two rows into one bucket. Earliest raw timestamp wins; input order
/// breaks exact ties.
fn first_of_interval(
    records: Vec<RawRecord>,
    interval_minutes: u32,
    offset_minutes: u32,
    policy: AggregationPolicy,
) -> NormalizeOutcome {
    let records_in = records.len();

    type Key = (String, String, chrono::DateTime<chrono::Utc>);
    let mut best: BTreeMap<Key, (chrono::DateTime<chrono::Utc>, usize, RawRecord)> =
        BTreeMap::new();

    for (order, record) in records.into_iter().enumerate() {
        let bucket = intervals::snap_to_interval(record.timestamp, interval_minutes, offset_minutes);
        let key = (record.category.clone(), record.parameter.clone(), bucket);

        match best.get(&key) {
            Some((seen_ts, seen_order, _))
                if (*seen_ts, *seen_order) <= (record.timestamp, order) => {}
            _ => {
                best.insert(key, (record.timestamp, order, record));
            }
        }
    }

    let rows: Vec<LongRow> = best
        .into_iter()
        .map(|((category, parameter, bucket), (_, _, record))| {
            LongRow::new(
                bucket,
                record.source_type,
                category,
                parameter,
                record.value,
                ValueKind::Numeric,
                policy,
            )
        })
        .collect();

    NormalizeOutcome {
        records_aggregated: records_in - rows.len(),
        records_in,
        rows,
        diagnostics: Vec::new(),
    }
}

/// Shared exact-policy implementation: one row per record, no
/// timestamp transformation
fn exact_rows(records: Vec<RawRecord>, kind: ValueKind) -> NormalizeOutcome {
    let records_in = records.len();
    let rows = records
        .into_iter()
        .map(|record| {
            LongRow::new(
                record.timestamp,
                record.source_type,
                record.category,
                record.parameter,
                record.value,
                kind,
                AggregationPolicy::Exact,
            )
        })
        .collect();

    NormalizeOutcome {
        rows,
        diagnostics: Vec::new(),
        records_in,
        records_aggregated: 0,
    }
}
