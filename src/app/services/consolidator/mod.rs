//! Consolidation of normalizer outputs into the canonical table
//!
//! The consolidator is the single serialization point of the pipeline: it
//! waits for all normalizer outputs, produces a total order by timestamp
//! with a stable `(source_type, category, parameter)` tie-break, assigns
//! stable row identities, and annotates known cross-source duplicates.
//!
//! It owns the canonical table once built. Nothing downstream may re-order
//! or re-timestamp rows; the de-identification stage only replaces values.

pub mod duplicates;

#[cfg(test)]
mod tests;

use crate::app::models::LongRow;
use crate::config::Config;
use tracing::info;

/// Consolidation counters for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsolidationStats {
    /// Rows in the canonical table
    pub rows_total: usize,
    /// Cross-source duplicate pairs annotated (both rows retained)
    pub duplicate_pairs: usize,
}

/// The canonical time-ordered table
#[derive(Debug, Clone)]
pub struct ConsolidatedTable {
    pub rows: Vec<LongRow>,
    pub stats: ConsolidationStats,
}

/// Merge normalizer outputs into the canonical table.
///
/// Sorting is total: rows sharing a timestamp are ordered by
/// `(source_type, category, parameter)`, so repeated runs over the same
/// input produce byte-identical output. Row ids are assigned after the
/// sort, starting at 1.
pub fn consolidate(mut rows: Vec<LongRow>, config: &Config) -> ConsolidatedTable {
    rows.sort_by(|a, b| a.ordering_key().cmp(&b.ordering_key()));

    for (index, row) in rows.iter_mut().enumerate() {
        row.row_id = index as u64 + 1;
        row.duplicate_of = None;
    }

    let duplicate_pairs = duplicates::annotate_cross_source_duplicates(
        &mut rows,
        config.vitals_interval_minutes,
    );

    let stats = ConsolidationStats {
        rows_total: rows.len(),
        duplicate_pairs,
    };

    info!(
        "Consolidated table: {} rows, {} duplicate pairs annotated",
        stats.rows_total, stats.duplicate_pairs
    );

    ConsolidatedTable { rows, stats }
}
