//! De-identification pipeline
//!
//! Two independent detectors feed one redaction decision per field: the
//! entity recognizer (free text only) and the fuzzy blacklist matcher.
//! Their spans are merged under an explicit overlap policy and substituted
//! with fixed placeholder tokens.
//!
//! Exception rules, evaluated before any detection runs:
//! 1. Numeric values are never scanned or modified.
//! 2. Text shorter than five characters is never scanned or modified
//!    (protects clinical shorthand like "ja"/"nein").
//! 3. Structured text is only eligible for blacklist matching, and only
//!    when a blacklist is configured. Free text gets both detectors.
//!
//! Detection over distinct fields is independent and runs concurrently;
//! the model and the compiled blacklist are read-only shares. A per-field
//! timeout bounds pathological fields: on expiry the field stays
//! unredacted and is flagged for manual review.

pub mod blacklist;
pub mod entity_recognizer;
pub mod language_model;
pub mod redaction;

#[cfg(test)]
mod tests;

pub use blacklist::BlacklistIndex;
pub use entity_recognizer::EntityRecognizer;
pub use language_model::LanguageModel;
pub use redaction::{apply_redactions, resolve_overlaps, EntityClass, Span, SpanSource};

use crate::app::models::{Diagnostic, DiagnosticKind, LongRow, ValueKind};
use crate::app::services::consolidator::ConsolidatedTable;
use crate::config::Config;
use crate::constants::MIN_REDACTION_TEXT_LEN;
use crate::Result;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Which detectors run for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Eligibility {
    /// Exception rules apply; the field is never touched
    Skip,
    /// Structured text: blacklist matching only
    BlacklistOnly,
    /// Free text: entity recognition and blacklist matching
    Full,
}

/// De-identification counters for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeidentifyStats {
    /// Fields that entered detection
    pub fields_scanned: usize,
    /// Fields whose value was replaced
    pub fields_redacted: usize,
    /// Fields excluded by the exception rules
    pub fields_skipped: usize,
    /// Fields left unredacted because detection timed out
    pub fields_timed_out: usize,
}

/// The de-identification stage: loads its collaborators once at startup,
/// then processes the consolidated table in place (values only; it never
/// re-orders or re-timestamps rows).
pub struct Deidentifier {
    recognizer: Arc<EntityRecognizer>,
    blacklist: Option<Arc<BlacklistIndex>>,
    timeout: Option<Duration>,
    workers: usize,
}

impl Deidentifier {
    /// Build the stage from configuration. Loading the language model or
    /// the blacklist fails here, once, before any row is touched.
    pub fn from_config(config: &Config) -> Result<Self> {
        let deid = &config.deidentify;

        let model_path = deid.model_path.as_deref().ok_or_else(|| {
            crate::Error::configuration("de-identification requires a language model path")
        })?;
        let model = Arc::new(LanguageModel::load(model_path)?);
        let recognizer = Arc::new(EntityRecognizer::new(model));

        let blacklist = match &deid.blacklist_path {
            Some(path) => {
                let index =
                    BlacklistIndex::from_file(path, deid.fuzzy_matching, deid.fuzzy_threshold)?;
                if index.is_empty() {
                    warn!("Blacklist {} contains no usable terms", path.display());
                    None
                } else {
                    Some(Arc::new(index))
                }
            }
            None => None,
        };

        Ok(Self {
            recognizer,
            blacklist,
            timeout: match deid.detection_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            workers: config.workers,
        })
    }

    /// Build the stage from already-loaded collaborators (tests, embedding)
    pub fn new(
        recognizer: Arc<EntityRecognizer>,
        blacklist: Option<Arc<BlacklistIndex>>,
        timeout: Option<Duration>,
        workers: usize,
    ) -> Self {
        Self {
            recognizer,
            blacklist,
            timeout,
            workers,
        }
    }

    /// De-identify all eligible values of the consolidated table in place.
    ///
    /// Timed-out fields keep their original value and produce a
    /// `DetectionTimeout` diagnostic (the abandoned detection finishes in
    /// the background; its result is discarded). Internal invariant
    /// violations in the redaction applier abort the run.
    pub async fn deidentify_table(
        &self,
        table: &mut ConsolidatedTable,
        progress: Option<ProgressBar>,
    ) -> Result<(DeidentifyStats, Vec<Diagnostic>)> {
        let mut stats = DeidentifyStats::default();
        let mut diagnostics = Vec::new();
        let has_blacklist = self.blacklist.is_some();

        let work: Vec<(usize, u64, Eligibility, String)> = table
            .rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| match eligibility(row, has_blacklist) {
                Eligibility::Skip => None,
                mode => Some((index, row.row_id, mode, row.value.clone())),
            })
            .collect();

        stats.fields_skipped = table.rows.len() - work.len();
        stats.fields_scanned = work.len();

        if let Some(pb) = &progress {
            pb.set_length(work.len() as u64);
        }

        let results = stream::iter(work.into_iter().map(|(index, row_id, mode, value)| {
            let recognizer = Arc::clone(&self.recognizer);
            let blacklist = self.blacklist.clone();
            let timeout = self.timeout;

            async move {
                let task = tokio::task::spawn_blocking(move || {
                    redact_value(&recognizer, blacklist.as_deref(), mode, &value)
                        .map(|redacted| (value, redacted))
                });

                let outcome = match timeout {
                    Some(duration) => match tokio::time::timeout(duration, task).await {
                        Ok(joined) => Some(joined.expect("detection task panicked")),
                        Err(_) => None,
                    },
                    None => Some(task.await.expect("detection task panicked")),
                };

                (index, row_id, outcome)
            }
        }))
        .buffer_unordered(self.workers.max(1))
        .collect::<Vec<_>>()
        .await;

        for (index, row_id, outcome) in results {
            if let Some(pb) = &progress {
                pb.inc(1);
            }

            match outcome {
                None => {
                    stats.fields_timed_out += 1;
                    diagnostics.push(Diagnostic::new(
                        format!("row:{}", row_id),
                        DiagnosticKind::DetectionTimeout,
                        "detection exceeded the per-field timeout; value left unredacted",
                    ));
                }
                Some(Err(error)) => return Err(error),
                Some(Ok((original, redacted))) => {
                    if redacted != original {
                        stats.fields_redacted += 1;
                        table.rows[index].value = redacted;
                    }
                }
            }
        }

        debug!(
            "De-identification: {} scanned, {} redacted, {} skipped, {} timed out",
            stats.fields_scanned, stats.fields_redacted, stats.fields_skipped, stats.fields_timed_out
        );

        Ok((stats, diagnostics))
    }
}

/// Apply the exception rules for one row
fn eligibility(row: &LongRow, has_blacklist: bool) -> Eligibility {
    match row.kind {
        ValueKind::Numeric => Eligibility::Skip,
        _ if row.value.chars().count() < MIN_REDACTION_TEXT_LEN => Eligibility::Skip,
        ValueKind::FreeText => Eligibility::Full,
        ValueKind::StructuredText if has_blacklist => Eligibility::BlacklistOnly,
        ValueKind::StructuredText => Eligibility::Skip,
    }
}

/// Run the configured detectors over one value and apply the resolved plan.
///
/// If entity recognition fails for a field, the field still receives
/// blacklist-only replacement instead of passing through untouched.
fn redact_value(
    recognizer: &EntityRecognizer,
    blacklist: Option<&BlacklistIndex>,
    mode: Eligibility,
    value: &str,
) -> Result<String> {
    let mut spans: Vec<Span> = Vec::new();

    if mode == Eligibility::Full {
        match catch_unwind(AssertUnwindSafe(|| recognizer.analyze(value))) {
            Ok(detected) => spans.extend(detected),
            Err(_) => {
                warn!("Entity recognition failed for a field; applying blacklist only");
            }
        }
    }

    if let Some(index) = blacklist {
        spans.extend(index.find_matches(value));
    }

    let resolved = resolve_overlaps(spans);
    if resolved.is_empty() {
        return Ok(value.to_string());
    }

    apply_redactions(value, &resolved)
}
