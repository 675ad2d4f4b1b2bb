//! Field parsing utilities for m.life export records
//!
//! Helper functions for extracting and converting the typed fields of a
//! semicolon-delimited export row. All failures are [`RecordError`]s so
//! callers can classify and collect them without aborting the batch.

use crate::app::models::RecordError;
use crate::constants::{MLIFE_DATETIME_FORMAT, MLIFE_DATETIME_FORMAT_SHORT};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Extract a required field by position; trims and rejects empty values
pub fn require_field<'a>(
    fields: &[&'a str],
    index: usize,
    name: &str,
) -> Result<&'a str, RecordError> {
    match fields.get(index) {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Err(RecordError::missing_field(name))
            } else {
                Ok(trimmed)
            }
        }
        None => Err(RecordError::missing_field(name)),
    }
}

/// Parse an export timestamp (`dd.mm.yyyy HH:MM[:SS]`) into UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RecordError> {
    let trimmed = value.trim();

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, MLIFE_DATETIME_FORMAT) {
        return Ok(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, MLIFE_DATETIME_FORMAT_SHORT) {
        return Ok(naive.and_utc());
    }

    Err(RecordError::malformed_timestamp(trimmed))
}

/// Parse a decimal value in German notation (comma separator) or plain
/// dot notation
pub fn parse_decimal(field: &str, value: &str) -> Result<f64, RecordError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordError::missing_field(field));
    }

    let normalized = trimmed.replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| RecordError::malformed_numeric(field, trimmed))
}

/// Extract a required free-text tail: all fields from `start` onwards,
/// rejoined with the delimiter. Free text may legitimately contain
/// semicolons, which the row split has cut apart.
pub fn require_text_tail(
    fields: &[&str],
    start: usize,
    name: &str,
) -> Result<String, RecordError> {
    if fields.len() <= start {
        return Err(RecordError::missing_field(name));
    }

    let joined = fields[start..].join(";");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        Err(RecordError::missing_field(name))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Check that a name is contained in a known-value set
pub fn require_known(
    value: &str,
    known: &[&str],
    error: impl FnOnce() -> RecordError,
) -> Result<(), RecordError> {
    if known.contains(&value) {
        Ok(())
    } else {
        Err(error())
    }
}
