//! Data models for m.life processing
//!
//! This module contains the core data structures: the canonical long-format
//! row, the validated raw record handed from the export parser to the
//! normalizers, and the diagnostic entries collected for rejected records.

use crate::constants::sections;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Source Types
// =============================================================================

/// Origin category of a record, one per export section
///
/// The set is closed: every section of the export maps to exactly one
/// variant, and each variant has its own normalizer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SourceType {
    Vitals,
    Lab,
    RespiratorySetting,
    Device,
    FluidBalance,
    Medication,
    PatientInfo,
    Documentation,
}

impl SourceType {
    /// Resolve an export section name to its source type
    pub fn from_section(section: &str) -> Option<Self> {
        match section {
            sections::VITALS => Some(Self::Vitals),
            sections::LAB => Some(Self::Lab),
            sections::RESPIRATORY => Some(Self::RespiratorySetting),
            sections::DEVICE => Some(Self::Device),
            sections::FLUID_BALANCE => Some(Self::FluidBalance),
            sections::MEDICATION => Some(Self::Medication),
            sections::PATIENT_INFO => Some(Self::PatientInfo),
            sections::DOCUMENTATION => Some(Self::Documentation),
            _ => None,
        }
    }

    /// The export section name this source type is parsed from
    pub fn section_name(&self) -> &'static str {
        match self {
            Self::Vitals => sections::VITALS,
            Self::Lab => sections::LAB,
            Self::RespiratorySetting => sections::RESPIRATORY,
            Self::Device => sections::DEVICE,
            Self::FluidBalance => sections::FLUID_BALANCE,
            Self::Medication => sections::MEDICATION,
            Self::PatientInfo => sections::PATIENT_INFO,
            Self::Documentation => sections::DOCUMENTATION,
        }
    }

    /// All source types in output tie-break order
    pub fn all() -> [SourceType; 8] {
        [
            Self::Vitals,
            Self::Lab,
            Self::RespiratorySetting,
            Self::Device,
            Self::FluidBalance,
            Self::Medication,
            Self::PatientInfo,
            Self::Documentation,
        ]
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vitals => "Vitals",
            Self::Lab => "Lab",
            Self::RespiratorySetting => "RespiratorySetting",
            Self::Device => "Device",
            Self::FluidBalance => "FluidBalance",
            Self::Medication => "Medication",
            Self::PatientInfo => "PatientInfo",
            Self::Documentation => "Documentation",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Value Classification and Aggregation Policies
// =============================================================================

/// Classification of a row's value, recorded by the normalizer.
/// Drives redaction eligibility downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Structured numeric measurement; never scanned or modified
    Numeric,
    /// Structured text (doses, master data); blacklist matching only
    StructuredText,
    /// Free-text documentation; entity recognition and blacklist matching
    FreeText,
}

/// Timestamp/aggregation policy that produced a row, carried as metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationPolicy {
    /// Recorded event time, no transformation
    Exact,
    /// First reading per 60-minute bucket, stamped at a fixed minute offset
    HourlyFirst,
    /// First reading per 30-minute bucket, stamped at the half-hour boundary
    HalfHourlyFirst,
    /// First reading per minute, seconds truncated
    MinutelyFirst,
    /// Summed quantity over a multi-day window, stamped at the window end
    WindowSum,
}

impl AggregationPolicy {
    /// Human-readable description of this policy
    pub fn description(&self) -> &'static str {
        match self {
            Self::Exact => "exact event time",
            Self::HourlyFirst => "first value per 60-minute interval",
            Self::HalfHourlyFirst => "first value per 30-minute interval",
            Self::MinutelyFirst => "first value per minute",
            Self::WindowSum => "sum over a multi-day window",
        }
    }
}

// =============================================================================
// Long-Format Row
// =============================================================================

/// The canonical output unit: one measurement or event
///
/// Only the first five fields are written to the output table. The
/// remaining fields are row metadata for resolution-aware consumers and
/// for the de-identification stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRow {
    /// Absolute point in time; comparable and sortable across sources
    pub timestamp: DateTime<Utc>,

    /// Origin category
    pub source_type: SourceType,

    /// Sub-classification within the source type (e.g. "Blutgase arteriell")
    pub category: String,

    /// Measured or recorded quantity name
    pub parameter: String,

    /// Value in its original rendering; numeric values keep the export's
    /// decimal-comma notation so they survive de-identification verbatim
    pub value: String,

    /// Value classification recorded by the normalizer
    pub kind: ValueKind,

    /// Policy that produced this row
    pub policy: AggregationPolicy,

    /// Stable row identity, assigned by the consolidator after sorting
    pub row_id: u64,

    /// Back-reference to the exact-timestamp copy of a cross-source
    /// duplicate. A relation, not an ownership link; both rows are retained.
    pub duplicate_of: Option<u64>,
}

impl LongRow {
    /// Create a row before consolidation; `row_id` is assigned later
    pub fn new(
        timestamp: DateTime<Utc>,
        source_type: SourceType,
        category: impl Into<String>,
        parameter: impl Into<String>,
        value: impl Into<String>,
        kind: ValueKind,
        policy: AggregationPolicy,
    ) -> Self {
        Self {
            timestamp,
            source_type,
            category: category.into(),
            parameter: parameter.into(),
            value: value.into(),
            kind,
            policy,
            row_id: 0,
            duplicate_of: None,
        }
    }

    /// Total-order key: timestamp first, then the stable tie-break
    pub fn ordering_key(&self) -> (DateTime<Utc>, SourceType, &str, &str) {
        (
            self.timestamp,
            self.source_type,
            self.category.as_str(),
            self.parameter.as_str(),
        )
    }
}

// =============================================================================
// Raw Records
// =============================================================================

/// A schema-validated record from one export line, ready for normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Origin section
    pub source_type: SourceType,

    /// Record identifier for diagnostics: `section:line`
    pub record_id: String,

    /// Recorded event time; for fluid balance records the window start
    pub timestamp: DateTime<Utc>,

    /// Window end time; fluid balance records only
    pub window_end: Option<DateTime<Utc>>,

    /// Section-specific category (panel, device, vitals feed, note category)
    pub category: String,

    /// Parameter name
    pub parameter: String,

    /// Value in its original rendering, trimmed
    pub value: String,

    /// Parsed numeric value where the source contract requires one
    pub numeric_value: Option<f64>,
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Classification of a record-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A required field is absent or empty
    MissingField,
    /// The timestamp field does not parse under the source's format
    MalformedTimestamp,
    /// A numeric field does not parse as a number
    MalformedNumeric,
    /// The parameter is not recognized for its source type
    UnknownParameter,
    /// The value fails its expected shape
    MalformedValue,
    /// A fluid-balance window falls outside the accepted duration bounds
    InvalidWindow,
    /// Per-field detection exceeded the timeout; field left unredacted
    DetectionTimeout,
}

impl DiagnosticKind {
    /// Short label used in summaries and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingField => "missing field",
            Self::MalformedTimestamp => "malformed timestamp",
            Self::MalformedNumeric => "malformed numeric",
            Self::UnknownParameter => "unknown parameter",
            Self::MalformedValue => "malformed value",
            Self::InvalidWindow => "invalid window",
            Self::DetectionTimeout => "detection timeout",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One side-channel entry for a rejected or partially processed record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifies the input record: `section:line` (or `row:<id>` for
    /// de-identification stage entries)
    pub record_id: String,

    /// Failure classification
    pub kind: DiagnosticKind,

    /// Human-readable detail
    pub detail: String,
}

impl Diagnostic {
    pub fn new(record_id: impl Into<String>, kind: DiagnosticKind, detail: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.record_id, self.kind, self.detail)
    }
}

/// A record-level failure raised inside parsing or normalization.
///
/// Carries the diagnostic classification; callers convert it into a
/// [`Diagnostic`] and continue with the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordError {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl RecordError {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            DiagnosticKind::MissingField,
            format!("required field '{}' is missing or empty", field),
        )
    }

    /// Create a malformed timestamp error
    pub fn malformed_timestamp(value: &str) -> Self {
        Self::new(
            DiagnosticKind::MalformedTimestamp,
            format!("'{}' does not parse as a timestamp", value),
        )
    }

    /// Create a malformed numeric error
    pub fn malformed_numeric(field: &str, value: &str) -> Self {
        Self::new(
            DiagnosticKind::MalformedNumeric,
            format!("field '{}' value '{}' does not parse as a number", field, value),
        )
    }

    /// Create an unknown parameter error
    pub fn unknown_parameter(source_type: SourceType, parameter: &str) -> Self {
        Self::new(
            DiagnosticKind::UnknownParameter,
            format!("parameter '{}' is not recognized for {}", parameter, source_type),
        )
    }

    /// Create a malformed value error
    pub fn malformed_value(detail: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::MalformedValue, detail)
    }

    /// Create an invalid window error
    pub fn invalid_window(detail: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::InvalidWindow, detail)
    }

    /// Convert into a diagnostic entry for the given record
    pub fn into_diagnostic(self, record_id: impl Into<String>) -> Diagnostic {
        Diagnostic::new(record_id, self.kind, self.message)
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
