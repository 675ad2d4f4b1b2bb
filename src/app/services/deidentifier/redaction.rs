//! Redaction span model, overlap resolution and placeholder substitution
//!
//! Both detectors produce [`Span`] values; this module merges them into a
//! single non-overlapping plan and applies it. The tie-break is explicit
//! policy, not iteration order: on overlap the longer span wins, and the
//! entity recognizer wins exact ties.
//!
//! Malformed offsets reaching the applier are a programming-contract
//! violation. They surface as [`Error::Internal`] and are never silently
//! ignored.

use crate::constants::{PLACEHOLDER_ANONYM, PLACEHOLDER_KONTAKT};
use crate::{Error, Result};

/// Entity class of a detected span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Person,
    Phone,
    Email,
    Blacklist,
}

impl EntityClass {
    /// The placeholder token substituted for this class
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Person | Self::Blacklist => PLACEHOLDER_ANONYM,
            Self::Phone | Self::Email => PLACEHOLDER_KONTAKT,
        }
    }
}

/// Which detector produced a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanSource {
    Nlp,
    Blacklist,
}

/// A detected span: byte offsets into the scanned value, always on char
/// boundaries. Created during detection, consumed once by the applier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub class: EntityClass,
    pub source: SpanSource,
}

impl Span {
    pub fn new(start: usize, end: usize, class: EntityClass, source: SpanSource) -> Self {
        Self {
            start,
            end,
            class,
            source,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Resolve overlapping spans from both detectors into one plan.
///
/// Candidates are ranked longest-first; the entity recognizer outranks the
/// blacklist on equal length, and position breaks remaining ties. Ranked
/// candidates are kept greedily when they do not overlap an already kept
/// span. The result is sorted by position.
pub fn resolve_overlaps(mut spans: Vec<Span>) -> Vec<Span> {
    spans.retain(|span| !span.is_empty());
    spans.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then_with(|| source_rank(a.source).cmp(&source_rank(b.source)))
            .then_with(|| a.start.cmp(&b.start))
            .then_with(|| class_rank(a.class).cmp(&class_rank(b.class)))
    });

    let mut kept: Vec<Span> = Vec::with_capacity(spans.len());
    for candidate in spans {
        if !kept.iter().any(|span| span.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }

    kept.sort_by_key(|span| span.start);
    kept
}

fn source_rank(source: SpanSource) -> u8 {
    match source {
        SpanSource::Nlp => 0,
        SpanSource::Blacklist => 1,
    }
}

fn class_rank(class: EntityClass) -> u8 {
    match class {
        EntityClass::Person => 0,
        EntityClass::Phone => 1,
        EntityClass::Email => 2,
        EntityClass::Blacklist => 3,
    }
}

/// Substitute each resolved span with its class placeholder.
///
/// `spans` must be the output of [`resolve_overlaps`]: position-sorted and
/// non-overlapping, with offsets inside `text` on char boundaries.
pub fn apply_redactions(text: &str, spans: &[Span]) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0usize;

    for span in spans {
        if span.start < cursor || span.end > text.len() {
            return Err(Error::internal(format!(
                "redaction span {}..{} is out of order or out of bounds for a value of {} bytes",
                span.start,
                span.end,
                text.len()
            )));
        }
        if !text.is_char_boundary(span.start) || !text.is_char_boundary(span.end) {
            return Err(Error::internal(format!(
                "redaction span {}..{} does not fall on character boundaries",
                span.start, span.end
            )));
        }

        result.push_str(&text[cursor..span.start]);
        result.push_str(span.class.placeholder());
        cursor = span.end;
    }

    result.push_str(&text[cursor..]);
    Ok(result)
}
