//! Fuzzy blacklist matching
//!
//! Compares word tokens of a value against a user-supplied term list,
//! case-insensitively and tolerant of spelling variation (edit-distance
//! based similarity, 0-100 scale). Matching is deterministic for a fixed
//! (text, blacklist, threshold) triple.

use super::redaction::{EntityClass, Span, SpanSource};
use crate::constants::FUZZY_LENGTH_WINDOW;
use crate::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::info;

/// Tokens are maximal runs of characters outside the separator set; the
/// separators stay in place so offsets map back into the original value
const TOKEN_PATTERN: &str = r#"[^\s,;.!?:\-()\[\]"']+"#;

/// Compiled blacklist index
///
/// Read-only after construction; shared across concurrent detection tasks.
#[derive(Debug)]
pub struct BlacklistIndex {
    /// Cleaned terms in their configured order, lowercased for comparison
    terms: Vec<String>,
    fuzzy_matching: bool,
    threshold: f64,
    token_re: Regex,
}

impl BlacklistIndex {
    /// Compile a blacklist from configured terms.
    ///
    /// Terms are trimmed and empties dropped; the configured order is kept
    /// (first matching term decides, which keeps runs deterministic).
    pub fn new(terms: Vec<String>, fuzzy_matching: bool, threshold: f64) -> Self {
        let terms = terms
            .into_iter()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();

        Self {
            terms,
            fuzzy_matching,
            threshold,
            token_re: Regex::new(TOKEN_PATTERN).expect("token pattern is valid"),
        }
    }

    /// Load a blacklist from a term file, one term per line
    pub fn from_file(path: &Path, fuzzy_matching: bool, threshold: f64) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "cannot read blacklist file {}: {}",
                path.display(),
                e
            ))
        })?;

        let terms: Vec<String> = content.lines().map(str::to_string).collect();
        let index = Self::new(terms, fuzzy_matching, threshold);
        info!(
            "Loaded blacklist: {} terms from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Scan a value for tokens matching any configured term.
    ///
    /// A token matches when it equals a term case-insensitively, or when
    /// fuzzy matching is on, the lengths differ by at most two characters
    /// and the similarity reaches the threshold.
    pub fn find_matches(&self, text: &str) -> Vec<Span> {
        if self.terms.is_empty() {
            return Vec::new();
        }

        let mut spans = Vec::new();
        for token_match in self.token_re.find_iter(text) {
            let token = token_match.as_str().to_lowercase();
            if self.matches_any_term(&token) {
                spans.push(Span::new(
                    token_match.start(),
                    token_match.end(),
                    EntityClass::Blacklist,
                    SpanSource::Blacklist,
                ));
            }
        }
        spans
    }

    fn matches_any_term(&self, token_lower: &str) -> bool {
        let token_chars = token_lower.chars().count();

        for term in &self.terms {
            if token_lower == term.as_str() {
                return true;
            }

            if !self.fuzzy_matching {
                continue;
            }

            // Fuzzy comparison only pays off for tokens of similar length
            let term_chars = term.chars().count();
            if token_chars.abs_diff(term_chars) > FUZZY_LENGTH_WINDOW {
                continue;
            }

            // rapidfuzz 0.5 reports similarity on a 0.0-1.0 scale; this crate's
            // threshold contract is 0-100, so rescale to match.
            let similarity = rapidfuzz::fuzz::ratio(token_lower.chars(), term.chars()) * 100.0;
            if similarity >= self.threshold {
                return true;
            }
        }

        false
    }
}
