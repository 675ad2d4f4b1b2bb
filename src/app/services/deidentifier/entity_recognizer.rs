//! Entity recognition over free-text values
//!
//! Scans a text value and labels spans with entity classes: person names
//! (lexicon lookup plus a title heuristic), phone numbers and email
//! addresses (pattern based). Detection is probabilistic; the contract
//! only guarantees well-formed, non-overlapping spans. Ordinary text never
//! makes this stage fail.

use super::language_model::LanguageModel;
use super::redaction::{EntityClass, Span, SpanSource};
use regex::Regex;
use std::sync::Arc;

/// Email address pattern
const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}";

/// German phone number pattern: +49 or 0 prefix, at least seven digits,
/// common grouping separators
const PHONE_PATTERN: &str = r"(?:\+49[ \-/]?|0)[1-9][0-9]{1,3}[ \-/]?[0-9]{3,8}(?:[ \-/]?[0-9]{1,6})?";

/// Word token pattern used for lexicon lookups
const WORD_PATTERN: &str = r"[\p{L}][\p{L}\-']*";

/// Entity recognizer with a fixed, pre-loaded language model
///
/// Read-only after construction; shared across concurrent detection tasks.
#[derive(Debug)]
pub struct EntityRecognizer {
    model: Arc<LanguageModel>,
    email_re: Regex,
    phone_re: Regex,
    word_re: Regex,
}

impl EntityRecognizer {
    pub fn new(model: Arc<LanguageModel>) -> Self {
        Self {
            model,
            // The patterns are compile-time constants; they always parse
            email_re: Regex::new(EMAIL_PATTERN).expect("email pattern is valid"),
            phone_re: Regex::new(PHONE_PATTERN).expect("phone pattern is valid"),
            word_re: Regex::new(WORD_PATTERN).expect("word pattern is valid"),
        }
    }

    /// The model backing this recognizer
    pub fn model(&self) -> &LanguageModel {
        &self.model
    }

    /// Detect person, phone and email spans in a text value.
    ///
    /// Returned spans are byte offsets into `text`, non-overlapping and
    /// position-sorted.
    pub fn analyze(&self, text: &str) -> Vec<Span> {
        let mut spans: Vec<Span> = Vec::new();

        for m in self.email_re.find_iter(text) {
            spans.push(Span::new(m.start(), m.end(), EntityClass::Email, SpanSource::Nlp));
        }

        for m in self.phone_re.find_iter(text) {
            let candidate = Span::new(m.start(), m.end(), EntityClass::Phone, SpanSource::Nlp);
            if !spans.iter().any(|span| span.overlaps(&candidate)) {
                spans.push(candidate);
            }
        }

        self.detect_person_spans(text, &mut spans);

        spans.sort_by_key(|span| span.start);
        spans
    }

    /// Lexicon and title-heuristic person detection.
    ///
    /// A word token is a person candidate when the lexicon knows it, or
    /// when it is capitalized and follows a title token ("Dr. Weber").
    /// Runs of adjacent candidates merge into one span ("Max Schmidt").
    fn detect_person_spans(&self, text: &str, spans: &mut Vec<Span>) {
        let words: Vec<(usize, usize, &str)> = self
            .word_re
            .find_iter(text)
            .map(|m| (m.start(), m.end(), m.as_str()))
            .collect();

        let mut is_person = vec![false; words.len()];
        for (index, (_, _, token)) in words.iter().enumerate() {
            if self.model.is_name(token) {
                is_person[index] = true;
                continue;
            }
            // Title heuristic: the token after a title is a name if it is
            // capitalized, even when the lexicon does not know it
            if index > 0 && self.model.is_title(words[index - 1].2) && is_capitalized(token) {
                is_person[index] = true;
            }
        }

        let mut index = 0;
        while index < words.len() {
            if !is_person[index] {
                index += 1;
                continue;
            }

            let start = words[index].0;
            let mut end = words[index].1;
            let mut next = index + 1;
            while next < words.len()
                && is_person[next]
                && text[end..words[next].0].chars().all(char::is_whitespace)
            {
                end = words[next].1;
                next += 1;
            }
            index = next;

            let candidate = Span::new(start, end, EntityClass::Person, SpanSource::Nlp);
            if !spans.iter().any(|span| span.overlaps(&candidate)) {
                spans.push(candidate);
            }
        }
    }
}

fn is_capitalized(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}
