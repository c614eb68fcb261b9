//! Rule-based field extractors for Czech/English invoices.
//!
//! Every field is described by an ordered table of [`FieldRule`]s. A rule pairs a compiled
//! pattern with the capture group holding the value and a post-processor that cleans or rejects
//! the capture. [`RuleTable`] walks the table in order and the first accepted value wins, so
//! adding a label means adding a row, not code.

pub mod amounts;
pub mod dates;
pub mod header;
pub mod line_items;
pub mod parties;
pub mod patterns;

pub use amounts::{format_czech_amount, normalize_amount, NormalizedAmount, TotalExtractor, TotalSelection};
pub use dates::{extract_dates, InvoiceDates};
pub use header::{extract_invoice_number, extract_project_name};
pub use line_items::{extract_man_days, ManDayItem, ManDays};
pub use parties::{clean_client_name, extract_client};
pub use patterns::*;

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Cleans a raw capture, or rejects it by returning `None`.
pub type PostProcess = fn(&str) -> Option<String>;

/// One row of a field's rule table.
#[derive(Debug)]
pub struct FieldRule {
    /// Short rule identifier, reported with matches.
    pub name: &'static str,
    /// Compiled pattern.
    pub pattern: Regex,
    /// Capture group holding the value.
    pub group: usize,
    /// Post-processor applied to the capture.
    pub post: PostProcess,
}

impl FieldRule {
    /// Build a rule from a pattern known to be valid.
    ///
    /// Only used for the static tables in [`patterns`]; panics on an invalid pattern.
    pub fn new(name: &'static str, pattern: &str, group: usize, post: PostProcess) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            group,
            post,
        }
    }

    /// Apply the rule to one regex match.
    fn accept(&self, caps: &regex::Captures<'_>) -> Option<ExtractionMatch<String>> {
        let capture = caps.get(self.group)?;
        let value = (self.post)(capture.as_str())?;
        let full_match = caps.get(0)?;
        Some(ExtractionMatch::new(value, self.name, full_match.as_str()))
    }
}

/// Ordered rule table evaluated first-match-wins.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable<'a> {
    rules: &'a [FieldRule],
}

impl<'a> RuleTable<'a> {
    pub fn new(rules: &'a [FieldRule]) -> Self {
        Self { rules }
    }
}

impl FieldExtractor for RuleTable<'_> {
    type Output = ExtractionMatch<String>;

    /// Each rule contributes only its first match; a rejected first match moves on to the next
    /// rule rather than to later matches of the same rule.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.rules.iter().find_map(|rule| {
            let caps = rule.pattern.captures(text)?;
            rule.accept(&caps)
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.rules
            .iter()
            .flat_map(|rule| {
                rule.pattern
                    .captures_iter(text)
                    .filter_map(move |caps| rule.accept(&caps))
            })
            .collect()
    }
}

/// A value found in the text together with the rule and text that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the rule that produced it.
    pub rule: &'static str,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, rule: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            rule,
            source: source.into(),
        }
    }
}

/// Keep the capture as written.
pub(crate) fn verbatim(s: &str) -> Option<String> {
    Some(s.to_string())
}

/// Trim surrounding whitespace; empty captures are rejected.
pub(crate) fn trimmed(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Trimmed capture whose length in characters lies strictly between 5 and 100.
pub(crate) fn project_text(s: &str) -> Option<String> {
    let s = s.trim();
    let len = s.chars().count();
    (len > 5 && len < 100).then(|| s.to_string())
}
