//! Amount normalization and invoiced-total selection.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, trace};

use super::patterns::{AMOUNT_RULES, EURO_TOKEN};
use super::{ExtractionMatch, FieldExtractor, FieldRule};
use crate::error::ExtractionError;
use crate::models::invoice::CandidateAmount;

/// Exclusive bounds for an amount to count as a plausible invoice total.
pub const TOTAL_RANGE: (Decimal, Decimal) = (
    Decimal::from_parts(100, 0, 0, false, 0),
    Decimal::from_parts(100_000_000, 0, 0, false, 0),
);

/// A numeric token in canonical dot-decimal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAmount {
    /// Canonical text, e.g. `598950.00`.
    pub text: String,
    /// Numeric value.
    pub value: Decimal,
}

impl NormalizedAmount {
    /// Whether the value lies strictly between `min` and `max`.
    pub fn is_within(&self, min: Decimal, max: Decimal) -> bool {
        self.value > min && self.value < max
    }
}

/// Normalize a Czech/English formatted amount (e.g. `"598 950,00"` or `"1.234.567,89"`).
///
/// Whitespace is removed, commas become dots, and when several dots remain only the last one is
/// kept as the decimal point.
pub fn normalize_amount(token: &str) -> Result<NormalizedAmount, ExtractionError> {
    let cleaned: String = token
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let text = match cleaned.rfind('.') {
        Some(last) if cleaned[..last].contains('.') => {
            let integer: String = cleaned[..last].chars().filter(|c| *c != '.').collect();
            format!("{}{}", integer, &cleaned[last..])
        }
        _ => cleaned,
    };

    if !text.chars().any(|c| c.is_ascii_digit()) {
        return Err(ExtractionError::UnparseableAmount(token.to_string()));
    }

    let value = Decimal::from_str(&text)
        .map_err(|_| ExtractionError::UnparseableAmount(token.to_string()))?;

    Ok(NormalizedAmount { text, value })
}

/// Format an amount in Czech style (`1 234,56`).
pub fn format_czech_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some(parts) => parts,
        None => return s,
    };

    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    // Add thousand separators
    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(' ');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}

/// Currency implied by the text a rule matched.
pub fn detect_currency(matched_text: &str) -> &'static str {
    if EURO_TOKEN.is_match(matched_text) {
        "EUR"
    } else {
        "CZK"
    }
}

/// Whether a matched total is labeled as excluding VAT or as the VAT base.
pub fn is_vat_exclusive_label(matched_text: &str) -> bool {
    let lower = matched_text.to_lowercase();
    (lower.contains("bez") && lower.contains("dph"))
        || lower.contains("součet")
        || lower.contains("základ")
}

/// How the invoiced total was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TotalSelection {
    /// A VAT-exclusive or VAT-base label matched; scanning stopped there.
    VatExclusive(CandidateAmount),
    /// No such label; the largest plausible amount was taken.
    Largest(CandidateAmount),
}

impl TotalSelection {
    pub fn candidate(&self) -> &CandidateAmount {
        match self {
            TotalSelection::VatExclusive(c) | TotalSelection::Largest(c) => c,
        }
    }

    pub fn into_candidate(self) -> CandidateAmount {
        match self {
            TotalSelection::VatExclusive(c) | TotalSelection::Largest(c) => c,
        }
    }
}

/// Finds plausible invoice totals and selects the VAT-exclusive one.
pub struct TotalExtractor {
    rules: &'static [FieldRule],
    range: (Decimal, Decimal),
}

impl TotalExtractor {
    pub fn new() -> Self {
        Self {
            rules: AMOUNT_RULES.as_slice(),
            range: TOTAL_RANGE,
        }
    }

    /// Walk the rules in order, calling `visit` with each plausible candidate.
    ///
    /// Stops early when `visit` returns `false`.
    fn scan<F>(&self, text: &str, mut visit: F)
    where
        F: FnMut(ExtractionMatch<CandidateAmount>) -> bool,
    {
        for rule in self.rules {
            for caps in rule.pattern.captures_iter(text) {
                let (Some(full), Some(token)) = (caps.get(0), caps.get(rule.group)) else {
                    continue;
                };

                let raw_token = token.as_str().trim();
                let amount = match normalize_amount(raw_token) {
                    Ok(amount) => amount,
                    Err(e) => {
                        trace!("Dropping candidate from {}: {}", rule.name, e);
                        continue;
                    }
                };

                if !amount.is_within(self.range.0, self.range.1) {
                    trace!("Dropping implausible amount {} from {}", amount.text, rule.name);
                    continue;
                }

                let candidate = CandidateAmount {
                    raw_token: raw_token.to_string(),
                    normalized: amount.text,
                    value: amount.value,
                    currency: detect_currency(full.as_str()).to_string(),
                    matched_text: full.as_str().to_string(),
                };

                let found = ExtractionMatch::new(candidate, rule.name, full.as_str());
                if !visit(found) {
                    return;
                }
            }
        }
    }

    /// Select the invoiced total.
    ///
    /// The first candidate carrying a VAT-exclusive label wins immediately. Without one, the
    /// largest candidate found by any rule is taken, which may be a VAT-inclusive figure.
    pub fn select(&self, text: &str) -> Option<TotalSelection> {
        let (found, labeled) = self.select_match(text)?;
        Some(if labeled {
            TotalSelection::VatExclusive(found.value)
        } else {
            TotalSelection::Largest(found.value)
        })
    }

    fn select_match(&self, text: &str) -> Option<(ExtractionMatch<CandidateAmount>, bool)> {
        let mut labeled = None;
        let mut largest: Option<ExtractionMatch<CandidateAmount>> = None;

        self.scan(text, |found| {
            if is_vat_exclusive_label(&found.value.matched_text) {
                debug!("VAT-exclusive total {} via {}", found.value.normalized, found.rule);
                labeled = Some(found);
                return false;
            }
            if largest
                .as_ref()
                .is_none_or(|best| found.value.value > best.value.value)
            {
                largest = Some(found);
            }
            true
        });

        match labeled {
            Some(found) => Some((found, true)),
            None => largest.map(|found| {
                debug!("Falling back to largest amount {} via {}", found.value.normalized, found.rule);
                (found, false)
            }),
        }
    }
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = ExtractionMatch<CandidateAmount>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.select_match(text).map(|(found, _)| found)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();
        self.scan(text, |found| {
            results.push(found);
            true
        });
        results
    }
}
