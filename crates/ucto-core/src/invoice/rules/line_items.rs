//! Man-day line items ("MD <count> <rate>") and the "Počet MJ" / "Cena MJ" fallbacks.

use rust_decimal::Decimal;
use tracing::trace;

use super::amounts::{normalize_amount, NormalizedAmount};
use super::patterns::{MD_LINE, UNIT_COUNT, UNIT_RATE};
use super::{ExtractionMatch, FieldExtractor};

/// Exclusive bounds for a line-item count.
pub const COUNT_RANGE: (u32, u32) = (0, 1000);

/// Exclusive bounds for a man-day rate.
pub const RATE_RANGE: (Decimal, Decimal) = (
    Decimal::from_parts(100, 0, 0, false, 0),
    Decimal::from_parts(100_000, 0, 0, false, 0),
);

/// One "MD" line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManDayItem {
    /// Number of man-days, when within range.
    pub count: Option<u32>,
    /// Rate, when it normalizes and lies within range.
    pub rate: Option<NormalizedAmount>,
}

/// Aggregated man-day data for an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManDays {
    /// Sum of all line-item counts.
    pub total_count: Option<u32>,
    /// Rate of the first line item carrying one.
    pub rate: Option<NormalizedAmount>,
}

fn plausible_count(token: &str) -> Option<u32> {
    token
        .parse::<u32>()
        .ok()
        .filter(|n| *n > COUNT_RANGE.0 && *n < COUNT_RANGE.1)
}

fn plausible_rate(token: &str) -> Option<NormalizedAmount> {
    normalize_amount(token.trim())
        .ok()
        .filter(|rate| rate.is_within(RATE_RANGE.0, RATE_RANGE.1))
}

/// Extractor for "MD" line items.
pub struct ManDayExtractor;

impl ManDayExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ManDayExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ManDayExtractor {
    type Output = ExtractionMatch<ManDayItem>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        MD_LINE
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let item = ManDayItem {
                    count: plausible_count(&caps[1]),
                    rate: plausible_rate(&caps[2]),
                };
                trace!("Line item {:?} from {:?}", item, full_match.as_str());
                Some(ExtractionMatch::new(item, "md_line", full_match.as_str()))
            })
            .collect()
    }
}

/// Sum man-day counts over all line items and take the first rate.
///
/// Rates are assumed uniform across lines; later rates are not compared.
/// Labeled "Počet MJ" / "Cena MJ" values fill whichever part is still missing.
pub fn extract_man_days(text: &str) -> ManDays {
    let items = ManDayExtractor::new().extract_all(text);

    let counts: Vec<u32> = items.iter().filter_map(|m| m.value.count).collect();
    let mut result = ManDays {
        total_count: (!counts.is_empty()).then(|| sum_counts(&counts)),
        rate: items.iter().find_map(|m| m.value.rate.clone()),
    };

    if result.total_count.is_none() {
        result.total_count = UNIT_COUNT
            .captures(text)
            .and_then(|caps| plausible_count(&caps[1]));
    }

    if result.rate.is_none() {
        result.rate = UNIT_RATE
            .captures(text)
            .and_then(|caps| plausible_rate(&caps[1]));
    }

    result
}

/// Total of line-item counts, saturating at `u32::MAX`.
fn sum_counts(counts: &[u32]) -> u32 {
    counts.iter().fold(0, |total, count| total.saturating_add(*count))
}
