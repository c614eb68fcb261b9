//! Correction analysis: which labels sit next to the values reviewers typed in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::invoice::rules::amounts::{format_czech_amount, normalize_amount};
use crate::models::feedback::{FeedbackEntry, TrackedField};

/// Candidate labels looked for around corrected project names, in checking order.
pub const PROJECT_KEYWORDS: [&str; 7] = [
    "project",
    "description",
    "service",
    "item",
    "předmět",
    "název",
    "účel",
];

/// Candidate labels looked for around corrected totals, in checking order.
pub const TOTAL_KEYWORDS: [&str; 6] = ["celkem", "total", "amount", "suma", "částka", "k úhradě"];

/// Characters of context taken on each side of a corrected project name.
pub const PROJECT_CONTEXT_CHARS: usize = 50;

/// Characters of context taken on each side of a corrected total.
pub const TOTAL_CONTEXT_CHARS: usize = 30;

/// Keyword tallies and correction counts over a batch of feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionAnalysis {
    /// Per field, how often each keyword appeared near a corrected value.
    ///
    /// For `currency` the keys are the corrected currency codes themselves.
    pub patterns: BTreeMap<TrackedField, BTreeMap<String, usize>>,
    /// Per field, keywords in the order they were first tallied: entry order, then the
    /// candidate order within an entry's window.
    #[serde(default)]
    pub first_seen: BTreeMap<TrackedField, Vec<String>>,
    /// Per field, how many entries had it corrected.
    pub corrections_count: BTreeMap<TrackedField, usize>,
    /// Number of entries analyzed.
    pub total_feedback: usize,
}

impl Default for CorrectionAnalysis {
    fn default() -> Self {
        Self {
            patterns: TrackedField::ALL
                .iter()
                .map(|f| (*f, BTreeMap::new()))
                .collect(),
            first_seen: TrackedField::ALL.iter().map(|f| (*f, Vec::new())).collect(),
            corrections_count: TrackedField::ALL.iter().map(|f| (*f, 0)).collect(),
            total_feedback: 0,
        }
    }
}

impl CorrectionAnalysis {
    /// Keyword tally for `field`.
    pub fn keywords(&self, field: TrackedField) -> Option<&BTreeMap<String, usize>> {
        self.patterns.get(&field)
    }

    /// Number of corrections recorded for `field`.
    pub fn corrections(&self, field: TrackedField) -> usize {
        self.corrections_count.get(&field).copied().unwrap_or(0)
    }

    /// Index of `keyword` in the first-seen order of `field`.
    pub fn first_seen_index(&self, field: TrackedField, keyword: &str) -> Option<usize> {
        self.first_seen
            .get(&field)?
            .iter()
            .position(|k| k == keyword)
    }

    fn tally(&mut self, field: TrackedField, keyword: &str) {
        let counts = self.patterns.entry(field).or_default();
        match counts.get_mut(keyword) {
            Some(count) => *count += 1,
            None => {
                counts.insert(keyword.to_string(), 1);
                self.first_seen
                    .entry(field)
                    .or_default()
                    .push(keyword.to_string());
            }
        }
    }
}

/// Candidate keywords for a field, or an empty list for fields tallied by value.
pub fn candidate_keywords(field: TrackedField) -> &'static [&'static str] {
    match field {
        TrackedField::ProjectName => &PROJECT_KEYWORDS,
        TrackedField::InvoicedTotal => &TOTAL_KEYWORDS,
        TrackedField::Currency | TrackedField::InvoiceNumber => &[],
    }
}

/// Scans correction records and tallies keywords found next to corrected values.
#[derive(Debug, Clone, Default)]
pub struct CorrectionAnalyzer;

impl CorrectionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a batch of entries.
    ///
    /// Entries are independent of each other, so any ordering of the same batch yields the same
    /// frequency tables. Only `first_seen` follows the batch order.
    pub fn analyze(&self, entries: &[FeedbackEntry]) -> CorrectionAnalysis {
        let mut analysis = CorrectionAnalysis::default();

        for entry in entries {
            self.analyze_entry(entry, &mut analysis);
        }
        analysis.total_feedback = entries.len();

        info!(
            "Analyzed {} feedback entries ({} project, {} total, {} currency, {} number corrections)",
            analysis.total_feedback,
            analysis.corrections(TrackedField::ProjectName),
            analysis.corrections(TrackedField::InvoicedTotal),
            analysis.corrections(TrackedField::Currency),
            analysis.corrections(TrackedField::InvoiceNumber),
        );

        analysis
    }

    fn analyze_entry(&self, entry: &FeedbackEntry, analysis: &mut CorrectionAnalysis) {
        let raw_text = entry.raw_text.to_lowercase();

        for field in TrackedField::ALL {
            if !entry.is_corrected(field) {
                continue;
            }
            *analysis.corrections_count.entry(field).or_insert(0) += 1;

            let corrected = field.value(&entry.corrected_data).trim();
            if corrected.is_empty() {
                continue;
            }

            match field {
                TrackedField::ProjectName => {
                    let needles = [corrected.to_lowercase()];
                    if let Some(window) = context_window(&raw_text, &needles, PROJECT_CONTEXT_CHARS) {
                        tally_keywords(analysis, field, window);
                    }
                }
                TrackedField::InvoicedTotal => {
                    let needles = total_needles(corrected);
                    if let Some(window) = context_window(&raw_text, &needles, TOTAL_CONTEXT_CHARS) {
                        tally_keywords(analysis, field, window);
                    }
                }
                TrackedField::Currency => analysis.tally(field, corrected),
                TrackedField::InvoiceNumber => {}
            }
        }
    }
}

fn tally_keywords(analysis: &mut CorrectionAnalysis, field: TrackedField, window: &str) {
    for keyword in candidate_keywords(field) {
        if window.contains(keyword) {
            debug!("Keyword {:?} near corrected {}", keyword, field);
            analysis.tally(field, keyword);
        }
    }
}

/// Spellings of a corrected total to look for: as typed, then in Czech format.
fn total_needles(corrected: &str) -> Vec<String> {
    let mut needles = vec![corrected.to_lowercase()];
    if let Ok(amount) = normalize_amount(corrected) {
        let czech = format_czech_amount(amount.value);
        if !needles.contains(&czech) {
            needles.push(czech);
        }
    }
    needles
}

/// Context around the first occurrence of the first needle found in `haystack`.
///
/// The window extends `radius` characters on each side of the match, clamped to the text.
pub fn context_window<'a>(haystack: &'a str, needles: &[String], radius: usize) -> Option<&'a str> {
    let (start, len) = needles
        .iter()
        .filter(|n| !n.is_empty())
        .find_map(|n| haystack.find(n.as_str()).map(|idx| (idx, n.len())))?;
    let end = start + len;

    let window_start = haystack[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let window_end = haystack[end..]
        .char_indices()
        .nth(radius)
        .map_or(haystack.len(), |(i, _)| end + i);

    Some(&haystack[window_start..window_end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::ExtractedInvoice;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn entry(raw: &str, corrected: ExtractedInvoice, fields: &[&str]) -> FeedbackEntry {
        FeedbackEntry {
            raw_text: raw.to_string(),
            extracted_data: ExtractedInvoice::default(),
            corrected_data: corrected,
            corrections: fields.iter().map(|f| (f.to_string(), true)).collect::<HashMap<_, _>>(),
        }
    }

    fn tally(analysis: &CorrectionAnalysis, field: TrackedField) -> Vec<(String, usize)> {
        analysis
            .keywords(field)
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    fn sample_entries() -> Vec<FeedbackEntry> {
        vec![
            entry(
                "Předmět: Vývoj portálu\nbez DPH: 495 000,00\nCelkem k úhradě 598 950,00",
                ExtractedInvoice {
                    project_name: "Vývoj portálu".to_string(),
                    invoiced_total: "495000.00".to_string(),
                    ..Default::default()
                },
                &["projectName", "invoicedTotal"],
            ),
            entry(
                "Project: Data platform\nTotal amount 12000.00 EUR",
                ExtractedInvoice {
                    project_name: "data PLATFORM".to_string(),
                    invoiced_total: "12000.00".to_string(),
                    currency: "EUR".to_string(),
                    ..Default::default()
                },
                &["projectName", "invoicedTotal", "currency"],
            ),
            entry(
                "Service: Hosting\nčíslo: 77",
                ExtractedInvoice {
                    project_name: "Something else entirely".to_string(),
                    invoice_number: "77".to_string(),
                    ..Default::default()
                },
                &["projectName", "invoiceNumber"],
            ),
        ]
    }

    #[test]
    fn test_counts_and_tallies() {
        let analysis = CorrectionAnalyzer::new().analyze(&sample_entries());

        assert_eq!(analysis.total_feedback, 3);
        assert_eq!(analysis.corrections(TrackedField::ProjectName), 3);
        assert_eq!(analysis.corrections(TrackedField::InvoicedTotal), 2);
        assert_eq!(analysis.corrections(TrackedField::Currency), 1);
        assert_eq!(analysis.corrections(TrackedField::InvoiceNumber), 1);

        assert_eq!(
            tally(&analysis, TrackedField::ProjectName),
            vec![("project".to_string(), 1), ("předmět".to_string(), 1)]
        );
        assert_eq!(
            tally(&analysis, TrackedField::InvoicedTotal),
            vec![
                ("amount".to_string(), 1),
                ("celkem".to_string(), 1),
                ("k úhradě".to_string(), 1),
                ("total".to_string(), 1),
            ]
        );
        assert_eq!(
            tally(&analysis, TrackedField::Currency),
            vec![("EUR".to_string(), 1)]
        );
        assert!(analysis.keywords(TrackedField::InvoiceNumber).unwrap().is_empty());
    }

    #[test]
    fn test_czech_formatted_total_is_found() {
        // "495000.00" is not in the text verbatim, its Czech spelling is.
        let entries = vec![entry(
            "Základ: 495 000,00 Kč celkem",
            ExtractedInvoice {
                invoiced_total: "495000.00".to_string(),
                ..Default::default()
            },
            &["invoicedTotal"],
        )];

        let analysis = CorrectionAnalyzer::new().analyze(&entries);
        assert_eq!(
            tally(&analysis, TrackedField::InvoicedTotal),
            vec![("celkem".to_string(), 1)]
        );
    }

    #[test]
    fn test_uncorrected_fields_ignored() {
        let mut e = entry(
            "Project: Data platform",
            ExtractedInvoice {
                project_name: "Data platform".to_string(),
                ..Default::default()
            },
            &[],
        );
        e.corrections.insert("projectName".to_string(), false);

        let analysis = CorrectionAnalyzer::new().analyze(&[e]);
        assert_eq!(analysis.corrections(TrackedField::ProjectName), 0);
        assert!(analysis.keywords(TrackedField::ProjectName).unwrap().is_empty());
        assert_eq!(analysis.total_feedback, 1);
    }

    #[test]
    fn test_order_independence() {
        let entries = sample_entries();
        let forward = CorrectionAnalyzer::new().analyze(&entries);

        let mut reversed = entries.clone();
        reversed.reverse();
        let backward = CorrectionAnalyzer::new().analyze(&reversed);

        let rotated: Vec<FeedbackEntry> = entries[1..]
            .iter()
            .chain(entries[..1].iter())
            .cloned()
            .collect();
        let rotated = CorrectionAnalyzer::new().analyze(&rotated);

        // First-seen order follows the batch; the tallies do not.
        for other in [&backward, &rotated] {
            assert_eq!(forward.patterns, other.patterns);
            assert_eq!(forward.corrections_count, other.corrections_count);
            assert_eq!(forward.total_feedback, other.total_feedback);
        }
    }

    #[test]
    fn test_first_seen_follows_entry_then_candidate_order() {
        let entries = sample_entries();
        let analysis = CorrectionAnalyzer::new().analyze(&entries);
        assert_eq!(
            analysis.first_seen[&TrackedField::InvoicedTotal],
            vec!["celkem", "k úhradě", "total", "amount"]
        );
        assert_eq!(
            analysis.first_seen_index(TrackedField::ProjectName, "předmět"),
            Some(0)
        );

        let mut reversed = entries;
        reversed.reverse();
        let analysis = CorrectionAnalyzer::new().analyze(&reversed);
        assert_eq!(
            analysis.first_seen[&TrackedField::ProjectName],
            vec!["project", "předmět"]
        );
        assert_eq!(analysis.first_seen_index(TrackedField::ProjectName, "účel"), None);
    }

    fn project_correction(raw: String) -> FeedbackEntry {
        entry(
            &raw,
            ExtractedInvoice {
                project_name: "ABCDEFGH".to_string(),
                ..Default::default()
            },
            &["projectName"],
        )
    }

    fn total_correction(raw: String) -> FeedbackEntry {
        entry(
            &raw,
            ExtractedInvoice {
                invoiced_total: "12000.00".to_string(),
                ..Default::default()
            },
            &["invoicedTotal"],
        )
    }

    #[test]
    fn test_project_window_is_fifty_chars() {
        let analyzer = CorrectionAnalyzer::new();
        let before = |gap: usize| project_correction(format!("item:{}ABCDEFGH", "x".repeat(gap)));
        let after = |gap: usize| project_correction(format!("ABCDEFGH{}item", "x".repeat(gap)));

        // "item:" + 45 filler puts the keyword's first char exactly 50 chars before the value.
        let analysis = analyzer.analyze(&[before(45), after(46)]);
        assert_eq!(
            tally(&analysis, TrackedField::ProjectName),
            vec![("item".to_string(), 2)]
        );

        let analysis = analyzer.analyze(&[before(46), after(47)]);
        assert!(analysis.keywords(TrackedField::ProjectName).unwrap().is_empty());
        assert_eq!(analysis.corrections(TrackedField::ProjectName), 2);
    }

    #[test]
    fn test_total_window_is_thirty_chars() {
        let analyzer = CorrectionAnalyzer::new();
        let before = |gap: usize| total_correction(format!("celkem{}12000.00", "x".repeat(gap)));
        let after = |gap: usize| total_correction(format!("12000.00{}celkem", "x".repeat(gap)));

        let analysis = analyzer.analyze(&[before(24), after(24)]);
        assert_eq!(
            tally(&analysis, TrackedField::InvoicedTotal),
            vec![("celkem".to_string(), 2)]
        );

        let analysis = analyzer.analyze(&[before(25), after(25)]);
        assert!(analysis.keywords(TrackedField::InvoicedTotal).unwrap().is_empty());
    }

    #[test]
    fn test_context_window_is_char_based() {
        let text = "ááááá předmět: x ééééé";
        let window = context_window(text, &["x".to_string()], 3).unwrap();
        assert_eq!(window, "t: x éé");

        let window = context_window(text, &["x".to_string()], 100).unwrap();
        assert_eq!(window, text);

        assert_eq!(context_window(text, &["missing".to_string()], 3), None);
        assert_eq!(context_window(text, &[String::new()], 3), None);
    }

    #[test]
    fn test_empty_batch() {
        let analysis = CorrectionAnalyzer::new().analyze(&[]);
        assert_eq!(analysis, CorrectionAnalysis::default());
        assert_eq!(analysis.patterns.len(), 4);
    }
}
