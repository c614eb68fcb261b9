//! Date extraction for Czech/English invoices.
//!
//! Dates are kept exactly as written; no calendar normalization is attempted.

use super::patterns::{DUE_DATE_RULES, INVOICE_DATE_RULES};
use super::{ExtractionMatch, FieldExtractor, RuleTable};

/// Labeled dates found on an invoice.
#[derive(Debug, Clone, Default)]
pub struct InvoiceDates {
    /// Issue date (datum vystavení).
    pub issue_date: Option<ExtractionMatch<String>>,
    /// Due date (datum splatnosti).
    pub due_date: Option<ExtractionMatch<String>>,
}

/// Extract the issue and due dates from invoice text.
pub fn extract_dates(text: &str) -> InvoiceDates {
    InvoiceDates {
        issue_date: RuleTable::new(&INVOICE_DATE_RULES).extract(text),
        due_date: RuleTable::new(&DUE_DATE_RULES).extract(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(dates: &InvoiceDates) -> (Option<&str>, Option<&str>) {
        (
            dates.issue_date.as_ref().map(|m| m.value.as_str()),
            dates.due_date.as_ref().map(|m| m.value.as_str()),
        )
    }

    #[test]
    fn test_czech_labeled_dates() {
        let text = r#"
            Datum vystavení : 03.12.2025
            Datum splatnosti: 02.01.2026
        "#;

        let dates = extract_dates(text);
        assert_eq!(values(&dates), (Some("03.12.2025"), Some("02.01.2026")));
        assert_eq!(dates.issue_date.unwrap().rule, "datum_vystaveni");
    }

    #[test]
    fn test_english_labeled_dates() {
        let text = "Invoice date: 12/01/2025\nPayment due: 01-02-2025";

        let dates = extract_dates(text);
        assert_eq!(values(&dates), (Some("12/01/2025"), Some("01-02-2025")));
    }

    #[test]
    fn test_czech_label_takes_priority() {
        let text = "Issued: 01/12/2025\nDatum vystavení: 3.12.25";

        let dates = extract_dates(text);
        assert_eq!(values(&dates).0, Some("3.12.25"));
    }

    #[test]
    fn test_generic_datum_fallback() {
        let text = "Datum: 5-6-2024\nSplatnost 20.6.2024";

        let dates = extract_dates(text);
        assert_eq!(values(&dates), (Some("5-6-2024"), Some("20.6.2024")));
    }

    #[test]
    fn test_no_dates() {
        let dates = extract_dates("Faktura bez data");
        assert_eq!(values(&dates), (None, None));
    }
}
