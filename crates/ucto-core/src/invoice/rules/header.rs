//! Invoice number and project name extraction.

use super::patterns::{INVOICE_NUMBER_RULES, PROJECT_NAME_RULES};
use super::{ExtractionMatch, FieldExtractor, RuleTable};

/// Extract the invoice number; the Czech `číslo:` label is tried before English prefixes.
pub fn extract_invoice_number(text: &str) -> Option<ExtractionMatch<String>> {
    RuleTable::new(&INVOICE_NUMBER_RULES).extract(text)
}

/// Extract a labeled project description of 6 to 99 characters.
pub fn extract_project_name(text: &str) -> Option<ExtractionMatch<String>> {
    RuleTable::new(&PROJECT_NAME_RULES).extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> Option<String> {
        extract_invoice_number(text).map(|m| m.value)
    }

    fn project(text: &str) -> Option<String> {
        extract_project_name(text).map(|m| m.value)
    }

    #[test]
    fn test_czech_invoice_number() {
        assert_eq!(
            number("Faktura - daňový doklad číslo: 202511038"),
            Some("202511038".to_string())
        );
        // Czech label wins even when an English prefix comes first
        assert_eq!(
            number("Invoice INV-7\nČíslo 42"),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_english_invoice_number() {
        assert_eq!(
            number("INVOICE NUMBER: 2024-001"),
            Some("2024-001".to_string())
        );
        assert_eq!(number("Ref # AB-12"), Some("AB-12".to_string()));
        assert_eq!(number("Nothing to see"), None);
    }

    #[test]
    fn test_project_name() {
        assert_eq!(
            project("Předmět: Vývoj zákaznického portálu\nCena: 10"),
            Some("Vývoj zákaznického portálu".to_string())
        );
        assert_eq!(
            project("Účel platby: Konzultace Q3"),
            Some("platby: Konzultace Q3".to_string())
        );
    }

    #[test]
    fn test_project_name_length_bounds() {
        // Five characters are not enough and the second rule has no label to match.
        assert_eq!(project("Project: Alpha"), None);
        assert_eq!(
            project("Service: Backend hosting"),
            Some("Backend hosting".to_string())
        );
    }
}
