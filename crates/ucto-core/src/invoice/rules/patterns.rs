//! Rule tables and shared regex patterns for Czech/English invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

use super::{project_text, trimmed, verbatim, FieldRule};

/// Legal-entity suffixes that mark a company name line.
pub const LEGAL_ENTITY_SUFFIXES: &str =
    r"s\.r\.o\.|s\.r\.o|a\.s\.|spol\.|Ltd\.|Inc\.|LLC|GmbH|Corp\.";

/// Labels that open the buyer block.
const CLIENT_LABELS: &str = r"odběratel|buyer|client";

lazy_static! {
    // Invoice number: Czech label first, then English prefixes
    pub static ref INVOICE_NUMBER_RULES: Vec<FieldRule> = vec![
        FieldRule::new("cislo", r"(?i)číslo\s*:?\s*([0-9]+)", 1, trimmed),
        FieldRule::new("invoice", r"(?i)invoice\s*(?:number|no|#)?\s*:?\s*([a-z0-9\-]+)", 1, trimmed),
        FieldRule::new("inv", r"(?i)inv\s*(?:number|no|#)?\s*:?\s*([a-z0-9\-]+)", 1, trimmed),
        FieldRule::new("hash", r"(?i)#\s*([a-z0-9\-]+)", 1, trimmed),
    ];

    // Project name: label followed by the rest of the line
    pub static ref PROJECT_NAME_RULES: Vec<FieldRule> = vec![
        FieldRule::new(
            "project_label",
            r"(?i)(?:project|description|service|item|předmět|název)\s*:?\s*([^\n]{5,100})",
            1,
            project_text,
        ),
        FieldRule::new("ucel", r"(?i)účel\s*:?\s*([^\n]{5,100})", 1, project_text),
    ];

    // Totals, in priority order. VAT-exclusive and VAT-breakdown labels come first.
    pub static ref AMOUNT_RULES: Vec<FieldRule> = vec![
        FieldRule::new("bez_dph", r"(?i)bez\s+dph\s*[:\s]*([0-9\s]+[.,][0-9]+)", 1, verbatim),
        FieldRule::new("soucet", r"(?i)součet\s*[:\s]*([0-9\s]+[.,][0-9]+)", 1, verbatim),
        FieldRule::new("zaklad_dph", r"(?i)základ\s+dph\s*[:\s]*([0-9\s]+[.,][0-9]+)", 1, verbatim),
        FieldRule::new(
            "celkem_k_uhrade_currency",
            r"(?i)celkem\s+k\s+úhradě\s*\([^)]*\)\s*([0-9\s]+[.,][0-9]+)",
            1,
            verbatim,
        ),
        FieldRule::new(
            "celkem_k_uhrade",
            r"(?i)celkem\s+k\s+úhradě\s*:?\s*([0-9\s,]+[.,]?[0-9]+)",
            1,
            verbatim,
        ),
        FieldRule::new(
            "czech_total",
            r"(?i)(?:celkem|celková\s+částka|suma|částka)\s*:?\s*([0-9\s,]+[.,]?[0-9]+)\s*(?:kč|czk)",
            1,
            verbatim,
        ),
        FieldRule::new(
            "english_total",
            r"(?i)(?:total|amount|sum|subtotal|due|invoice\s+total)\s*:?\s*([0-9\s,]+[.,]?[0-9]+)\s*(?:kč|czk|eur|€)",
            1,
            verbatim,
        ),
        FieldRule::new(
            "bare_amount",
            r"\b(\d{1,3}(?:[ \u{00a0}]?\d{3})*,\d{2})\b",
            1,
            verbatim,
        ),
    ];

    // Issue date: Czech label first, then English labels, then a bare "datum"
    pub static ref INVOICE_DATE_RULES: Vec<FieldRule> = vec![
        FieldRule::new("datum_vystaveni", r"(?i)datum\s+vystavení\s*:?\s*(\d{1,2}\.\d{1,2}\.\d{2,4})", 1, verbatim),
        FieldRule::new(
            "invoice_date",
            r"(?i)(?:invoice\s*date|date\s*of\s*invoice|issued)\s*:?\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})",
            1,
            verbatim,
        ),
        FieldRule::new("datum", r"(?i)datum\s*:?\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})", 1, verbatim),
    ];

    pub static ref DUE_DATE_RULES: Vec<FieldRule> = vec![
        FieldRule::new("datum_splatnosti", r"(?i)datum\s+splatnosti\s*:?\s*(\d{1,2}\.\d{1,2}\.\d{2,4})", 1, verbatim),
        FieldRule::new(
            "due_date",
            r"(?i)(?:due\s*date|payment\s*due|pay\s*by|splatnost)\s*:?\s*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})",
            1,
            verbatim,
        ),
    ];

    // Man-day line item: "MD 18 15 000,00 21% 270 000,00"
    pub static ref MD_LINE: Regex = Regex::new(
        r"(?i)\bMD\s+([0-9]+)\s+([0-9\s,]+[.,][0-9]+)"
    ).unwrap();

    pub static ref UNIT_COUNT: Regex = Regex::new(
        r"(?i)počet\s+mj\s*:?\s*([0-9]+)"
    ).unwrap();

    pub static ref UNIT_RATE: Regex = Regex::new(
        r"(?i)cena\s+mj\s*:?\s*([0-9\s,]+[.,][0-9]+)"
    ).unwrap();

    // Client: company line 3, 2, 1 or 0 lines below the buyer label, then a generic client line
    pub static ref CLIENT_RULES: Vec<FieldRule> = {
        let names = ["client_skip3", "client_skip2", "client_skip1", "client_inline"];
        let mut rules: Vec<FieldRule> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let skipped = r"[^\n]*\n".repeat(3 - i);
                let pattern = format!(
                    r"(?i)(?:{})\s*:?\s*{}([^\n]+(?:{}))",
                    CLIENT_LABELS, skipped, LEGAL_ENTITY_SUFFIXES
                );
                FieldRule::new(name, &pattern, 1, super::parties::clean_client_name)
            })
            .collect();
        rules.push(FieldRule::new(
            "client_line",
            r"(?i)client\s*:?\s*([^\n]+)",
            1,
            super::parties::clean_client_name,
        ));
        rules
    };

    pub static ref ICO_FRAGMENT: Regex = Regex::new(
        r"\s+IČO:\s*\d+"
    ).unwrap();

    pub static ref LEADING_NON_WORD: Regex = Regex::new(
        r"^\s*\W*"
    ).unwrap();

    // Euro markers for currency detection
    pub static ref EURO_TOKEN: Regex = Regex::new(
        r"(?i)eur|€"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_compile() {
        assert_eq!(INVOICE_NUMBER_RULES.len(), 4);
        assert_eq!(PROJECT_NAME_RULES.len(), 2);
        assert_eq!(AMOUNT_RULES.len(), 8);
        assert_eq!(INVOICE_DATE_RULES.len(), 3);
        assert_eq!(DUE_DATE_RULES.len(), 2);
        assert_eq!(CLIENT_RULES.len(), 5);
        assert!(MD_LINE.is_match("MD 18 15 000,00"));
        assert!(!MD_LINE.is_match("CMD 18 15 000,00"));
    }

    #[test]
    fn test_bare_amount_pattern() {
        let bare = &AMOUNT_RULES[7].pattern;
        let found: Vec<&str> = bare
            .captures_iter("Cena 123 456,00 a 99,50 a 1234567,89")
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(found, vec!["123 456,00", "99,50", "1234567,89"]);
    }
}
