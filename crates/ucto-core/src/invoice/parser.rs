//! Pattern-based invoice parser for Czech/English documents.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::invoice::{ExtractedInvoice, DEFAULT_PROJECT_NAME};

use super::rules::{
    amounts::TotalExtractor,
    dates::extract_dates,
    header::{extract_invoice_number, extract_project_name},
    line_items::extract_man_days,
    parties::extract_client,
};
use super::InvoiceParser;

/// Result of invoice extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Extracted invoice data.
    pub invoice: ExtractedInvoice,
    /// Serialized names of fields no rule filled.
    pub missing_fields: Vec<&'static str>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Whether no rule matched anything at all.
    ///
    /// The project name placeholder and the default currency do not count as matches.
    pub fn is_empty(&self) -> bool {
        self.invoice == ExtractedInvoice {
            project_name: self.invoice.project_name.clone(),
            ..ExtractedInvoice::default()
        } && self.missing_fields.contains(&"projectName")
    }
}

/// Invoice parser driven by ordered per-field rule tables.
///
/// Holds no mutable state; one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct PatternInvoiceParser {
    /// Project name used when no project label and no invoice number were found.
    default_project_name: String,
}

impl PatternInvoiceParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            default_project_name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }

    /// Set the placeholder project name.
    pub fn with_default_project_name(mut self, name: impl Into<String>) -> Self {
        self.default_project_name = name.into();
        self
    }

    /// Extract the invoice record; fields without a match keep their defaults.
    pub fn extract(&self, text: &str) -> ExtractedInvoice {
        self.parse(text).invoice
    }

    /// Parse text decoded from a document, rejecting documents that produced no text.
    pub fn parse_document(&self, text: &str) -> Result<ExtractionResult, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText);
        }
        Ok(self.parse(text))
    }
}

impl Default for PatternInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for PatternInvoiceParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut invoice = ExtractedInvoice::default();

        info!("Parsing invoice from {} characters of text", text.len());

        if let Some(found) = extract_invoice_number(text) {
            debug!("Invoice number {} via {}", found.value, found.rule);
            invoice.invoice_number = found.value;
        }

        if let Some(found) = extract_project_name(text) {
            debug!("Project name {:?} via {}", found.value, found.rule);
            invoice.project_name = found.value;
        }

        if let Some(selection) = TotalExtractor::new().select(text) {
            let candidate = selection.into_candidate();
            invoice.invoiced_total = candidate.normalized;
            invoice.currency = candidate.currency;
        }

        let dates = extract_dates(text);
        if let Some(found) = dates.issue_date {
            invoice.invoice_date = found.value;
        }
        if let Some(found) = dates.due_date {
            invoice.invoice_due_date = found.value;
        }

        let man_days = extract_man_days(text);
        if let Some(count) = man_days.total_count {
            invoice.number_of_mds = count.to_string();
        }
        if let Some(rate) = man_days.rate {
            invoice.md_rate = rate.text;
        }

        if let Some(found) = extract_client(text) {
            debug!("Client {:?} via {}", found.value, found.rule);
            invoice.client = found.value;
        }

        let missing_fields = invoice.missing_fields();

        if invoice.project_name.is_empty() {
            invoice.project_name = if invoice.invoice_number.is_empty() {
                self.default_project_name.clone()
            } else {
                invoice.invoice_number.clone()
            };
        }

        debug!(
            "Extracted invoice {:?} with {} fields missing",
            invoice.invoice_number,
            missing_fields.len()
        );

        ExtractionResult {
            invoice,
            missing_fields,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CZECH_INVOICE: &str = r#"Faktura - daňový doklad číslo: 202511038
Dodavatel:
Example Dev s.r.o.
Odběratel:
Acme Holding
Vinohradská 12
120 00 Praha 2
Acme s.r.o. IČO: 12345678
Datum vystavení : 03.12.2025
Datum splatnosti: 02.01.2026
Předmět: Vývoj zákaznického portálu
Označení Jednotka Počet Cena
Vývoj backendu MD 18 15 000,00 21% 270 000,00
Vývoj frontendu MD 15 15 000,00 21% 225 000,00
Součet 495 000,00 103 950,00 598 950,00
Celkem k úhradě (CZK) 598 950,00
"#;

    #[test]
    fn test_parse_czech_invoice() {
        let invoice = PatternInvoiceParser::new().extract(CZECH_INVOICE);

        let expected = ExtractedInvoice {
            project_name: "Vývoj zákaznického portálu".to_string(),
            invoiced_total: "495000.00".to_string(),
            currency: "CZK".to_string(),
            exchange_rate: String::new(),
            invoice_date: "03.12.2025".to_string(),
            invoice_due_date: "02.01.2026".to_string(),
            invoice_number: "202511038".to_string(),
            number_of_mds: "33".to_string(),
            md_rate: "15000.00".to_string(),
            client: "Acme s.r.o.".to_string(),
        };

        assert_eq!(invoice, expected);
    }

    #[test]
    fn test_parse_english_invoice() {
        let text = "Invoice number: INV-2025-17\nBuyer: Contoso Ltd.\nDescription: Cloud migration\nInvoice date: 01/10/2025\nDue date: 31/10/2025\nTotal: 12 500,00 EUR\n";
        let invoice = PatternInvoiceParser::new().extract(text);

        assert_eq!(invoice.invoice_number, "INV-2025-17");
        assert_eq!(invoice.client, "Contoso Ltd.");
        assert_eq!(invoice.project_name, "Cloud migration");
        assert_eq!(invoice.invoice_date, "01/10/2025");
        assert_eq!(invoice.invoice_due_date, "31/10/2025");
        assert_eq!(invoice.invoiced_total, "12500.00");
        assert_eq!(invoice.currency, "EUR");
    }

    #[test]
    fn test_empty_text_yields_defaults() {
        let result = PatternInvoiceParser::new().parse("");

        assert_eq!(
            result.invoice,
            ExtractedInvoice {
                project_name: "Imported Invoice".to_string(),
                ..ExtractedInvoice::default()
            }
        );
        assert!(result.is_empty());
        assert_eq!(result.missing_fields.len(), 9);
    }

    #[test]
    fn test_parse_document_rejects_blank_text() {
        let parser = PatternInvoiceParser::new();
        assert_eq!(parser.parse_document(" \n\t"), Err(ExtractionError::NoText));
        assert!(parser.parse_document("číslo: 1").is_ok());
    }

    #[test]
    fn test_project_name_defaults_to_invoice_number() {
        let invoice = PatternInvoiceParser::new().extract("číslo: 2025001");
        assert_eq!(invoice.project_name, "2025001");
    }

    #[test]
    fn test_custom_placeholder() {
        let parser = PatternInvoiceParser::new().with_default_project_name("Unnamed");
        assert_eq!(parser.extract("nic").project_name, "Unnamed");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let parser = PatternInvoiceParser::new();
        assert_eq!(parser.extract(CZECH_INVOICE), parser.extract(CZECH_INVOICE));
    }
}
