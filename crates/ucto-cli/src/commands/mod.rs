//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod train;

use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing::{debug, warn};

use ucto_core::invoice::{ExtractionResult, PatternInvoiceParser};
use ucto_core::models::config::{PdfConfig, UctoConfig};
use ucto_core::models::invoice::{ExtractedInvoice, FIELD_NAMES};
use ucto_core::pdf::{PdfExtractor, PdfProcessor, PdfType};

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used for per-file batch output.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<UctoConfig> {
    let config = match config_path {
        Some(path) => UctoConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Using config from {}", default_path.display());
                UctoConfig::from_file(&default_path)?
            } else {
                UctoConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Whether `path` has an extension `read_document_text` understands.
pub fn is_supported(path: &Path) -> bool {
    matches!(file_extension(path).as_str(), "pdf" | "txt")
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Text of a PDF or plain-text document, possibly blank.
///
/// A PDF whose text is shorter than `min_text_length` counts as having no text.
pub fn read_document_text(path: &Path, pdf: &PdfConfig) -> anyhow::Result<String> {
    let extension = file_extension(path);

    let text = match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let mut extractor = PdfExtractor::with_config(pdf.clone());
            extractor.load(&data)?;
            debug!("PDF has {} pages", extractor.page_count());
            let text = extractor.extract_text()?;
            if extractor.classify(&text) == PdfType::Empty {
                warn!("{} has no usable text layer", path.display());
                String::new()
            } else {
                text
            }
        }
        "txt" => fs::read_to_string(path)?,
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    Ok(text)
}

/// Read and parse one document; a document without text is an error.
pub fn extract_document(
    path: &Path,
    parser: &PatternInvoiceParser,
    pdf: &PdfConfig,
) -> anyhow::Result<ExtractionResult> {
    let text = read_document_text(path, pdf)?;
    let result = parser
        .parse_document(&text)
        .with_context(|| format!("No text could be extracted from {}", path.display()))?;
    Ok(result)
}

pub fn format_invoice(invoice: &ExtractedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

fn format_csv(invoice: &ExtractedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(FIELD_NAMES)?;
    wtr.write_record(FIELD_NAMES.iter().map(|name| invoice.field(name).unwrap_or("")))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &ExtractedInvoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", invoice.invoice_number));
    output.push_str(&format!("Project: {}\n", invoice.project_name));
    output.push_str(&format!("Client:  {}\n", invoice.client));
    output.push('\n');

    output.push_str(&format!("Issued:  {}\n", invoice.invoice_date));
    output.push_str(&format!("Due:     {}\n", invoice.invoice_due_date));
    output.push('\n');

    output.push_str(&format!(
        "Total:   {} {}\n",
        invoice.invoiced_total, invoice.currency
    ));
    if !invoice.number_of_mds.is_empty() {
        output.push_str(&format!(
            "Man-days: {} x {} {}\n",
            invoice.number_of_mds, invoice.md_rate, invoice.currency
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_has_wire_header() {
        let invoice = ExtractedInvoice {
            invoice_number: "2025001".to_string(),
            ..Default::default()
        };
        let csv = format_invoice(&invoice, OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();

        assert!(lines.next().unwrap().starts_with("projectName,invoicedTotal,currency"));
        assert!(lines.next().unwrap().contains("2025001"));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(!is_supported(Path::new("scan.png")));
        assert!(is_supported(Path::new("invoice.PDF")));
        assert!(is_supported(Path::new("invoice.txt")));
    }
}
