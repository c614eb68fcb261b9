//! Correction records collected after human review of extracted invoices.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::invoice::{lenient_string, ExtractedInvoice};

/// One reviewed extraction: the source text, what was extracted, and what the reviewer saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    /// Text the extraction ran on.
    #[serde(default, deserialize_with = "lenient_string")]
    pub raw_text: String,

    /// Record as produced by the extractor.
    #[serde(default)]
    pub extracted_data: ExtractedInvoice,

    /// Record after the reviewer's edits.
    #[serde(default)]
    pub corrected_data: ExtractedInvoice,

    /// `true` for every field the reviewer changed.
    #[serde(default)]
    pub corrections: HashMap<String, bool>,
}

impl FeedbackEntry {
    /// Whether the reviewer edited `field`.
    pub fn is_corrected(&self, field: TrackedField) -> bool {
        self.corrections
            .get(field.as_str())
            .copied()
            .unwrap_or(false)
    }
}

/// Fields whose corrections feed the learning loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackedField {
    ProjectName,
    InvoicedTotal,
    Currency,
    InvoiceNumber,
}

impl TrackedField {
    /// All tracked fields, in reporting order.
    pub const ALL: [TrackedField; 4] = [
        TrackedField::ProjectName,
        TrackedField::InvoicedTotal,
        TrackedField::Currency,
        TrackedField::InvoiceNumber,
    ];

    /// Serialized record key.
    pub fn as_str(self) -> &'static str {
        match self {
            TrackedField::ProjectName => "projectName",
            TrackedField::InvoicedTotal => "invoicedTotal",
            TrackedField::Currency => "currency",
            TrackedField::InvoiceNumber => "invoiceNumber",
        }
    }

    /// Value of this field in `invoice`.
    pub fn value(self, invoice: &ExtractedInvoice) -> &str {
        match self {
            TrackedField::ProjectName => &invoice.project_name,
            TrackedField::InvoicedTotal => &invoice.invoiced_total,
            TrackedField::Currency => &invoice.currency,
            TrackedField::InvoiceNumber => &invoice.invoice_number,
        }
    }
}

impl fmt::Display for TrackedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
