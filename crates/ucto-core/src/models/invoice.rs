//! Invoice record produced by field extraction.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder project name used when neither a project label nor an invoice number was found.
pub const DEFAULT_PROJECT_NAME: &str = "Imported Invoice";

/// Currency assumed when no Euro token is seen.
pub const DEFAULT_CURRENCY: &str = "CZK";

/// Structured invoice fields extracted from document text.
///
/// Every field is a plain string so that the record can be shown to a reviewer, edited, and
/// stored next to the corrected version without lossy conversions. Empty means "not found".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedInvoice {
    /// Project or service description.
    #[serde(deserialize_with = "lenient_string")]
    pub project_name: String,

    /// Invoiced total excluding VAT, dot-decimal (e.g. `495000.00`).
    #[serde(deserialize_with = "lenient_string")]
    pub invoiced_total: String,

    /// ISO currency code, `CZK` or `EUR`.
    #[serde(deserialize_with = "lenient_string")]
    pub currency: String,

    /// Exchange rate; never filled by extraction, kept for the reviewer.
    #[serde(deserialize_with = "lenient_string")]
    pub exchange_rate: String,

    /// Issue date as written in the document.
    #[serde(deserialize_with = "lenient_string")]
    pub invoice_date: String,

    /// Due date as written in the document.
    #[serde(deserialize_with = "lenient_string")]
    pub invoice_due_date: String,

    /// Invoice number.
    #[serde(deserialize_with = "lenient_string")]
    pub invoice_number: String,

    /// Total number of man-days over all line items.
    #[serde(rename = "numberOfMDs", deserialize_with = "lenient_string")]
    pub number_of_mds: String,

    /// Man-day rate, dot-decimal.
    #[serde(rename = "mdRate", deserialize_with = "lenient_string")]
    pub md_rate: String,

    /// Client (buyer) name.
    #[serde(deserialize_with = "lenient_string")]
    pub client: String,
}

impl Default for ExtractedInvoice {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            invoiced_total: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            exchange_rate: String::new(),
            invoice_date: String::new(),
            invoice_due_date: String::new(),
            invoice_number: String::new(),
            number_of_mds: String::new(),
            md_rate: String::new(),
            client: String::new(),
        }
    }
}

impl ExtractedInvoice {
    /// Look up a field by its serialized (camelCase) name.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "projectName" => &self.project_name,
            "invoicedTotal" => &self.invoiced_total,
            "currency" => &self.currency,
            "exchangeRate" => &self.exchange_rate,
            "invoiceDate" => &self.invoice_date,
            "invoiceDueDate" => &self.invoice_due_date,
            "invoiceNumber" => &self.invoice_number,
            "numberOfMDs" => &self.number_of_mds,
            "mdRate" => &self.md_rate,
            "client" => &self.client,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Serialized names of fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        FIELD_NAMES
            .iter()
            .copied()
            .filter(|name| self.field(name).is_some_and(str::is_empty))
            .collect()
    }
}

/// Serialized field names in record order.
pub const FIELD_NAMES: [&str; 10] = [
    "projectName",
    "invoicedTotal",
    "currency",
    "exchangeRate",
    "invoiceDate",
    "invoiceDueDate",
    "invoiceNumber",
    "numberOfMDs",
    "mdRate",
    "client",
];

/// An amount found while scanning for the invoiced total.
///
/// Lives for a single extraction pass only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateAmount {
    /// Token as captured from the text.
    pub raw_token: String,
    /// Dot-decimal rendering of the token.
    pub normalized: String,
    /// Numeric value of the token.
    pub value: Decimal,
    /// `CZK` or `EUR`.
    pub currency: String,
    /// Full text matched by the rule, label included.
    pub matched_text: String,
}

/// Accepts strings, numbers, booleans and null where a string field is expected.
///
/// Correction records are written by other tools and sometimes carry totals as JSON numbers.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a string, found {}",
                other
            )));
        }
    })
}
