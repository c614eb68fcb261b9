//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, PatternInvoiceParser};

/// Trait for invoice parsing.
///
/// Parsing never fails: fields without a match keep their default value, and deciding whether an
/// all-default record is usable is up to the caller.
pub trait InvoiceParser {
    /// Parse invoice fields from document text.
    fn parse(&self, text: &str) -> ExtractionResult;
}
