//! Error types for the ucto-core library.

use thiserror::Error;

/// Main error type for the ucto library.
#[derive(Error, Debug)]
pub enum UctoError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Feedback store or learned pattern sink error.
    #[error("feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A numeric token did not normalize to a decimal number.
    #[error("unparseable amount: {0:?}")]
    UnparseableAmount(String),

    /// A synthesized or configured pattern failed to compile.
    #[error("invalid pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The document produced no text to extract from.
    #[error("no text extracted from document")]
    NoText,
}

/// Errors related to the correction record store and the learned pattern sink.
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// A single feedback entry could not be decoded.
    #[error("malformed feedback entry #{index}: {reason}")]
    Parse { index: usize, reason: String },

    /// Learned patterns could not be written.
    #[error("failed to write learned patterns to {path}: {reason}")]
    Write { path: String, reason: String },
}

/// Result type for the ucto library.
pub type Result<T> = std::result::Result<T, UctoError>;
