//! Core library for Czech/English invoice field extraction.
//!
//! This crate provides:
//! - PDF text extraction
//! - Rule-based invoice field extraction (totals, dates, man-days, client)
//! - Offline learning of candidate patterns from reviewer corrections

pub mod error;
pub mod invoice;
pub mod learning;
pub mod models;
pub mod pdf;

pub use error::{ExtractionError, FeedbackError, PdfError, Result, UctoError};
pub use invoice::{ExtractionResult, InvoiceParser, PatternInvoiceParser};
pub use learning::{
    CorrectionAnalysis, CorrectionAnalyzer, FeedbackBatch, FeedbackStore, LearnedPattern,
    LearnedPatternSet, PatternSynthesizer,
};
pub use models::config::UctoConfig;
pub use models::feedback::{FeedbackEntry, TrackedField};
pub use models::invoice::{CandidateAmount, ExtractedInvoice};
pub use pdf::{PdfExtractor, PdfProcessor, PdfType};
