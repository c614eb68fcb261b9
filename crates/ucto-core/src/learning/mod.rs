//! Offline learning from reviewer corrections.
//!
//! A training run loads a snapshot of the feedback store, tallies which labels appear next to
//! corrected values, and turns the most frequent ones into candidate patterns.

pub mod analyzer;
pub mod store;
pub mod synthesizer;

pub use analyzer::{CorrectionAnalysis, CorrectionAnalyzer};
pub use store::{FeedbackBatch, FeedbackStore};
pub use synthesizer::{LearnedPattern, LearnedPatternSet, PatternSynthesizer};

use crate::models::feedback::FeedbackEntry;

/// Analyze `entries` and synthesize up to `top_keywords` patterns per field.
pub fn train(entries: &[FeedbackEntry], top_keywords: usize) -> LearnedPatternSet {
    let analysis = CorrectionAnalyzer::new().analyze(entries);
    PatternSynthesizer::new()
        .with_top_keywords(top_keywords)
        .synthesize(&analysis)
}
