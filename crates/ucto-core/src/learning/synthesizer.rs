//! Turns keyword tallies into candidate extraction patterns.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::analyzer::CorrectionAnalysis;
use crate::error::{ExtractionError, FeedbackError};
use crate::models::feedback::TrackedField;

/// Default number of keywords kept per field.
pub const DEFAULT_TOP_KEYWORDS: usize = 5;

/// Fields patterns are synthesized for.
pub const SYNTHESIZED_FIELDS: [TrackedField; 2] =
    [TrackedField::ProjectName, TrackedField::InvoicedTotal];

/// A keyword and the pattern built around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedPattern {
    pub keyword: String,
    pub frequency: usize,
    pub pattern: String,
}

impl LearnedPattern {
    fn for_field(field: TrackedField, keyword: &str, frequency: usize) -> Self {
        let escaped = regex::escape(keyword);
        let pattern = match field {
            TrackedField::InvoicedTotal => format!(r"{}\s*:?\s*([0-9\s,]+[.,]?[0-9]*)", escaped),
            _ => format!(r"{}\s*:?\s*([^\n]{{5,100}})", escaped),
        };

        Self {
            keyword: keyword.to_string(),
            frequency,
            pattern,
        }
    }

    /// Compile the pattern, case-insensitively.
    pub fn compile(&self) -> Result<Regex, ExtractionError> {
        Regex::new(&format!("(?i){}", self.pattern)).map_err(|e| ExtractionError::InvalidPattern {
            pattern: self.pattern.clone(),
            reason: e.to_string(),
        })
    }
}

/// Output of a training run.
///
/// Advisory only: nothing in the extractor reads it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedPatternSet {
    /// Ranked patterns per field.
    pub patterns: BTreeMap<TrackedField, Vec<LearnedPattern>>,
    /// The analysis the patterns were derived from.
    pub statistics: CorrectionAnalysis,
    /// When the run happened.
    pub last_trained: Option<DateTime<Utc>>,
}

impl LearnedPatternSet {
    /// Stamp the set with a training time.
    pub fn with_trained_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_trained = Some(at);
        self
    }

    /// Patterns learned for `field`, best first.
    pub fn for_field(&self, field: TrackedField) -> &[LearnedPattern] {
        self.patterns.get(&field).map_or(&[], Vec::as_slice)
    }

    /// Check that every learned pattern compiles.
    pub fn validate(&self) -> Result<(), ExtractionError> {
        for pattern in self.patterns.values().flatten() {
            pattern.compile()?;
        }
        Ok(())
    }

    /// Write the set as pretty-printed JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        let write_error = |reason: String| FeedbackError::Write {
            path: path.display().to_string(),
            reason,
        };

        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        fs::write(path, json).map_err(|e| write_error(e.to_string()))?;

        info!("Saved learned patterns to {}", path.display());
        Ok(())
    }

    /// Read a previously saved set.
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Ranks keywords and emits one pattern per kept keyword.
#[derive(Debug, Clone)]
pub struct PatternSynthesizer {
    top_keywords: usize,
}

impl PatternSynthesizer {
    pub fn new() -> Self {
        Self {
            top_keywords: DEFAULT_TOP_KEYWORDS,
        }
    }

    /// Set how many keywords to keep per field.
    pub fn with_top_keywords(mut self, top_keywords: usize) -> Self {
        self.top_keywords = top_keywords;
        self
    }

    pub fn synthesize(&self, analysis: &CorrectionAnalysis) -> LearnedPatternSet {
        let patterns = SYNTHESIZED_FIELDS
            .iter()
            .map(|field| (*field, self.rank(*field, analysis)))
            .collect();

        LearnedPatternSet {
            patterns,
            statistics: analysis.clone(),
            last_trained: None,
        }
    }

    fn rank(&self, field: TrackedField, analysis: &CorrectionAnalysis) -> Vec<LearnedPattern> {
        let Some(tally) = analysis.keywords(field) else {
            return Vec::new();
        };

        let first_seen = |keyword: &str| {
            analysis
                .first_seen_index(field, keyword)
                .unwrap_or(usize::MAX)
        };

        let mut ranked: Vec<(&String, usize)> = tally.iter().map(|(k, v)| (k, *v)).collect();
        // Stable sort over an ordered map: keywords without a first-seen record stay alphabetical.
        ranked.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| first_seen(a.0).cmp(&first_seen(b.0)))
        });

        ranked
            .into_iter()
            .take(self.top_keywords)
            .map(|(keyword, frequency)| {
                let pattern = LearnedPattern::for_field(field, keyword, frequency);
                debug!("Learned {} pattern {}", field, pattern.pattern);
                pattern
            })
            .collect()
    }
}

impl Default for PatternSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
