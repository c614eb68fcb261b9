//! JSON file of correction records.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::error::FeedbackError;
use crate::models::feedback::FeedbackEntry;

/// Entries read from a store, plus what had to be skipped.
#[derive(Debug, Default)]
pub struct FeedbackBatch {
    pub entries: Vec<FeedbackEntry>,
    pub skipped: Vec<FeedbackError>,
}

impl FeedbackBatch {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Read-only view of the feedback file.
#[derive(Debug, Clone)]
pub struct FeedbackStore {
    path: PathBuf,
}

impl FeedbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load a snapshot of the store.
    ///
    /// Never fails: a missing file is an empty store, an unreadable or invalid one is an empty
    /// store with a warning.
    pub fn load(&self) -> FeedbackBatch {
        if !self.path.exists() {
            info!("No feedback store at {}", self.path.display());
            return FeedbackBatch::default();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Cannot read feedback store {}: {}", self.path.display(), e);
                return FeedbackBatch::default();
            }
        };

        let batch = Self::parse(&content);
        info!(
            "Loaded {} feedback entries from {} ({} skipped)",
            batch.entries.len(),
            self.path.display(),
            batch.skipped.len()
        );
        batch
    }

    /// Decode store content: a JSON array of entries.
    pub fn parse(content: &str) -> FeedbackBatch {
        let records: Vec<Value> = match serde_json::from_str(content) {
            Ok(records) => records,
            Err(e) => {
                warn!("Feedback store is not a JSON array of entries: {}", e);
                return FeedbackBatch::default();
            }
        };

        let mut batch = FeedbackBatch::default();
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<FeedbackEntry>(record) {
                Ok(entry) => batch.entries.push(entry),
                Err(e) => {
                    warn!("Skipping feedback entry #{}: {}", index, e);
                    batch.skipped.push(FeedbackError::Parse {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FeedbackStore::new(dir.path().join("none.json"));

        let batch = store.load();
        assert!(batch.is_empty());
        assert!(batch.skipped.is_empty());
    }

    #[test]
    fn test_invalid_json_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.json");
        fs::write(&path, "{ not json").unwrap();

        let batch = FeedbackStore::new(&path).load();
        assert!(batch.is_empty());
        assert!(batch.skipped.is_empty());
    }

    #[test]
    fn test_non_array_is_empty() {
        assert!(FeedbackStore::parse(r#"{"rawText": "x"}"#).is_empty());
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let json = r#"[
            {"rawText": "Předmět: A", "corrections": {"projectName": true}},
            "not an entry",
            {"rawText": "B", "corrections": {"currency": "yes"}},
            {}
        ]"#;

        let batch = FeedbackStore::parse(json);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.entries[0].raw_text, "Předmět: A");
        assert_eq!(batch.entries[1].raw_text, "");

        let skipped: Vec<usize> = batch
            .skipped
            .iter()
            .map(|e| match e {
                FeedbackError::Parse { index, .. } => *index,
                other => panic!("unexpected error {other}"),
            })
            .collect();
        assert_eq!(skipped, vec![1, 2]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.json");
        fs::write(&path, r#"[{"rawText": "Celkem 100,00"}]"#).unwrap();

        let store = FeedbackStore::new(&path);
        assert_eq!(store.load().len(), 1);
    }
}
