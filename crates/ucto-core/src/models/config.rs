//! Configuration structures for extraction and training runs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::invoice::DEFAULT_PROJECT_NAME;
use crate::error::UctoError;

/// Main configuration for ucto.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UctoConfig {
    /// PDF text extraction configuration.
    pub pdf: PdfConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Pattern learning configuration.
    pub learning: LearningConfig,
}

/// PDF text extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Minimum trimmed text length to consider the PDF as having a text layer.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 1,
        }
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Project name used when neither a project label nor an invoice number is found.
    pub default_project_name: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_project_name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }
}

/// Pattern learning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// JSON array of correction records.
    pub feedback_file: PathBuf,

    /// Where learned patterns are written.
    pub output_file: PathBuf,

    /// Number of keywords kept per field.
    pub top_keywords: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            feedback_file: PathBuf::from("data/invoice-feedback.json"),
            output_file: PathBuf::from("learned_patterns.json"),
            top_keywords: 5,
        }
    }
}

impl UctoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Reject settings no run can use.
    pub fn validate(&self) -> crate::Result<()> {
        if self.learning.top_keywords == 0 {
            return Err(UctoError::Config(
                "learning.top_keywords must be at least 1".to_string(),
            ));
        }
        if self.extraction.default_project_name.trim().is_empty() {
            return Err(UctoError::Config(
                "extraction.default_project_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: UctoConfig =
            serde_json::from_str(r#"{"learning": {"top_keywords": 3}}"#).unwrap();

        assert_eq!(config.learning.top_keywords, 3);
        assert_eq!(
            config.learning.feedback_file,
            PathBuf::from("data/invoice-feedback.json")
        );
        assert_eq!(config.extraction.default_project_name, "Imported Invoice");
        assert_eq!(config.pdf.max_pages, 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = UctoConfig::default();
        config.learning.top_keywords = 7;
        config.save(&path).unwrap();

        let loaded = UctoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.learning.top_keywords, 7);
    }

    #[test]
    fn test_validate() {
        assert!(UctoConfig::default().validate().is_ok());

        let mut config = UctoConfig::default();
        config.learning.top_keywords = 0;
        assert!(matches!(config.validate(), Err(UctoError::Config(_))));

        let mut config = UctoConfig::default();
        config.extraction.default_project_name = "  ".to_string();
        assert!(matches!(config.validate(), Err(UctoError::Config(_))));
    }
}
