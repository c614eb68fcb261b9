//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// PDF text extractor using lopdf, with pdf-extract as a whole-document fallback.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    config: PdfConfig,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self::with_config(PdfConfig::default())
    }

    /// Create an extractor with explicit page and text-layer limits.
    pub fn with_config(config: PdfConfig) -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            config,
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Pages to read, honoring `max_pages`.
    fn pages_to_read(&self) -> u32 {
        let count = self.page_count();
        match self.config.max_pages {
            0 => count,
            max => count.min(u32::try_from(max).unwrap_or(u32::MAX)),
        }
    }

    /// Whether `text` is long enough to count as a text layer.
    pub fn classify(&self, text: &str) -> PdfType {
        if text.trim().chars().count() >= self.config.min_text_length.max(1) {
            PdfType::Text
        } else {
            PdfType::Empty
        }
    }

    /// Whole-document extraction with pdf-extract.
    fn fallback_text(&self) -> String {
        match pdf_extract::extract_text_from_mem(&self.raw_data) {
            Ok(text) => text,
            Err(e) => {
                debug!("pdf-extract fallback failed: {}", e);
                String::new()
            }
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        self.document()?;

        let pages: Vec<String> = (1..=self.pages_to_read())
            .map(|page| self.extract_page_text(page).unwrap_or_default())
            .collect();
        let text = pages.join("\n");

        if !text.trim().is_empty() {
            return Ok(text);
        }

        debug!("lopdf found no text, falling back to pdf-extract");
        Ok(self.fallback_text())
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if !doc.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}
