use crate::error::Result;
use crate::sources::DocumentSource;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// Extracts the text layer of a PDF, every page in page order.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_path(&self, path: &Path) -> Result<String> {
        let document = Document::load(path)?;

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        debug!("Extracting {} pages from {}", page_numbers.len(), path.display());

        if page_numbers.is_empty() {
            return Ok(String::new());
        }

        Ok(document.extract_text(&page_numbers)?)
    }
}

impl DocumentSource for PdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        self.extract_path(path)
    }
}
