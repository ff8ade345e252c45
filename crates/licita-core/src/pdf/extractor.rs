//! Page-by-page text extraction with partial-failure tolerance.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{LopdfBackend, PageTexts, PdfBackend};
use crate::clean::clean;
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::document::{ExtractionResult, TextMetadata};

/// Extracts and cleans the text layer of a PDF.
#[derive(Clone)]
pub struct TextExtractor {
    backend: Arc<dyn PdfBackend>,
    config: ExtractionConfig,
}

impl TextExtractor {
    /// Create an extractor using the lopdf backend.
    pub fn new(config: ExtractionConfig) -> Self {
        Self::with_backend(Arc::new(LopdfBackend::new()), config)
    }

    /// Create an extractor using a specific backend.
    pub fn with_backend(backend: Arc<dyn PdfBackend>, config: ExtractionConfig) -> Self {
        Self { backend, config }
    }

    /// Extract text from the PDF at `path`.
    pub fn extract(&self, path: &Path) -> Result<ExtractionResult, ExtractionError> {
        let data = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        self.extract_bytes(&data)
    }

    /// Extract text from PDF bytes.
    ///
    /// Pages are read in order; a page that fails is logged and skipped.
    /// Fails with [`ExtractionError::ScannedOrEmpty`] when no page yields
    /// any text after cleaning.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<ExtractionResult, ExtractionError> {
        let document = self.backend.open(data)?;
        let page_count = document.page_count();

        if self.config.max_pages != 0 && page_count > self.config.max_pages {
            warn!(
                "Reading only the first {} of {} pages",
                self.config.max_pages, page_count
            );
        }

        let mut raw = String::new();
        let mut failed_pages = 0u32;

        for (page, text) in PageTexts::new(document.as_ref(), self.config.max_pages) {
            match text {
                Ok(text) if text.trim().is_empty() => {
                    debug!("Page {} has no text", page);
                }
                Ok(text) => {
                    raw.push_str(&text);
                    raw.push('\n');
                }
                Err(e) => {
                    failed_pages += 1;
                    warn!("Skipping unreadable page: {}", e);
                }
            }
        }

        let text = clean(&raw);
        if text.is_empty() {
            return Err(ExtractionError::ScannedOrEmpty { pages: page_count });
        }

        let metadata =
            TextMetadata::from_text(&text, data.len() as u64, page_count, self.config.page_count);

        debug!(
            "Extracted {} chars, {} words from {} pages ({} unreadable)",
            metadata.characters, metadata.words, page_count, failed_pages
        );

        Ok(ExtractionResult { text, metadata })
    }
}
