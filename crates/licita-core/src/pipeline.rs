//! Validate-then-extract processing of a single upload.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{LicitaError, Result};
use crate::models::config::{LicitaConfig, ValidationConfig};
use crate::models::document::{ExtractionResult, UploadedDocument};
use crate::pdf::{PdfBackend, TextExtractor};
use crate::reaper::TempUpload;
use crate::validate::validate_file;

/// Runs integrity validation and text extraction on uploaded files.
#[derive(Clone)]
pub struct ExtractionPipeline {
    extractor: TextExtractor,
    limits: ValidationConfig,
}

impl ExtractionPipeline {
    /// Pipeline using the lopdf backend.
    pub fn new(config: &LicitaConfig) -> Self {
        Self {
            extractor: TextExtractor::new(config.extraction),
            limits: config.validation,
        }
    }

    /// Pipeline using a specific PDF backend.
    pub fn with_backend(config: &LicitaConfig, backend: Arc<dyn PdfBackend>) -> Self {
        Self {
            extractor: TextExtractor::with_backend(backend, config.extraction),
            limits: config.validation,
        }
    }

    /// Size bounds applied during validation.
    pub fn limits(&self) -> &ValidationConfig {
        &self.limits
    }

    /// Validate the file at `path` and extract its text.
    ///
    /// Extraction never starts on a file that failed validation.
    pub fn process_file(&self, path: &Path, declared_mime: &str) -> Result<ExtractionResult> {
        validate_file(path, declared_mime, &self.limits)?.into_result()?;
        debug!("{} passed validation", path.display());

        let result = self.extractor.extract(path)?;
        info!(
            "Extracted {} characters from {} ({} pages)",
            result.metadata.characters,
            path.display(),
            result.metadata.pages
        );
        Ok(result)
    }

    /// [`ExtractionPipeline::process_file`] for a received upload.
    pub fn process_document(&self, document: &UploadedDocument) -> Result<ExtractionResult> {
        self.process_file(&document.path, &document.mime_type)
    }

    /// Process a received upload on the blocking pool, then delete it.
    ///
    /// The file is removed on every path out of this call: success, failure,
    /// a panic inside the parser, or the caller dropping the future.
    pub async fn process_upload(
        &self,
        upload: TempUpload,
        document: UploadedDocument,
    ) -> Result<ExtractionResult> {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || {
            upload.run(|_| pipeline.process_document(&document))
        })
        .await
        .map_err(|e| LicitaError::Internal(format!("extraction task failed: {}", e)))?
    }
}
