//! Core library for tender document processing.
//!
//! This crate provides:
//! - Upload reception into uniquely named temporary files
//! - Integrity validation (MIME type, `%PDF-` signature, size bounds)
//! - Per-page PDF text extraction behind a swappable backend
//! - Text cleaning and document statistics
//! - Classification of every failure into a user-facing error category
//! - Guaranteed removal of temporary uploads

pub mod classify;
pub mod clean;
pub mod error;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod reaper;
pub mod upload;
pub mod validate;

#[cfg(any(test, feature = "test-util"))]
pub mod fixtures;

pub use classify::{ErrorCategory, ErrorReport};
pub use clean::clean;
pub use error::{ExtractionError, LicitaError, PageError, Rejection, Result, UploadError};
pub use models::config::LicitaConfig;
pub use models::document::{ExtractionResult, TextMetadata, UploadedDocument};
pub use pdf::{LopdfBackend, PdfBackend, PdfDocument, TextExtractor};
pub use pipeline::ExtractionPipeline;
pub use reaper::{with_temporary_upload, TempUpload};
pub use upload::UploadReceiver;
pub use validate::{validate, ValidationOutcome};

/// Re-export analysis types.
pub use licita_analysis::{AnalysisBackend, AnalysisError, OpenAiBackend, TenderAnalysis};
