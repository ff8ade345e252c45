//! Error types for the licita-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the licita library.
#[derive(Error, Debug)]
pub enum LicitaError {
    /// The upload failed integrity validation.
    #[error("upload rejected: {0}")]
    Rejected(#[from] Rejection),

    /// Text extraction failed.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Receiving the upload failed.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected failure (panicked worker, cancelled task).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Reasons an upload is rejected before extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Declared MIME type is not `application/pdf`.
    #[error("declared MIME type {received:?} is not application/pdf")]
    NotPdfMimeType { received: String },

    /// The first bytes are not `%PDF-`.
    #[error("missing %PDF- signature")]
    BadSignature,

    /// Below the minimum byte length.
    #[error("file is too small: {size} bytes (minimum {min})")]
    TooSmall { size: u64, min: u64 },

    /// Above the maximum byte length.
    #[error("file is too large: {size} bytes (maximum {max})")]
    TooLarge { size: u64, max: u64 },
}

/// Errors raised while extracting text from a PDF.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file is missing or unreadable.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF structure could not be parsed.
    #[error("PDF structure is corrupt: {0}")]
    Corrupt(String),

    /// The PDF needs a password to read its content.
    #[error("PDF is password protected")]
    PasswordProtected,

    /// The PDF parsed but has no text layer.
    #[error("no extractable text in {pages} page(s)")]
    ScannedOrEmpty { pages: u32 },
}

/// A single page could not be read. Never fatal for the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("page {page}: {reason}")]
pub struct PageError {
    /// Page number (1-indexed).
    pub page: u32,
    /// Backend-provided description.
    pub reason: String,
}

/// Errors raised while receiving an upload.
#[derive(Error, Debug)]
pub enum UploadError {
    /// More bytes arrived than allowed.
    #[error("upload exceeds the maximum of {max} bytes")]
    TooLarge { max: u64 },

    /// The client stream failed or was malformed.
    #[error("upload stream failed: {0}")]
    Stream(String),

    /// Writing the temporary file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the licita library.
pub type Result<T> = std::result::Result<T, LicitaError>;
