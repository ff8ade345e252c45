//! Integrity validation of uploaded files.
//!
//! Validation never trusts the file name: besides the declared MIME type it
//! sniffs the `%PDF-` signature from the first bytes and checks the byte
//! length against configurable bounds.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{ExtractionError, Rejection};
use crate::models::config::ValidationConfig;

/// The only accepted MIME type.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Leading bytes of every PDF file.
pub const PDF_SIGNATURE: &[u8; 5] = b"%PDF-";

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// All checks passed.
    Valid,
    /// The first failing check.
    Invalid(Rejection),
}

impl ValidationOutcome {
    /// Whether all checks passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// Convert into a `Result` for `?` propagation.
    pub fn into_result(self) -> Result<(), Rejection> {
        match self {
            ValidationOutcome::Valid => Ok(()),
            ValidationOutcome::Invalid(reason) => Err(reason),
        }
    }
}

/// Validate with the default size bounds (100 bytes to 50 MiB).
pub fn validate(prefix: &[u8], declared_mime: &str, size: u64) -> ValidationOutcome {
    validate_with(prefix, declared_mime, size, &ValidationConfig::default())
}

/// Validate an upload from its first bytes, declared MIME type and length.
///
/// Checks run in order (MIME type, signature, minimum size, maximum size)
/// and the first failure is reported.
pub fn validate_with(
    prefix: &[u8],
    declared_mime: &str,
    size: u64,
    limits: &ValidationConfig,
) -> ValidationOutcome {
    let reason = if !is_pdf_mime_type(declared_mime) {
        Some(Rejection::NotPdfMimeType {
            received: declared_mime.to_string(),
        })
    } else if !prefix.starts_with(PDF_SIGNATURE) {
        Some(Rejection::BadSignature)
    } else if size < limits.min_size_bytes {
        Some(Rejection::TooSmall {
            size,
            min: limits.min_size_bytes,
        })
    } else if size > limits.max_size_bytes {
        Some(Rejection::TooLarge {
            size,
            max: limits.max_size_bytes,
        })
    } else {
        None
    };

    reason.map_or(ValidationOutcome::Valid, ValidationOutcome::Invalid)
}

/// Validate a file on disk, reading only its signature and length.
pub fn validate_file(
    path: &Path,
    declared_mime: &str,
    limits: &ValidationConfig,
) -> Result<ValidationOutcome, ExtractionError> {
    let io_error = |source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_error)?;
    let size = file.metadata().map_err(io_error)?.len();

    let mut prefix = Vec::with_capacity(PDF_SIGNATURE.len());
    file.by_ref()
        .take(PDF_SIGNATURE.len() as u64)
        .read_to_end(&mut prefix)
        .map_err(io_error)?;

    Ok(validate_with(&prefix, declared_mime, size, limits))
}

/// `application/pdf`, ignoring ASCII case and any `;` parameters.
pub fn is_pdf_mime_type(declared_mime: &str) -> bool {
    declared_mime
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case(PDF_MIME_TYPE))
}
