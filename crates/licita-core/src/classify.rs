//! Mapping of failures to user-facing error categories.
//!
//! Every validation, extraction and upload failure is a tagged variant; this
//! module turns it into a stable error code, a message, a remediation hint
//! and an HTTP status class. No error message is ever parsed.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, LicitaError, Rejection, UploadError};

/// Fixed taxonomy of errors reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    WrongMimeType,
    BadSignature,
    TooSmall,
    TooLarge,
    Corrupt,
    PasswordProtected,
    ScannedOrEmpty,
    IoError,
    /// The multipart body was malformed or the client aborted it.
    MalformedUpload,
    /// The multipart body had no file field.
    MissingFile,
    /// Blank text was submitted for analysis.
    EmptyText,
    /// The request body was not the expected JSON.
    MalformedRequest,
    /// The analysis service failed.
    AnalysisFailed,
    /// No such route.
    NotFound,
    Internal,
}

impl ErrorCategory {
    /// Short stable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::WrongMimeType => "wrong-mimetype",
            Self::BadSignature => "bad-signature",
            Self::TooSmall => "too-small",
            Self::TooLarge => "too-large",
            Self::Corrupt => "corrupt",
            Self::PasswordProtected => "password-protected",
            Self::ScannedOrEmpty => "scanned-or-empty",
            Self::IoError => "io-error",
            Self::MalformedUpload => "malformed-upload",
            Self::MissingFile => "missing-file",
            Self::EmptyText => "empty-text",
            Self::MalformedRequest => "malformed-request",
            Self::AnalysisFailed => "analysis-failed",
            Self::NotFound => "not-found",
            Self::Internal => "internal",
        }
    }

    /// HTTP status class.
    pub fn status(self) -> u16 {
        match self {
            Self::WrongMimeType
            | Self::BadSignature
            | Self::TooSmall
            | Self::MalformedUpload
            | Self::MissingFile
            | Self::EmptyText
            | Self::MalformedRequest => 400,
            Self::NotFound => 404,
            Self::TooLarge => 413,
            Self::Corrupt | Self::PasswordProtected | Self::ScannedOrEmpty => 422,
            Self::AnalysisFailed => 502,
            Self::IoError | Self::Internal => 500,
        }
    }

    /// Human-readable description.
    pub fn message(self) -> &'static str {
        match self {
            Self::WrongMimeType => "Only PDF files are accepted.",
            Self::BadSignature => "The file is not a valid PDF or is damaged.",
            Self::TooSmall => "The PDF file is empty or too small.",
            Self::TooLarge => "The file exceeds the maximum allowed size.",
            Self::Corrupt => "The PDF file is corrupt or not valid.",
            Self::PasswordProtected => {
                "The PDF is password protected or has security restrictions."
            }
            Self::ScannedOrEmpty => {
                "The PDF was processed but contains no selectable text; it looks like a scanned image."
            }
            Self::IoError => "The uploaded file could not be found or read.",
            Self::MalformedUpload => "The upload could not be read.",
            Self::MissingFile => "No file was received.",
            Self::EmptyText => "No text was received for analysis.",
            Self::MalformedRequest => "The request body is not valid JSON.",
            Self::NotFound => "Route not found.",
            Self::AnalysisFailed => "The document analysis service failed.",
            Self::Internal => "An unexpected error occurred while processing the file.",
        }
    }

    /// Remediation hint, where the user can act.
    pub fn suggestion(self) -> Option<&'static str> {
        let hint = match self {
            Self::WrongMimeType => "Upload the document again as a real PDF (.pdf) file.",
            Self::BadSignature => "Verify the file's integrity and that it opens as a PDF.",
            Self::TooSmall => "Use a PDF that contains data.",
            Self::TooLarge => "Compress the PDF or split it into smaller files.",
            Self::Corrupt => "Open the PDF in a viewer or repair tool and save it again.",
            Self::PasswordProtected => {
                "Remove the password protection before extracting the text."
            }
            Self::ScannedOrEmpty => "Run the document through an OCR tool first.",
            Self::IoError => "Upload the file again.",
            Self::MalformedUpload => "Upload the file again.",
            Self::MissingFile => "Select a PDF file to process in the \"file\" field.",
            Self::MalformedRequest => "Send a JSON body such as {\"text\": \"...\"}.",
            Self::EmptyText | Self::NotFound => return None,
            Self::AnalysisFailed | Self::Internal => "Try again later.",
        };
        Some(hint)
    }

    /// Infrastructure failures expose technical details for debugging.
    pub fn is_infrastructure(self) -> bool {
        matches!(self, Self::IoError | Self::AnalysisFailed | Self::Internal)
    }
}

impl From<&Rejection> for ErrorCategory {
    fn from(reason: &Rejection) -> Self {
        match reason {
            Rejection::NotPdfMimeType { .. } => Self::WrongMimeType,
            Rejection::BadSignature => Self::BadSignature,
            Rejection::TooSmall { .. } => Self::TooSmall,
            Rejection::TooLarge { .. } => Self::TooLarge,
        }
    }
}

impl From<&ExtractionError> for ErrorCategory {
    fn from(err: &ExtractionError) -> Self {
        match err {
            ExtractionError::Io { .. } => Self::IoError,
            ExtractionError::Corrupt(_) => Self::Corrupt,
            ExtractionError::PasswordProtected => Self::PasswordProtected,
            ExtractionError::ScannedOrEmpty { .. } => Self::ScannedOrEmpty,
        }
    }
}

impl From<&UploadError> for ErrorCategory {
    fn from(err: &UploadError) -> Self {
        match err {
            UploadError::TooLarge { .. } => Self::TooLarge,
            UploadError::Stream(_) => Self::MalformedUpload,
            UploadError::Io(_) => Self::IoError,
        }
    }
}

impl From<&LicitaError> for ErrorCategory {
    fn from(err: &LicitaError) -> Self {
        match err {
            LicitaError::Rejected(reason) => reason.into(),
            LicitaError::Extraction(err) => err.into(),
            LicitaError::Upload(err) => err.into(),
            LicitaError::Config(_) | LicitaError::Internal(_) => Self::Internal,
        }
    }
}

/// Error record returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// Short stable code, see [`ErrorCategory::code`].
    pub error_code: String,
    /// Human-readable description.
    pub message: String,
    /// What the user can do about it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Technical detail, only for infrastructure failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_details: Option<String>,
    /// MIME type the client declared, for `wrong-mimetype`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_type: Option<String>,
    /// HTTP status class.
    #[serde(skip)]
    pub status: u16,
}

impl ErrorReport {
    /// Report for a category, without details.
    pub fn new(category: ErrorCategory) -> Self {
        Self {
            error_code: category.code().to_string(),
            message: category.message().to_string(),
            suggestion: category.suggestion().map(String::from),
            technical_details: None,
            received_type: None,
            status: category.status(),
        }
    }

    /// Report for a category; `details` is kept only for infrastructure
    /// failures.
    pub fn with_details(category: ErrorCategory, details: impl Into<String>) -> Self {
        let mut report = Self::new(category);
        if category.is_infrastructure() {
            report.technical_details = Some(details.into());
        }
        report
    }
}

impl From<&LicitaError> for ErrorReport {
    fn from(err: &LicitaError) -> Self {
        let mut report = Self::with_details(ErrorCategory::from(err), err.to_string());
        if let LicitaError::Rejected(Rejection::NotPdfMimeType { received }) = err {
            let received = if received.is_empty() { "unknown" } else { received.as_str() };
            report.received_type = Some(received.to_string());
        }
        report
    }
}

/// Classify any pipeline error.
pub fn classify(err: &LicitaError) -> ErrorReport {
    ErrorReport::from(err)
}
