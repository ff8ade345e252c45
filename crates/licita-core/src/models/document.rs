//! Upload and extraction data carried through one request.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::PageCountMode;

/// Lines per page assumed by [`PageCountMode::LineEstimate`].
pub const LINES_PER_ESTIMATED_PAGE: usize = 50;

/// A file received from a client, sitting in the upload directory.
///
/// Lives for one request only; the file at `path` is removed by the
/// [`TempUpload`](crate::reaper::TempUpload) guard issued alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    /// Temporary file holding the content.
    pub path: PathBuf,
    /// MIME type claimed by the client.
    pub mime_type: String,
    /// Bytes written to `path`.
    pub size: u64,
    /// File name supplied by the client, if any.
    pub original_name: Option<String>,
}

/// Counts derived from the cleaned text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMetadata {
    /// Number of characters (Unicode scalar values).
    pub characters: usize,
    /// Whitespace-delimited non-empty tokens.
    pub words: usize,
    /// Newline-delimited segments.
    pub lines: usize,
    /// Byte length of the source file.
    pub size: u64,
    /// Page count, see [`PageCountMode`].
    pub pages: u32,
}

impl TextMetadata {
    /// Compute statistics for `text`.
    ///
    /// `parsed_pages` is the page count reported by the parser; it is used
    /// as-is in [`PageCountMode::Parsed`] and ignored otherwise.
    pub fn from_text(text: &str, size: u64, parsed_pages: u32, mode: PageCountMode) -> Self {
        let lines = if text.is_empty() { 0 } else { text.split('\n').count() };
        let pages = match mode {
            PageCountMode::Parsed => parsed_pages,
            PageCountMode::LineEstimate => lines.div_ceil(LINES_PER_ESTIMATED_PAGE) as u32,
        };

        Self {
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
            lines,
            size,
            pages,
        }
    }
}

/// Text extracted from a PDF, with its statistics. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Cleaned text, one line per page that carried text.
    pub text: String,
    /// Statistics of `text`.
    pub metadata: TextMetadata,
}
