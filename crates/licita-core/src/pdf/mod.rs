//! PDF processing module.
//!
//! The parser is reached only through [`PdfBackend`] and [`PdfDocument`],
//! so the extraction pipeline does not depend on a particular library.

mod extractor;
mod lopdf_backend;

pub use extractor::TextExtractor;
pub use lopdf_backend::LopdfBackend;

use std::iter::FusedIterator;

use crate::error::{ExtractionError, PageError};

/// Opens raw PDF bytes into a [`PdfDocument`].
pub trait PdfBackend: Send + Sync {
    /// Parse the document structure.
    ///
    /// Fails with [`ExtractionError::Corrupt`] when the structure cannot be
    /// parsed and [`ExtractionError::PasswordProtected`] when content is
    /// encrypted behind a password.
    fn open(&self, data: &[u8]) -> Result<Box<dyn PdfDocument>, ExtractionError>;
}

/// An opened PDF.
pub trait PdfDocument {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Text fragments of a page (1-indexed), in content-stream order.
    fn page_fragments(&self, page: u32) -> Result<Vec<String>, PageError>;

    /// Text of a page: non-blank fragments joined with single spaces.
    fn page_text(&self, page: u32) -> Result<String, PageError> {
        let fragments = self.page_fragments(page)?;
        Ok(fragments
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// Lazy, in-order sequence of per-page text.
///
/// Yields `(page_number, text)` for pages `1..=last`, reading each page only
/// when it is requested. The sequence is consumed once.
pub struct PageTexts<'a> {
    document: &'a dyn PdfDocument,
    next: u32,
    last: u32,
}

impl<'a> PageTexts<'a> {
    /// Iterate over every page of `document`, or the first `limit` pages
    /// when `limit` is non-zero.
    pub fn new(document: &'a dyn PdfDocument, limit: u32) -> Self {
        let count = document.page_count();
        let last = if limit == 0 { count } else { count.min(limit) };
        Self {
            document,
            next: 1,
            last,
        }
    }
}

impl Iterator for PageTexts<'_> {
    type Item = (u32, Result<String, PageError>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.last {
            return None;
        }
        let page = self.next;
        self.next += 1;
        Some((page, self.document.page_text(page)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.last as usize + 1).saturating_sub(self.next as usize);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PageTexts<'_> {}

impl FusedIterator for PageTexts<'_> {}
