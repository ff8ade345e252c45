//! PDF backend using lopdf.

use std::collections::BTreeMap;

use lopdf::{dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use super::{PdfBackend, PdfDocument};
use crate::error::{ExtractionError, PageError};

/// Trailer key present in every encrypted PDF.
const ENCRYPT_KEY: &[u8] = b"/Encrypt";

const TRAILER_KEYWORD: &[u8] = b"trailer";

/// Bytes searched for `/Encrypt` in files whose trailer lives in a
/// cross-reference stream at the end of the file.
const XREF_STREAM_TAIL: usize = 1024;

/// Backend parsing PDFs with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl LopdfBackend {
    /// Create a new lopdf backend.
    pub fn new() -> Self {
        Self
    }
}

/// A document opened by [`LopdfBackend`].
struct LopdfDocument {
    document: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfBackend for LopdfBackend {
    fn open(&self, data: &[u8]) -> Result<Box<dyn PdfDocument>, ExtractionError> {
        let mut document = match Document::load_mem(data) {
            Ok(doc) => doc,
            Err(e) => {
                // lopdf refuses some encrypted files outright; the trailer
                // still tells them apart from broken ones.
                if declares_encryption(data) {
                    debug!("PDF failed to load and declares encryption: {}", e);
                    return Err(ExtractionError::PasswordProtected);
                }
                return Err(ExtractionError::Corrupt(e.to_string()));
            }
        };

        if document.is_encrypted() {
            add_default_crypt_filter(&mut document);
            // Owner-password-only files open with an empty user password
            if let Err(e) = document.decrypt("") {
                debug!("Empty-password decryption failed: {}", e);
                return Err(ExtractionError::PasswordProtected);
            }
            debug!("Decrypted PDF with empty password");
        }

        let pages = document.get_pages();
        if pages.is_empty() {
            return Err(ExtractionError::Corrupt("document has no pages".to_string()));
        }

        debug!("Loaded PDF with {} pages", pages.len());
        Ok(Box::new(LopdfDocument { document, pages }))
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<String>, PageError> {
        if !self.pages.contains_key(&page) {
            return Err(PageError {
                page,
                reason: "no such page".to_string(),
            });
        }

        // lopdf ends every text object with a newline, so lines are the
        // positioned fragments of the content stream.
        let text = self.document.extract_text(&[page]).map_err(|e| PageError {
            page,
            reason: e.to_string(),
        })?;

        let fragments: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        trace!("Page {}: {} text fragments", page, fragments.len());
        Ok(fragments)
    }
}

/// RC4 handlers (`/V` 1 and 2) carry no crypt filter dictionary, while
/// lopdf reads the cipher from `/CF/StdCF/CFM`. Give them the equivalent
/// RC4 filter so the empty user password can be tried.
fn add_default_crypt_filter(document: &mut Document) {
    let Ok(id) = document.trailer.get(b"Encrypt").and_then(Object::as_reference) else {
        return;
    };
    let Ok(encrypt) = document.get_object_mut(id).and_then(Object::as_dict_mut) else {
        return;
    };

    let version = encrypt.get(b"V").and_then(Object::as_i64).unwrap_or(0);
    if version < 4 && !encrypt.has(b"CF") {
        trace!("Adding RC4 crypt filter to /V {} encryption dictionary", version);
        encrypt.set(
            "CF",
            dictionary! { "StdCF" => dictionary! { "CFM" => "V2" } },
        );
    }
}

/// Whether the trailer names an `/Encrypt` dictionary. Only the bytes after
/// the last `trailer` keyword are searched, or the tail of the file when
/// there is no classic trailer.
fn declares_encryption(data: &[u8]) -> bool {
    let start = rfind(data, TRAILER_KEYWORD)
        .unwrap_or_else(|| data.len().saturating_sub(XREF_STREAM_TAIL));
    rfind(&data[start..], ENCRYPT_KEY).is_some()
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_text_pdf() {
        let data = fixtures::text_pdf(&[&["Hola PDF"], &["Segunda", "pagina"]]);
        let doc = LopdfBackend::new().open(&data).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page_text(1).unwrap(), "Hola PDF");
        assert_eq!(doc.page_fragments(2).unwrap(), vec!["Segunda", "pagina"]);
        assert_eq!(doc.page_text(2).unwrap(), "Segunda pagina");
    }

    #[test]
    fn test_image_only_page_has_no_fragments() {
        let data = fixtures::image_only_pdf(1);
        let doc = LopdfBackend::new().open(&data).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.page_text(1).unwrap(), "");
    }

    #[test]
    fn test_unknown_page() {
        let data = fixtures::text_pdf(&[&["uno"]]);
        let doc = LopdfBackend::new().open(&data).unwrap();
        assert_eq!(doc.page_fragments(5).unwrap_err().page, 5);
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let result = LopdfBackend::new().open(&fixtures::corrupt_pdf());
        assert!(matches!(result, Err(ExtractionError::Corrupt(_))));
    }

    #[test]
    fn test_garbage_with_encrypt_key_is_protected() {
        let mut data = fixtures::corrupt_pdf();
        data.extend_from_slice(b"\ntrailer\n<< /Encrypt 9 0 R >>\n");
        let result = LopdfBackend::new().open(&data);
        assert!(matches!(result, Err(ExtractionError::PasswordProtected)));
    }

    #[test]
    fn test_encrypt_key_outside_trailer_is_corrupt() {
        let mut data = fixtures::corrupt_pdf();
        data.extend_from_slice(b"\n4 0 obj\n(/Encrypt appears in body text)\nendobj\n");
        data.extend_from_slice(b"trailer\n<< /Root 1 0 R >>\nstartxref\n99999\n%%EOF\n");

        let result = LopdfBackend::new().open(&data);
        assert!(matches!(result, Err(ExtractionError::Corrupt(_))));
    }

    #[test]
    fn test_trailer_scan() {
        assert!(declares_encryption(b"1 0 obj /Encrypt endobj trailer << /Encrypt 5 0 R >>"));
        assert!(!declares_encryption(b"1 0 obj /Encrypt endobj trailer << /Root 1 0 R >>"));
        assert!(declares_encryption(b"xref stream << /Type /XRef /Encrypt 5 0 R >>"));
    }

    #[test]
    fn test_owner_only_rc4_pdf_opens() {
        let data = fixtures::owner_protected_pdf(&[&["Hola PDF"]]);
        let doc = LopdfBackend::new().open(&data).unwrap();

        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.page_text(1).unwrap(), "Hola PDF");
    }

    #[test]
    fn test_user_password_pdf_is_protected() {
        let data = fixtures::user_protected_pdf(&[&["Hola PDF"]], "secret");
        let result = LopdfBackend::new().open(&data);
        assert!(matches!(result, Err(ExtractionError::PasswordProtected)));
    }

    #[test]
    fn test_rc4_gets_default_crypt_filter() {
        let mut doc = Document::load_mem(&fixtures::owner_protected_pdf(&[&["uno"]])).unwrap();
        add_default_crypt_filter(&mut doc);

        let cfm = doc
            .get_encrypted()
            .and_then(|e| e.get(b"CF"))
            .and_then(Object::as_dict)
            .and_then(|cf| cf.get(b"StdCF"))
            .and_then(Object::as_dict)
            .and_then(|std| std.get(b"CFM"))
            .and_then(Object::as_name)
            .unwrap();
        assert_eq!(cfm, b"V2");
    }
}
