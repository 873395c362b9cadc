//! Text Extractor: turns an uploaded résumé (PDF or DOCX) into flat text.
//!
//! `extract` never guesses: an unknown extension is `UnsupportedFormat`, and a
//! file that claims a supported format but cannot be parsed is
//! `CorruptDocument`. A document that parses but holds no text yields an
//! empty `ExtractedText`; callers decide whether that is acceptable.

use std::fmt;

use bytes::Bytes;
use thiserror::Error;

mod docx;
mod pdf;

/// Supported résumé formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Resolves a declared extension. Case-insensitive; a leading dot is ignored.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.trim().trim_start_matches('.');
        if ext.eq_ignore_ascii_case("pdf") {
            Some(DocumentKind::Pdf)
        } else if ext.eq_ignore_ascii_case("docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => f.write_str("pdf"),
            DocumentKind::Docx => f.write_str("docx"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported document format '{0}' (expected pdf or docx)")]
    UnsupportedFormat(String),

    #[error("Corrupt {kind} document: {reason}")]
    CorruptDocument { kind: DocumentKind, reason: String },
}

/// An uploaded document: raw bytes plus the extension it was declared with.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Bytes,
    pub extension: String,
}

impl Document {
    pub fn new(bytes: impl Into<Bytes>, extension: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            extension: extension.into(),
        }
    }

    /// Builds a document from an upload, taking the extension from the file name.
    /// A name without a dot gets an empty extension (and is therefore unsupported).
    pub fn from_upload(file_name: &str, bytes: impl Into<Bytes>) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();
        Self::new(bytes, extension)
    }
}

/// Flat résumé text in source order. Downstream code treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Extracts the text of `document` according to its declared extension.
pub fn extract(document: &Document) -> Result<ExtractedText, ExtractError> {
    let kind = DocumentKind::from_extension(&document.extension)
        .ok_or_else(|| ExtractError::UnsupportedFormat(document.extension.clone()))?;

    let text = match kind {
        DocumentKind::Pdf => pdf::extract_pdf_text(&document.bytes),
        DocumentKind::Docx => docx::extract_docx_text(&document.bytes),
    }
    .map_err(|reason| ExtractError::CorruptDocument { kind, reason })?;

    tracing::debug!("Extracted {} chars from {kind} document", text.len());
    Ok(ExtractedText(text))
}


#[cfg(test)]
mod tests {
    use super::fixtures::{docx_bytes, pdf_bytes};
    use super::*;

    #[test]
    fn test_kind_from_extension_is_case_insensitive() {
        assert_eq!(DocumentKind::from_extension("pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension(".docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_extension("doc"), None);
        assert_eq!(DocumentKind::from_extension(""), None);
    }

    #[test]
    fn test_from_upload_takes_last_extension() {
        let doc = Document::from_upload("jane.doe.resume.docx", Vec::new());
        assert_eq!(doc.extension, "docx");

        let doc = Document::from_upload("README", Vec::new());
        assert_eq!(doc.extension, "");
    }

    #[test]
    fn test_unsupported_extensions_never_attempt_parsing() {
        for ext in ["txt", "doc", "rtf", "", "pdf.exe", "odt"] {
            let doc = Document::new(b"%PDF-1.5 looks like a pdf".to_vec(), ext);
            match extract(&doc) {
                Err(ExtractError::UnsupportedFormat(got)) => assert_eq!(got, ext),
                other => panic!("expected UnsupportedFormat for '{ext}', got {other:?}"),
            }
        }
    }

    #[test]
    fn test_docx_paragraphs_each_end_with_newline() {
        let bytes = docx_bytes(&["Jane Doe", "", "Rust, Kubernetes, Postgres"]);
        let text = extract(&Document::new(bytes, "docx")).unwrap();
        assert_eq!(text.as_str(), "Jane Doe\n\nRust, Kubernetes, Postgres\n");
        assert!(!text.is_blank());
    }

    #[test]
    fn test_pdf_pages_concatenate_in_order() {
        let bytes = pdf_bytes(&["Experience", "", "Education"]);
        let text = extract(&Document::new(bytes, "pdf")).unwrap();
        let text = text.as_str();

        let experience = text.find("Experience").expect("first page text missing");
        let education = text.find("Education").expect("third page text missing");
        assert!(experience < education);
    }

    #[test]
    fn test_garbage_pdf_is_corrupt_not_empty() {
        let doc = Document::new(b"this is not a pdf".to_vec(), "pdf");
        match extract(&doc) {
            Err(ExtractError::CorruptDocument { kind, .. }) => assert_eq!(kind, DocumentKind::Pdf),
            other => panic!("expected CorruptDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_docx_is_corrupt_not_empty() {
        let doc = Document::new(b"PK\x03\x04 truncated".to_vec(), "DOCX");
        match extract(&doc) {
            Err(ExtractError::CorruptDocument { kind, .. }) => {
                assert_eq!(kind, DocumentKind::Docx)
            }
            other => panic!("expected CorruptDocument, got {other:?}"),
        }
    }
}
