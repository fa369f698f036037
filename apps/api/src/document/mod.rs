//! Document decoders: uploaded file bytes → plain text for the parser.

pub mod docx;
pub mod pdf;

use std::fmt;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("decoder aborted: {0}")]
    Aborted(String),
}

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Picks the decoder from the file extension, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?;
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

/// Extracts plain text from `bytes`. CPU-bound; call from a blocking context.
pub fn decode(kind: DocumentKind, bytes: &[u8]) -> Result<String, DecodeError> {
    match kind {
        DocumentKind::Pdf => pdf::extract_text(bytes),
        DocumentKind::Docx => docx::extract_text(bytes),
    }
}
