use crate::document::DecodeError;

/// Plain text of every readable page, in page order.
pub fn extract_text(bytes: &[u8]) -> Result<String, DecodeError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| DecodeError::Pdf(e.to_string()))
}
