// src/utils/pdf.rs

use crate::extract::MIN_TEXT_LEN;

/// Pulls the text layer out of an uploaded PDF.
///
/// Encrypted, scanned or otherwise unreadable files yield `None`, as does a
/// text layer too short to contain a question. Extraction problems are never
/// an error: the caller reports "no questions found" and stops.
pub fn extract_text(bytes: &[u8]) -> Option<String> {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) if text.trim().len() >= MIN_TEXT_LEN => Some(text),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("PDF text extraction failed: {}", e);
            None
        }
    }
}
