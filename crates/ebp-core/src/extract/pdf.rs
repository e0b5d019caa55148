use crate::error::DecodeError;

use super::Decoder;

/// Extract text from PDF bytes, pages in order
fn extract_text_from_bytes(pdf_bytes: &[u8]) -> Result<String, DecodeError> {
    let doc = lopdf::Document::load_mem(pdf_bytes)?;

    let mut pages: Vec<u32> = doc.get_pages().keys().cloned().collect();
    pages.sort(); // Ensure pages are in order

    let mut full_text = String::new();
    for page_num in &pages {
        let page_text = doc.extract_text(&[*page_num]).unwrap_or_default();
        full_text.push_str(&page_text);
        // Add a newline between pages if the page doesn't end with one
        if !page_text.ends_with('\n') && !page_text.is_empty() {
            full_text.push('\n');
        }
    }

    tracing::trace!(chars = full_text.len(), pages = pages.len(), "Parsed PDF");

    Ok(full_text)
}

pub struct PdfDecoder;

impl Decoder for PdfDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        extract_text_from_bytes(bytes)
    }
}
