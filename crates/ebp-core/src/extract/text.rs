use crate::error::DecodeError;

use super::Decoder;

const UTF8_BOM: &str = "\u{feff}";

/// Plain text passthrough. Invalid UTF-8 sequences are replaced rather than
/// rejected.
pub struct PlainTextDecoder;

impl Decoder for PlainTextDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        let text = String::from_utf8_lossy(bytes);
        Ok(text.strip_prefix(UTF8_BOM).unwrap_or(&text).to_string())
    }
}
