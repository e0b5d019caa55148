//! Format-aware text extraction.
//!
//! Each supported container has a [`Decoder`]; the [`Normalizer`] picks the
//! decoder for a document's media kind, runs it on the blocking pool and
//! wraps the output as [`NormalizedText`].

mod docx;
mod pdf;
mod text;

pub use docx::DocxDecoder;
pub use pdf::PdfDecoder;
pub use text::PlainTextDecoder;

#[cfg(test)]
pub(crate) use docx::tests::create_docx;
#[cfg(test)]
pub(crate) use pdf::tests::create_pdf;

use std::sync::Arc;

use crate::document::{Document, MediaKind, NormalizedText};
use crate::error::{DecodeError, ExtractError};

/// Converts one container format to text.
///
/// Implementations must be deterministic and must not touch shared state.
pub trait Decoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError>;
}

/// Dispatches documents to their decoder.
#[derive(Clone)]
pub struct Normalizer {
    pdf: Arc<dyn Decoder>,
    docx: Arc<dyn Decoder>,
    text: Arc<dyn Decoder>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            pdf: Arc::new(PdfDecoder),
            docx: Arc::new(DocxDecoder),
            text: Arc::new(PlainTextDecoder),
        }
    }

    /// Replace the decoder used for one media kind.
    pub fn with_decoder(mut self, kind: MediaKind, decoder: Arc<dyn Decoder>) -> Self {
        match kind {
            MediaKind::Pdf => self.pdf = decoder,
            MediaKind::Docx => self.docx = decoder,
            MediaKind::PlainText => self.text = decoder,
        }
        self
    }

    fn decoder_for(&self, kind: MediaKind) -> Arc<dyn Decoder> {
        match kind {
            MediaKind::Pdf => self.pdf.clone(),
            MediaKind::Docx => self.docx.clone(),
            MediaKind::PlainText => self.text.clone(),
        }
    }

    /// Decode a document synchronously.
    pub fn normalize_blocking(&self, document: &Document) -> Result<NormalizedText, ExtractError> {
        let content = self
            .decoder_for(document.media_kind)
            .decode(&document.raw_bytes)
            .map_err(|source| ExtractError::Decode {
                file_name: document.name.clone(),
                kind: document.media_kind,
                source,
            })?;

        tracing::debug!(
            file = %document.name,
            kind = %document.media_kind,
            chars = content.len(),
            "Extracted text"
        );

        Ok(NormalizedText::new(document.name.clone(), content))
    }

    /// Decode a document on the blocking thread pool.
    ///
    /// The payload is copied into the blocking task so the caller keeps
    /// ownership of the document for the remote scoring call.
    pub async fn normalize(&self, document: &Document) -> Result<NormalizedText, ExtractError> {
        let normalizer = self.clone();
        let owned = document.clone();

        tokio::task::spawn_blocking(move || normalizer.normalize_blocking(&owned))
            .await
            .map_err(|e| ExtractError::Aborted {
                file_name: document.name.clone(),
                message: e.to_string(),
            })?
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PanickingDecoder;

    impl Decoder for PanickingDecoder {
        fn decode(&self, _bytes: &[u8]) -> Result<String, DecodeError> {
            panic!("decoder bug");
        }
    }

    #[tokio::test]
    async fn test_dispatches_by_media_kind() {
        let normalizer = Normalizer::new();

        let text = Document::new("a.txt", MediaKind::PlainText, b"Plain words".to_vec());
        let pdf = Document::new("b.pdf", MediaKind::Pdf, create_pdf(&["Pdf words"]));
        let docx = Document::new("c.docx", MediaKind::Docx, create_docx(&["Docx words"]));

        let t = normalizer.normalize(&text).await.unwrap();
        assert_eq!(t.content, "Plain words");
        assert_eq!(t.source_name, "a.txt");

        let p = normalizer.normalize(&pdf).await.unwrap();
        assert!(p.content.contains("Pdf"), "got: {}", p.content);

        let d = normalizer.normalize(&docx).await.unwrap();
        assert_eq!(d.content, "Docx words\n");
    }

    #[tokio::test]
    async fn test_failure_is_tagged_with_file_name() {
        let normalizer = Normalizer::new();
        let doc = Document::new("broken.pdf", MediaKind::Pdf, b"garbage".to_vec());

        let err = normalizer.normalize(&doc).await.unwrap_err();
        assert_eq!(err.file_name(), "broken.pdf");
        assert!(err.to_string().contains("broken.pdf"));
        assert!(err.to_string().contains("PDF"));
    }

    #[tokio::test]
    async fn test_empty_text_is_not_an_error() {
        let normalizer = Normalizer::new();
        let doc = Document::new("empty.txt", MediaKind::PlainText, Vec::new());

        let text = normalizer.normalize(&doc).await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_decoder_is_contained() {
        let normalizer =
            Normalizer::new().with_decoder(MediaKind::PlainText, Arc::new(PanickingDecoder));
        let doc = Document::new("boom.txt", MediaKind::PlainText, b"x".to_vec());

        let err = normalizer.normalize(&doc).await.unwrap_err();
        assert!(matches!(err, ExtractError::Aborted { .. }));
        assert_eq!(err.file_name(), "boom.txt");
    }
}
