//! Documents, media kinds and selection validation.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";

/// Extensions accepted as plain text. Source and config files also guess as
/// `text/plain` but are not documents.
const TEXT_EXTENSIONS: [&str; 2] = ["txt", "text"];

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Pdf,
    Docx,
    PlainText,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Pdf, MediaKind::Docx, MediaKind::PlainText];

    /// Map a media type string to a supported kind. Parameters such as
    /// `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.mime().eq_ignore_ascii_case(essence))
    }

    /// Guess the kind from a file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let kind = mime_guess::from_path(name)
            .first()
            .and_then(|mime| Self::from_mime(mime.essence_str()))?;

        match kind {
            MediaKind::PlainText => {
                let extension = Path::new(name).extension()?.to_str()?;
                TEXT_EXTENSIONS
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(extension))
                    .then_some(kind)
            }
            kind => Some(kind),
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            MediaKind::Pdf => PDF_MIME,
            MediaKind::Docx => DOCX_MIME,
            MediaKind::PlainText => TEXT_MIME,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Pdf => write!(f, "PDF"),
            MediaKind::Docx => write!(f, "DOCX"),
            MediaKind::PlainText => write!(f, "plain text"),
        }
    }
}

/// A file as the user selected it, before validation.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Original file name
    pub name: String,
    /// Declared media type, if the source provided one
    pub mime: Option<String>,
    /// Raw payload
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    /// Read a file from disk. The media type is left to be inferred from the
    /// file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, None, bytes))
    }

    /// Resolve the media kind: a declared media type wins, otherwise the
    /// extension decides.
    pub fn media_kind(&self) -> Option<MediaKind> {
        match &self.mime {
            Some(mime) => MediaKind::from_mime(mime),
            None => MediaKind::from_file_name(&self.name),
        }
    }
}

/// One accepted file of a batch.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub media_kind: MediaKind,
    pub raw_bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, media_kind: MediaKind, raw_bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_kind,
            raw_bytes,
        }
    }
}

/// Extracted text of exactly one document. Case is preserved; matching is
/// case-insensitive at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub source_name: String,
    pub content: String,
}

impl NormalizedText {
    pub fn new(source_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Content digest, used to tell whether two texts are the same.
    pub fn fingerprint(&self) -> blake3::Hash {
        blake3::hash(self.content.as_bytes())
    }
}

/// Validate a whole selection. Either every file is accepted or the
/// selection is refused with one error listing every unsupported file.
pub fn validate_selection(uploads: Vec<Upload>) -> Result<Vec<Document>, SelectionError> {
    if uploads.is_empty() {
        return Err(SelectionError::EmptyBatch);
    }

    let rejected: Vec<String> = uploads
        .iter()
        .filter(|u| u.media_kind().is_none())
        .map(|u| u.name.clone())
        .collect();
    if !rejected.is_empty() {
        return Err(SelectionError::InvalidSelection { files: rejected });
    }

    Ok(uploads
        .into_iter()
        .filter_map(|u| {
            let kind = u.media_kind()?;
            Some(Document::new(u.name, kind, u.bytes))
        })
        .collect())
}
