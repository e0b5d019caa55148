//! Error types for the scoring pipeline.
//!
//! Per-document errors (`ExtractError`, `ScoringError`) never escape a batch;
//! the orchestrator records them against the file name. Selection-level and
//! submission-level errors are returned to the caller directly.

use thiserror::Error;

use crate::document::MediaKind;

/// A format decoder could not produce text.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to parse PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to open DOCX container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX container has no {0} part")]
    MissingPart(&'static str),

    #[error("malformed DOCX markup: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to read DOCX part: {0}")]
    Io(#[from] std::io::Error),
}

/// Text extraction failed for one document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not extract {kind} text from '{file_name}': {source}")]
    Decode {
        file_name: String,
        kind: MediaKind,
        #[source]
        source: DecodeError,
    },

    #[error("decoder for '{file_name}' stopped unexpectedly: {message}")]
    Aborted { file_name: String, message: String },
}

impl ExtractError {
    pub fn file_name(&self) -> &str {
        match self {
            ExtractError::Decode { file_name, .. } | ExtractError::Aborted { file_name, .. } => {
                file_name
            }
        }
    }
}

/// The scoring authority did not return a usable score set for one document.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("failed to build scoring request: {0}")]
    Request(String),

    #[error("scoring service unreachable: {0}")]
    Unreachable(String),

    #[error("scoring service rate limit reached: {detail}")]
    RateLimited { detail: String },

    #[error("scoring service rejected the document (HTTP {status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("scoring service returned an unreadable response: {0}")]
    MalformedResponse(String),

    #[error("scoring response is missing the '{0}' dimension")]
    MissingDimension(&'static str),

    #[error("scoring response has an invalid score for '{dimension}': {value}")]
    InvalidScore {
        dimension: &'static str,
        value: String,
    },
}

/// The file selection was refused before any processing started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no files selected")]
    EmptyBatch,

    #[error(
        "unsupported file type for {}; only PDF, DOCX and plain text files are accepted",
        .files.join(", ")
    )]
    InvalidSelection { files: Vec<String> },
}

/// A batch submission was refused.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("a batch is already being scored")]
    BatchInProgress,
}

/// The report could not be produced or read.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write report to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed report at line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Invalid or unreadable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "export columns {configured:?} do not match the rubric dimensions {expected:?}"
    )]
    ColumnMismatch {
        configured: Vec<String>,
        expected: Vec<String>,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// `focus` was asked for a result that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no result at position {index}; the batch has {len} result(s)")]
pub struct FocusError {
    pub index: usize,
    pub len: usize,
}
