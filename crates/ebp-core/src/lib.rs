//! EBP Core - Scoring pipeline for evidence-based policy documents
//!
//! This crate contains the whole pipeline, independent of any front end:
//! - Format-aware text extraction (lopdf, zip + quick-xml)
//! - Advisory keyword hints per rubric dimension
//! - Remote scoring authority client (reqwest multipart)
//! - Score aggregation and classification
//! - Batch orchestration with per-document failure isolation
//! - CSV report export

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod extract;
pub mod hints;
pub mod rubric;
pub mod scoring;

pub use aggregate::{Classification, DimensionScore, ScoreSet, ScoringResult};
pub use batch::{BatchEvent, BatchOrchestrator, BatchState, DocumentError, Phase};
pub use config::{Config, Settings};
pub use document::{validate_selection, Document, MediaKind, NormalizedText, Upload};
pub use error::{
    ConfigError, ExportError, ExtractError, FocusError, ScoringError, SelectionError, SubmitError,
};
pub use export::{parse_report, to_csv, write_report, ReportLayout, ReportRow, REPORT_FILE_NAME};
pub use extract::Normalizer;
pub use hints::{compute_hints, HintEngine, KeywordHints};
pub use rubric::Dimension;
pub use scoring::{HttpScoringClient, ScoringAuthority};
