//! Remote scoring authority abstraction.
//!
//! The authority assigns the authoritative per-dimension scores. It receives
//! the raw document (it does its own extraction) and answers for exactly one
//! document per call.

pub mod remote;

use async_trait::async_trait;

use crate::aggregate::ScoreSet;
use crate::document::Document;
use crate::error::ScoringError;

pub use remote::{parse_score_response, HttpScoringClient, DEFAULT_SCORING_ENDPOINT, DEFAULT_TIMEOUT};

/// Scores a single document.
#[async_trait]
pub trait ScoringAuthority: Send + Sync {
    /// Score one document. Any failure applies to this document only.
    async fn score(&self, document: &Document) -> Result<ScoreSet, ScoringError>;

    /// Short name used in logs (e.g., the endpoint host)
    fn name(&self) -> &str;
}
