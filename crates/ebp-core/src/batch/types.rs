//! Batch state, per-document outcomes and progress events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::aggregate::{Classification, ScoringResult};
use crate::error::{ExtractError, ScoringError};

/// Processing stage of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Extract,
    Score,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Extract => write!(f, "extract"),
            Stage::Score => write!(f, "score"),
        }
    }
}

/// Whether the orchestrator is currently running a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Submitting,
}

/// Why one document produced no result.
#[derive(Debug, Error)]
pub enum DocumentFailure {
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("could not score '{file_name}': {source}")]
    Scoring {
        file_name: String,
        #[source]
        source: ScoringError,
    },
}

impl DocumentFailure {
    pub fn file_name(&self) -> &str {
        match self {
            DocumentFailure::Extraction(e) => e.file_name(),
            DocumentFailure::Scoring { file_name, .. } => file_name,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            DocumentFailure::Extraction(_) => Stage::Extract,
            DocumentFailure::Scoring { .. } => Stage::Score,
        }
    }

    /// Human-readable reason, without the file name.
    pub fn reason(&self) -> String {
        match self {
            DocumentFailure::Extraction(ExtractError::Decode { kind, source, .. }) => {
                format!("could not extract {} text: {}", kind, source)
            }
            DocumentFailure::Extraction(ExtractError::Aborted { message, .. }) => {
                format!("text extraction stopped unexpectedly: {}", message)
            }
            DocumentFailure::Scoring { source, .. } => source.to_string(),
        }
    }
}

/// A recorded per-document failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentError {
    pub file_name: String,
    pub reason: String,
}

impl From<&DocumentFailure> for DocumentError {
    fn from(failure: &DocumentFailure) -> Self {
        Self {
            file_name: failure.file_name().to_string(),
            reason: failure.reason(),
        }
    }
}

/// Outcome of the most recent batch.
///
/// `focused`, when set, always indexes an entry of `results`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchState {
    pub batch_id: Option<Uuid>,
    /// Successful results in submission order
    pub results: Vec<ScoringResult>,
    pub focused: Option<usize>,
    pub errors: Vec<DocumentError>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BatchState {
    /// Empty state for a batch that has just started.
    pub(crate) fn started(batch_id: Uuid) -> Self {
        Self {
            batch_id: Some(batch_id),
            ..Default::default()
        }
    }

    /// Final state of a finished batch. Focus goes to the first result.
    pub(crate) fn finished(
        batch_id: Uuid,
        results: Vec<ScoringResult>,
        errors: Vec<DocumentError>,
    ) -> Self {
        let focused = (!results.is_empty()).then_some(0);
        Self {
            batch_id: Some(batch_id),
            results,
            focused,
            errors,
            completed_at: Some(Utc::now()),
        }
    }

    pub fn focused_result(&self) -> Option<&ScoringResult> {
        self.focused.and_then(|i| self.results.get(i))
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Progress notification emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
    Started {
        batch_id: Uuid,
        documents: usize,
    },
    DocumentStarted {
        index: usize,
        file_name: String,
        stage: Stage,
    },
    DocumentScored {
        index: usize,
        file_name: String,
        total: u8,
        classification: Classification,
    },
    DocumentFailed {
        index: usize,
        file_name: String,
        stage: Stage,
        reason: String,
    },
    Finished {
        batch_id: Uuid,
        scored: usize,
        failed: usize,
    },
}
