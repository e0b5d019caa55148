//! Batch orchestration.
//!
//! A batch runs every selected document through extraction, keyword hints
//! and remote scoring, one document at a time. A failing document is
//! recorded and the batch moves on; the finished state is published in one
//! step.

mod types;

pub use types::{BatchEvent, BatchState, DocumentError, DocumentFailure, Phase, Stage};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::aggregate::ScoringResult;
use crate::document::{validate_selection, Document, Upload};
use crate::error::{FocusError, SubmitError};
use crate::extract::Normalizer;
use crate::hints::HintEngine;
use crate::scoring::ScoringAuthority;

/// Clears the submitting flag when dropped.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs batches and owns the most recent [`BatchState`].
pub struct BatchOrchestrator {
    normalizer: Normalizer,
    hints: HintEngine,
    authority: Arc<dyn ScoringAuthority>,
    state: RwLock<BatchState>,
    submitting: AtomicBool,
    events: Option<mpsc::Sender<BatchEvent>>,
}

impl BatchOrchestrator {
    pub fn new(authority: Arc<dyn ScoringAuthority>) -> Self {
        Self {
            normalizer: Normalizer::new(),
            hints: HintEngine::new(),
            authority,
            state: RwLock::new(BatchState::default()),
            submitting: AtomicBool::new(false),
            events: None,
        }
    }

    /// Send progress events to `sender`. Events are dropped when the
    /// channel is full.
    pub fn with_events(mut self, sender: mpsc::Sender<BatchEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn phase(&self) -> Phase {
        if self.submitting.load(Ordering::Acquire) {
            Phase::Submitting
        } else {
            Phase::Idle
        }
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> BatchState {
        self.state.read().await.clone()
    }

    pub async fn results(&self) -> Vec<ScoringResult> {
        self.state.read().await.results.clone()
    }

    pub async fn focused(&self) -> Option<ScoringResult> {
        self.state.read().await.focused_result().cloned()
    }

    /// Point the focus at another result of the current batch.
    pub async fn focus(&self, index: usize) -> Result<(), FocusError> {
        let mut state = self.state.write().await;
        let len = state.results.len();
        if index >= len {
            return Err(FocusError { index, len });
        }
        state.focused = Some(index);
        Ok(())
    }

    /// Run one batch over `uploads` and return its final state.
    ///
    /// A refused selection or a submission while another batch runs leaves
    /// the current state untouched.
    pub async fn submit(&self, uploads: Vec<Upload>) -> Result<BatchState, SubmitError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::BatchInProgress);
        }
        let _guard = SubmittingGuard(&self.submitting);

        let documents = validate_selection(uploads)?;
        let batch_id = Uuid::new_v4();

        *self.state.write().await = BatchState::started(batch_id);

        tracing::info!(
            batch_id = %batch_id,
            documents = documents.len(),
            authority = self.authority.name(),
            "Batch started"
        );
        self.emit(BatchEvent::Started {
            batch_id,
            documents: documents.len(),
        });

        let mut results = Vec::new();
        let mut errors = Vec::new();

        for (index, document) in documents.into_iter().enumerate() {
            match self.process(index, document).await {
                Ok(result) => {
                    tracing::debug!(
                        batch_id = %batch_id,
                        file = %result.file_name,
                        total = result.total(),
                        "Document scored"
                    );
                    self.emit(BatchEvent::DocumentScored {
                        index,
                        file_name: result.file_name.clone(),
                        total: result.total(),
                        classification: result.classification(),
                    });
                    results.push(result);
                }
                Err(failure) => {
                    tracing::warn!(
                        batch_id = %batch_id,
                        file = %failure.file_name(),
                        stage = %failure.stage(),
                        error = %failure,
                        "Document failed"
                    );
                    self.emit(BatchEvent::DocumentFailed {
                        index,
                        file_name: failure.file_name().to_string(),
                        stage: failure.stage(),
                        reason: failure.reason(),
                    });
                    errors.push(DocumentError::from(&failure));
                }
            }
        }

        let finished = BatchState::finished(batch_id, results, errors);
        *self.state.write().await = finished.clone();

        tracing::info!(
            batch_id = %batch_id,
            scored = finished.results.len(),
            failed = finished.errors.len(),
            "Batch finished"
        );
        self.emit(BatchEvent::Finished {
            batch_id,
            scored: finished.results.len(),
            failed: finished.errors.len(),
        });

        Ok(finished)
    }

    /// Extract, hint and score one document. The document is dropped on
    /// return.
    async fn process(
        &self,
        index: usize,
        document: Document,
    ) -> Result<ScoringResult, DocumentFailure> {
        self.emit(BatchEvent::DocumentStarted {
            index,
            file_name: document.name.clone(),
            stage: Stage::Extract,
        });
        let text = self.normalizer.normalize(&document).await?;
        let hints = self.hints.hints_for(&text);

        self.emit(BatchEvent::DocumentStarted {
            index,
            file_name: document.name.clone(),
            stage: Stage::Score,
        });
        let scores = self
            .authority
            .score(&document)
            .await
            .map_err(|source| DocumentFailure::Scoring {
                file_name: document.name.clone(),
                source,
            })?;

        Ok(ScoringResult::new(document.name, scores, hints))
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(tx) = &self.events {
            if let Err(e) = tx.try_send(event) {
                tracing::trace!(error = %e, "Dropped batch event");
            }
        }
    }
}
