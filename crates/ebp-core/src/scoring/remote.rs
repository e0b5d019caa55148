//! HTTP scoring authority client.
//!
//! Uploads one document per request as multipart form data and reads the
//! score set from the JSON response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;

use super::ScoringAuthority;
use crate::aggregate::{DimensionScore, ScoreSet};
use crate::document::Document;
use crate::error::ScoringError;
use crate::rubric::Dimension;

pub const DEFAULT_SCORING_ENDPOINT: &str =
    "https://steflangehennig-policy-scoring-api.hf.space/score";

/// Default per-request timeout. Scoring runs a language model server-side,
/// so responses are slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Scoring authority reached over HTTP
pub struct HttpScoringClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpScoringClient {
    /// Create a client for the given endpoint
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn form_for(document: &Document) -> Result<Form, ScoringError> {
        let part = Part::bytes(document.raw_bytes.clone())
            .file_name(document.name.clone())
            .mime_str(document.media_kind.mime())
            .map_err(|e| ScoringError::Request(e.to_string()))?;
        Ok(Form::new().part("file", part))
    }
}

#[async_trait]
impl ScoringAuthority for HttpScoringClient {
    async fn score(&self, document: &Document) -> Result<ScoreSet, ScoringError> {
        let form = Self::form_for(document)?;

        tracing::debug!(
            file = %document.name,
            endpoint = %self.endpoint,
            bytes = document.raw_bytes.len(),
            "Uploading document for scoring"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ScoringError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScoringError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            let detail = error_detail(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                ScoringError::RateLimited { detail }
            } else {
                ScoringError::Rejected {
                    status: status.as_u16(),
                    detail,
                }
            });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ScoringError::MalformedResponse(e.to_string()))?;
        parse_score_response(&value)
    }

    fn name(&self) -> &str {
        &self.endpoint
    }
}

/// Pull the `detail` message out of an error body, if there is one.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read a complete score set from a scoring response.
///
/// Expects `{"scores": {<dimension>: {"score": n, "justification": "..."}}}`.
/// Dimensions are looked up by their wire key first, then by display label.
/// A bare number in place of the object is also accepted.
pub fn parse_score_response(value: &Value) -> Result<ScoreSet, ScoringError> {
    let scores = value
        .get("scores")
        .and_then(Value::as_object)
        .ok_or_else(|| ScoringError::MalformedResponse("no 'scores' object".to_string()))?;

    let parsed = Dimension::ALL
        .iter()
        .map(|&dimension| {
            let entry = scores
                .get(dimension.wire_key())
                .or_else(|| scores.get(dimension.label()))
                .ok_or(ScoringError::MissingDimension(dimension.label()))?;
            parse_dimension(dimension, entry)
        })
        .collect::<Result<Vec<_>, _>>()?;

    ScoreSet::from_scores(parsed)
        .ok_or_else(|| ScoringError::MalformedResponse("incomplete score set".to_string()))
}

fn parse_dimension(dimension: Dimension, entry: &Value) -> Result<DimensionScore, ScoringError> {
    let (raw, justification) = match entry {
        Value::Object(fields) => (
            fields
                .get("score")
                .ok_or(ScoringError::MissingDimension(dimension.label()))?,
            fields
                .get("justification")
                .and_then(Value::as_str)
                .map(str::to_string),
        ),
        other => (other, None),
    };

    let invalid = || ScoringError::InvalidScore {
        dimension: dimension.label(),
        value: raw.to_string(),
    };

    let number = raw.as_f64().ok_or_else(invalid)?;
    if number.fract() != 0.0 || !(0.0..=u8::MAX as f64).contains(&number) {
        return Err(invalid());
    }

    DimensionScore::new(dimension, number as u8)
        .map(|s| s.with_justification(justification))
        .ok_or_else(invalid)
}
