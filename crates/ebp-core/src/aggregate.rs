//! Score aggregation and classification.

use serde::Serialize;

use crate::hints::KeywordHints;
use crate::rubric::{Dimension, MAX_SCORE, MIN_SCORE};

/// An authoritative score for one dimension, always within
/// [`MIN_SCORE`]..=[`MAX_SCORE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

impl DimensionScore {
    /// Returns `None` when `score` is outside the rubric range.
    pub fn new(dimension: Dimension, score: u8) -> Option<Self> {
        (MIN_SCORE..=MAX_SCORE).contains(&score).then_some(Self {
            dimension,
            score,
            justification: None,
        })
    }

    pub fn with_justification(mut self, justification: Option<String>) -> Self {
        self.justification = justification.filter(|j| !j.trim().is_empty());
        self
    }

    pub fn score(&self) -> u8 {
        self.score
    }
}

/// All five dimension scores of one document, in rubric order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSet([DimensionScore; 5]);

impl ScoreSet {
    /// Build a set from scores supplied in any order. Every dimension must
    /// appear exactly once.
    pub fn from_scores(scores: Vec<DimensionScore>) -> Option<Self> {
        let mut slots: [Option<DimensionScore>; 5] = Default::default();
        for score in scores {
            let slot = &mut slots[score.dimension.index()];
            if slot.is_some() {
                return None;
            }
            *slot = Some(score);
        }
        let [a, b, c, d, e] = slots;
        Some(Self([a?, b?, c?, d?, e?]))
    }

    /// Convenience constructor from raw values in rubric order.
    pub fn from_values(values: [u8; 5]) -> Option<Self> {
        let scores = Dimension::ALL
            .iter()
            .zip(values)
            .map(|(d, v)| DimensionScore::new(*d, v))
            .collect::<Option<Vec<_>>>()?;
        Self::from_scores(scores)
    }

    pub fn get(&self, dimension: Dimension) -> &DimensionScore {
        &self.0[dimension.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DimensionScore> {
        self.0.iter()
    }

    pub fn values(&self) -> [u8; 5] {
        std::array::from_fn(|i| self.0[i].score)
    }

    pub fn total(&self) -> u8 {
        self.0.iter().map(|s| s.score).sum()
    }

    pub fn classification(&self) -> Classification {
        Classification::from_total(self.total())
    }
}

/// Qualitative tier of a total score. Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Classification {
    Weak,
    Moderate,
    Strong,
    Robust,
}

impl Classification {
    pub fn from_total(total: u8) -> Self {
        match total {
            0..=4 => Classification::Weak,
            5..=9 => Classification::Moderate,
            10..=12 => Classification::Strong,
            _ => Classification::Robust,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Weak => "Weak",
            Classification::Moderate => "Moderate",
            Classification::Strong => "Strong",
            Classification::Robust => "Robust",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one successfully scored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringResult {
    pub file_name: String,
    pub scores: ScoreSet,
    /// Advisory keyword hints from the same document's text
    pub hints: KeywordHints,
}

impl ScoringResult {
    pub fn new(file_name: impl Into<String>, scores: ScoreSet, hints: KeywordHints) -> Self {
        Self {
            file_name: file_name.into(),
            scores,
            hints,
        }
    }

    pub fn total(&self) -> u8 {
        self.scores.total()
    }

    pub fn classification(&self) -> Classification {
        self.scores.classification()
    }
}
