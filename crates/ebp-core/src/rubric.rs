//! The fixed evidence-based-policy rubric.
//!
//! Five dimensions, always in this order. The order drives display, CSV
//! column order and the iteration order of every per-dimension map in the
//! crate (`Dimension` derives `Ord` by declaration order).

use serde::{Deserialize, Serialize};

/// Lowest score a dimension can receive.
pub const MIN_SCORE: u8 = 0;
/// Highest score a dimension can receive.
pub const MAX_SCORE: u8 = 3;

/// One axis of the rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    EmpiricalResearch,
    FormalEvidenceGathering,
    TransparencyAccessibility,
    ExpertStakeholderInput,
    EvaluationIteration,
}

impl Dimension {
    /// All dimensions in rubric order.
    pub const ALL: [Dimension; 5] = [
        Dimension::EmpiricalResearch,
        Dimension::FormalEvidenceGathering,
        Dimension::TransparencyAccessibility,
        Dimension::ExpertStakeholderInput,
        Dimension::EvaluationIteration,
    ];

    /// Human-readable label used for display and CSV headers.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::EmpiricalResearch => "Empirical Research",
            Dimension::FormalEvidenceGathering => "Formal Evidence-Gathering",
            Dimension::TransparencyAccessibility => "Transparency & Accessibility",
            Dimension::ExpertStakeholderInput => "Expert & Stakeholder Input",
            Dimension::EvaluationIteration => "Evaluation & Iteration",
        }
    }

    /// Key the scoring authority uses for this dimension in its response.
    pub fn wire_key(self) -> &'static str {
        match self {
            Dimension::EmpiricalResearch => "Use of Empirical Research",
            Dimension::FormalEvidenceGathering => "Formal Evidence-Gathering Process",
            Dimension::TransparencyAccessibility => "Transparency and Accessibility",
            Dimension::ExpertStakeholderInput => "Expert and Stakeholder Input",
            Dimension::EvaluationIteration => "Evaluation and Iteration",
        }
    }

    /// Position of this dimension in rubric order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Keyword phrases associated with this dimension.
    pub fn keywords(self) -> &'static [&'static str] {
        KEYWORD_TABLE[self.index()].1
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Dimension → ordered keyword phrases. Matched case-insensitively as
/// substrings, so phrases are stored lowercase.
pub const KEYWORD_TABLE: [(Dimension, &[&str]); 5] = [
    (
        Dimension::EmpiricalResearch,
        &[
            "empirical",
            "research",
            "study",
            "studies",
            "data",
            "statistic",
            "randomized",
            "peer-reviewed",
        ],
    ),
    (
        Dimension::FormalEvidenceGathering,
        &[
            "hearing",
            "testimony",
            "commission",
            "request for information",
            "public comment",
            "inquiry",
            "audit",
            "systematic review",
        ],
    ),
    (
        Dimension::TransparencyAccessibility,
        &[
            "transparency",
            "publicly available",
            "disclose",
            "disclosure",
            "open data",
            "accessible",
            "published",
        ],
    ),
    (
        Dimension::ExpertStakeholderInput,
        &[
            "expert",
            "stakeholder",
            "consultation",
            "advisory committee",
            "working group",
            "practitioner",
            "public input",
        ],
    ),
    (
        Dimension::EvaluationIteration,
        &[
            "evaluation",
            "evaluate",
            "metric",
            "performance measure",
            "pilot",
            "monitoring",
            "reauthoriz",
            "sunset",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rubric_order_is_stable() {
        let labels: Vec<&str> = Dimension::ALL.iter().map(|d| d.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Empirical Research",
                "Formal Evidence-Gathering",
                "Transparency & Accessibility",
                "Expert & Stakeholder Input",
                "Evaluation & Iteration",
            ]
        );
        for (i, d) in Dimension::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
    }

    #[test]
    fn test_keyword_table_matches_rubric_order() {
        for (i, (dimension, keywords)) in KEYWORD_TABLE.iter().enumerate() {
            assert_eq!(dimension.index(), i);
            assert!(!keywords.is_empty());
            assert!(keywords.iter().all(|k| *k == k.to_lowercase()));
        }
    }
}
