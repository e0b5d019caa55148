//! Keyword hints.
//!
//! Advisory only: hints surface which rubric keywords occur in a document's
//! text. They never feed into the authoritative score.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Serialize;

use crate::document::NormalizedText;
use crate::rubric::{Dimension, KEYWORD_TABLE};

/// Matched keywords per dimension. Dimensions without matches are absent;
/// iteration follows rubric order and keywords keep table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordHints(BTreeMap<Dimension, Vec<&'static str>>);

impl KeywordHints {
    pub fn get(&self, dimension: Dimension) -> Option<&[&'static str]> {
        self.0.get(&dimension).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &[&'static str])> {
        self.0.iter().map(|(d, k)| (*d, k.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Scan `text` against the keyword table.
pub fn compute_hints(text: &NormalizedText) -> KeywordHints {
    let haystack = text.content.to_lowercase();

    let matches = KEYWORD_TABLE
        .iter()
        .filter_map(|(dimension, keywords)| {
            let found: Vec<&'static str> = keywords
                .iter()
                .copied()
                .filter(|keyword| haystack.contains(keyword))
                .collect();
            (!found.is_empty()).then_some((*dimension, found))
        })
        .collect();

    KeywordHints(matches)
}

/// Computes hints, remembering the last text it saw.
///
/// The cache is keyed by the text fingerprint, so hints for one text are
/// never returned for another.
#[derive(Default)]
pub struct HintEngine {
    last: Mutex<Option<(blake3::Hash, KeywordHints)>>,
}

impl HintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hints_for(&self, text: &NormalizedText) -> KeywordHints {
        let fingerprint = text.fingerprint();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((cached, hints)) = last.as_ref() {
            if *cached == fingerprint {
                return hints.clone();
            }
        }

        let hints = compute_hints(text);
        *last = Some((fingerprint, hints.clone()));
        hints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(content: &str) -> NormalizedText {
        NormalizedText::new("doc.txt", content)
    }

    #[test]
    fn test_matches_case_insensitively() {
        let hints = compute_hints(&text(
            "The Committee held a HEARING and relied on Peer-Reviewed research.",
        ));

        assert_eq!(
            hints.get(Dimension::EmpiricalResearch),
            Some(&["research", "peer-reviewed"][..])
        );
        assert_eq!(
            hints.get(Dimension::FormalEvidenceGathering),
            Some(&["hearing"][..])
        );
    }

    #[test]
    fn test_dimensions_without_matches_are_omitted() {
        let hints = compute_hints(&text("An expert panel met."));

        assert_eq!(hints.len(), 1);
        assert_eq!(
            hints.get(Dimension::ExpertStakeholderInput),
            Some(&["expert"][..])
        );
        assert_eq!(hints.get(Dimension::EvaluationIteration), None);
    }

    #[test]
    fn test_empty_text_has_no_hints() {
        assert!(compute_hints(&text("")).is_empty());
    }

    #[test]
    fn test_iteration_follows_rubric_order() {
        let hints = compute_hints(&text(
            "Annual evaluation; stakeholder consultation; published data.",
        ));
        let dims: Vec<Dimension> = hints.iter().map(|(d, _)| d).collect();
        assert_eq!(
            dims,
            vec![
                Dimension::EmpiricalResearch,
                Dimension::TransparencyAccessibility,
                Dimension::ExpertStakeholderInput,
                Dimension::EvaluationIteration,
            ]
        );
        assert_eq!(
            hints.get(Dimension::ExpertStakeholderInput),
            Some(&["stakeholder", "consultation"][..])
        );
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let t = text("Pilot program with performance measures and an audit.");
        assert_eq!(compute_hints(&t), compute_hints(&t));

        let engine = HintEngine::new();
        assert_eq!(engine.hints_for(&t), engine.hints_for(&t));
    }

    #[test]
    fn test_engine_never_serves_stale_hints() {
        let engine = HintEngine::new();

        let first = engine.hints_for(&text("Stakeholder input was collected."));
        assert!(first.get(Dimension::ExpertStakeholderInput).is_some());

        let second = engine.hints_for(&text("Nothing relevant here."));
        assert!(second.is_empty());
    }
}
