//! Output of the ranking pipeline.

use catalog::{Candidate, CandidateId};
use matching::MatchedAttributes;
use serde::Serialize;
use std::cmp::Ordering;

/// One ranked candidate with the evidence behind its position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub candidate: Candidate,
    /// Similarity to the profile in `[0, 1]`, independent of the controls
    pub score: f64,
    /// Score after novelty blending, discovery mode and refresh decay. This
    /// is what the list is ordered by.
    pub adjusted_score: f64,
    /// Literal tag intersections per category, for tag chips and the
    /// Compare dialog
    pub matched_attributes: MatchedAttributes,
    pub reasons: Vec<String>,
}

impl MatchResult {
    pub fn id(&self) -> &CandidateId {
        &self.candidate.id
    }
}

/// Ranking order: adjusted score descending, then candidate id ascending.
pub fn ranking_order(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.adjusted_score
        .total_cmp(&a.adjusted_score)
        .then_with(|| a.candidate.id.cmp(&b.candidate.id))
}
