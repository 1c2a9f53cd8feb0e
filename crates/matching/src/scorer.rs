//! Similarity scorer.
//!
//! ## Algorithm
//! For every category present in the weights:
//!
//! ```text
//! overlap(c) = |P ∩ C| / max(1, |P ∪ C|)      (0 when P is empty)
//! score      = Σ w(c) · overlap(c) / Σ w(c)
//! ```
//!
//! An empty profile category still counts in the denominator, so a sparse
//! profile does not inflate the scores of candidates that happen to match
//! its one populated category.

use crate::tags::TagSet;
use crate::vectors::{AttributeCategory, Matchable};
use crate::weights::CategoryWeights;
use serde::Serialize;
use std::collections::BTreeMap;

/// Tags shared by profile and candidate, per category, in the profile's
/// display casing.
pub type MatchedAttributes = BTreeMap<AttributeCategory, Vec<String>>;

/// Result of scoring one candidate against one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Weighted overlap in `[0, 1]`.
    pub score: f64,
    /// Only categories with at least one shared tag appear.
    pub matched_attributes: MatchedAttributes,
    /// Overlap of every scored category, before weighting.
    pub overlaps: BTreeMap<AttributeCategory, f64>,
}

/// Jaccard-style overlap of one category.
pub fn overlap(profile: &TagSet, candidate: &TagSet) -> f64 {
    if profile.is_empty() {
        return 0.0;
    }
    let union = profile.union_count(candidate).max(1);
    profile.intersection_count(candidate) as f64 / union as f64
}

/// Attribute overlap between two entities across every tag category.
///
/// Tags are compared within their category, so "Black" as a color and
/// "Black" as a brand do not collide. Two entities without any tags have
/// similarity 0.
pub fn attribute_similarity<A: Matchable + ?Sized, B: Matchable + ?Sized>(a: &A, b: &B) -> f64 {
    let mut intersection = 0usize;
    let mut union = 0usize;
    for category in AttributeCategory::TAGGED {
        let left = a.tags(category);
        let right = b.tags(category);
        intersection += left.intersection_count(right);
        union += left.union_count(right);
    }
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Scores candidates against a profile with a fixed weight configuration.
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    weights: CategoryWeights,
}

impl SimilarityScorer {
    pub fn new(weights: CategoryWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &CategoryWeights {
        &self.weights
    }

    /// Score `candidate` against `profile`.
    ///
    /// Deterministic: identical inputs produce identical breakdowns.
    pub fn score<P, C>(&self, profile: &P, candidate: &C) -> ScoreBreakdown
    where
        P: Matchable + ?Sized,
        C: Matchable + ?Sized,
    {
        let mut breakdown = ScoreBreakdown::default();
        let mut weighted_sum = 0.0;
        let mut applied_weight = 0.0;

        for (category, weight) in self.weights.iter() {
            let (category_overlap, matched) = match category {
                AttributeCategory::PriceAffinity => price_overlap(profile, candidate),
                _ => {
                    let profile_tags = profile.tags(category);
                    let candidate_tags = candidate.tags(category);
                    (
                        overlap(profile_tags, candidate_tags),
                        profile_tags.intersection_display(candidate_tags),
                    )
                }
            };

            weighted_sum += weight * category_overlap;
            applied_weight += weight;
            breakdown.overlaps.insert(category, category_overlap);
            if !matched.is_empty() {
                breakdown.matched_attributes.insert(category, matched);
            }
        }

        breakdown.score = if applied_weight > 0.0 {
            (weighted_sum / applied_weight).clamp(0.0, 1.0)
        } else {
            0.0
        };
        breakdown
    }
}

/// Budget match: 1 when the candidate's price sits inside the profile's
/// range for one of the candidate's categories.
fn price_overlap<P, C>(profile: &P, candidate: &C) -> (f64, Vec<String>)
where
    P: Matchable + ?Sized,
    C: Matchable + ?Sized,
{
    let affinity = match profile.price_affinity() {
        Some(affinity) if !affinity.is_empty() => affinity,
        _ => return (0.0, Vec::new()),
    };
    let price = match candidate.price() {
        Some(price) if price.is_finite() => price,
        _ => return (0.0, Vec::new()),
    };

    let matched = affinity.matching(candidate.tags(AttributeCategory::FavoriteCategories), price);
    if matched.is_empty() {
        (0.0, matched)
    } else {
        (1.0, matched)
    }
}
