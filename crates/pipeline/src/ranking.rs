//! Ranking pipeline.
//!
//! ## Algorithm
//! 1. Score every candidate against the profile (in parallel, order kept)
//! 2. Blend with the seeded novelty factor:
//!    `adjusted = p · score + (1 - p) · novelty`, `p = personalization / 100`
//! 3. Apply the discovery mode:
//!    - balanced: nothing
//!    - trending: trending candidates × (1 + trending bonus)
//!    - similar: the blend uses a score re-weighted toward the profile's
//!      strongest populated category
//!    - diverse: greedy re-selection, each pick discounted by its overlap
//!      with the candidates already placed
//! 4. Sort by adjusted score descending, ties by candidate id

use crate::controls::{DiscoveryMode, PersonalizationLevel, RankingRequest};
use crate::filter_pipeline::FilterPipeline;
use crate::result::{MatchResult, ranking_order};
use catalog::{Candidate, Profile};
use matching::{
    AttributeCategory, CategoryWeights, Matchable, SimilarityScorer, attribute_similarity,
    explain, novelty_factor,
};
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Ranks candidate pools for a profile.
///
/// Holds configuration only; every call is independent, so one ranker can
/// serve concurrent requests.
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: CategoryWeights,
    trending_bonus: f64,
    diversity_penalty: f64,
    similar_focus_boost: f64,
    max_reasons: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(CategoryWeights::default())
    }
}

impl Ranker {
    pub const DEFAULT_TRENDING_BONUS: f64 = 0.25;
    pub const DEFAULT_DIVERSITY_PENALTY: f64 = 0.5;
    pub const DEFAULT_SIMILAR_FOCUS_BOOST: f64 = 3.0;
    pub const DEFAULT_MAX_REASONS: usize = 3;

    pub fn new(weights: CategoryWeights) -> Self {
        Self {
            weights,
            trending_bonus: Self::DEFAULT_TRENDING_BONUS,
            diversity_penalty: Self::DEFAULT_DIVERSITY_PENALTY,
            similar_focus_boost: Self::DEFAULT_SIMILAR_FOCUS_BOOST,
            max_reasons: Self::DEFAULT_MAX_REASONS,
        }
    }

    /// Multiplicative bonus for trending candidates (default: 0.25)
    pub fn with_trending_bonus(mut self, bonus: f64) -> Self {
        self.trending_bonus = bonus.max(0.0);
        self
    }

    /// Share of the score removed per unit of overlap with an already
    /// placed candidate in diverse mode, in `[0, 1]` (default: 0.5)
    pub fn with_diversity_penalty(mut self, penalty: f64) -> Self {
        self.diversity_penalty = penalty.clamp(0.0, 1.0);
        self
    }

    /// Weight multiplier for the focus category in similar mode (default: 3.0)
    pub fn with_similar_focus_boost(mut self, boost: f64) -> Self {
        self.similar_focus_boost = boost.max(1.0);
        self
    }

    /// Reasons generated per result (default: 3)
    pub fn with_max_reasons(mut self, max: usize) -> Self {
        self.max_reasons = max;
        self
    }

    pub fn weights(&self) -> &CategoryWeights {
        &self.weights
    }

    /// Rank a pool. Never fails: an empty pool gives an empty list, a blank
    /// profile gives every candidate score 0 ordered by id (at full
    /// personalization).
    ///
    /// # Arguments
    /// * `profile` - The profile to match against
    /// * `candidates` - The pool, already filtered
    /// * `personalization` - Weight of the profile score against novelty
    /// * `mode` - Discovery mode applied after blending
    /// * `seed` - Seed for the novelty factor
    ///
    /// # Returns
    /// One result per candidate, in ranking order
    pub fn rank(
        &self,
        profile: &Profile,
        candidates: &[Candidate],
        personalization: PersonalizationLevel,
        mode: DiscoveryMode,
        seed: u64,
    ) -> Vec<MatchResult> {
        self.rank_with_decay(profile, candidates, personalization, mode, seed, |_| 1.0)
    }

    /// Rank, then filter with the request's filters.
    #[instrument(skip_all, fields(profile_id = %request.profile.id, pool = request.candidates.len(), mode = %request.controls.mode))]
    pub fn execute(&self, request: &RankingRequest<'_>) -> Vec<MatchResult> {
        let controls = request.controls;
        let ranked = self.rank(
            request.profile,
            request.candidates,
            controls.personalization,
            controls.mode,
            controls.seed,
        );
        FilterPipeline::from_filters(&controls.filters).apply(ranked)
    }

    /// Rank with a per-candidate multiplier applied to the adjusted score
    /// before ordering. Used by the refresh controller.
    pub(crate) fn rank_with_decay<F>(
        &self,
        profile: &Profile,
        candidates: &[Candidate],
        personalization: PersonalizationLevel,
        mode: DiscoveryMode,
        seed: u64,
        decay: F,
    ) -> Vec<MatchResult>
    where
        F: Fn(&Candidate) -> f64 + Sync,
    {
        if candidates.is_empty() {
            return Vec::new();
        }

        let scorer = SimilarityScorer::new(self.weights.clone());
        let focused = match mode {
            DiscoveryMode::Similar => self.focus_category(profile).map(|category| {
                debug!("Similar mode focusing on {}", category);
                SimilarityScorer::new(self.weights.boosted(category, self.similar_focus_boost))
            }),
            _ => None,
        };
        let p = personalization.fraction();

        let mut ranked: Vec<MatchResult> = candidates
            .par_iter()
            .map(|candidate| {
                let breakdown = scorer.score(profile, candidate);
                let preference = match &focused {
                    Some(focused) => focused.score(profile, candidate).score,
                    None => breakdown.score,
                };

                let novelty = novelty_factor(seed, &candidate.id);
                let mut adjusted = p * preference + (1.0 - p) * novelty;
                if mode == DiscoveryMode::Trending && candidate.trending {
                    adjusted *= 1.0 + self.trending_bonus;
                }
                adjusted *= decay(candidate);

                let reasons = explain(&breakdown.matched_attributes, scorer.weights(), self.max_reasons);
                MatchResult {
                    candidate: candidate.clone(),
                    score: breakdown.score,
                    adjusted_score: adjusted,
                    matched_attributes: breakdown.matched_attributes,
                    reasons,
                }
            })
            .collect();

        ranked.sort_by(ranking_order);
        if mode == DiscoveryMode::Diverse {
            ranked = self.diversify(ranked);
        }

        debug!(
            "Ranked {} candidates (mode: {}, personalization: {})",
            ranked.len(),
            mode,
            personalization.value()
        );
        ranked
    }

    /// The highest-weighted category the profile actually fills in.
    fn focus_category(&self, profile: &Profile) -> Option<AttributeCategory> {
        self.weights.strongest(|category| match category {
            AttributeCategory::PriceAffinity => !profile.price_affinity.is_empty(),
            _ => !profile.tags(category).is_empty(),
        })
    }

    /// Greedy de-duplication.
    ///
    /// At every step the remaining candidate with the highest
    /// `adjusted · (1 - penalty)^(Σ overlap with placed)` is placed next;
    /// its adjusted score becomes that discounted value. The discounted
    /// values are non-increasing, so the output stays sorted.
    fn diversify(&self, ranked: Vec<MatchResult>) -> Vec<MatchResult> {
        let keep = 1.0 - self.diversity_penalty;
        let mut remaining: Vec<(MatchResult, f64)> =
            ranked.into_iter().map(|result| (result, 0.0)).collect();
        let mut placed: Vec<MatchResult> = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let mut best = 0;
            let mut best_score = f64::NEG_INFINITY;
            for (index, (result, overlap)) in remaining.iter().enumerate() {
                let effective = result.adjusted_score * keep.powf(*overlap);
                // Equal discounted scores go to the smaller id
                let wins = match effective.total_cmp(&best_score) {
                    Ordering::Greater => true,
                    Ordering::Equal => result.candidate.id < remaining[best].0.candidate.id,
                    Ordering::Less => false,
                };
                if wins {
                    best = index;
                    best_score = effective;
                }
            }

            let (mut chosen, _) = remaining.remove(best);
            chosen.adjusted_score = best_score;
            for (result, overlap) in remaining.iter_mut() {
                *overlap += attribute_similarity(&chosen.candidate, &result.candidate);
            }
            placed.push(chosen);
        }
        placed
    }
}

/// Rank a pool with default weights.
pub fn rank(
    profile: &Profile,
    candidates: &[Candidate],
    personalization: PersonalizationLevel,
    mode: DiscoveryMode,
    seed: u64,
) -> Vec<MatchResult> {
    Ranker::default().rank(profile, candidates, personalization, mode, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Relationship;

    fn profile() -> Profile {
        Profile::new("me", "Jordan", Relationship::Own)
            .with_style_preferences(["Minimalist", "Modern"])
            .with_favorite_colors(["Black", "White"])
    }

    fn full() -> PersonalizationLevel {
        PersonalizationLevel::new(100.0)
    }

    fn ids(results: &[MatchResult]) -> Vec<&str> {
        results.iter().map(|r| r.id().as_str()).collect()
    }

    #[test]
    fn test_empty_pool() {
        let ranked = Ranker::default().rank(&profile(), &[], full(), DiscoveryMode::Balanced, 1);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_full_personalization_orders_by_score() {
        let candidates = vec![
            Candidate::product("b", "Runner").with_style_traits("Athletic").with_colors("Red"),
            Candidate::product("a", "Sneaker")
                .with_style_traits("Minimalist, Sustainable")
                .with_colors("Black"),
        ];
        let ranked = Ranker::default().rank(&profile(), &candidates, full(), DiscoveryMode::Balanced, 9);

        assert_eq!(ids(&ranked), vec!["a", "b"]);
        assert_eq!(ranked[0].adjusted_score, ranked[0].score);
        assert!(!ranked[0].reasons.is_empty());
    }

    #[test]
    fn test_blank_profile_orders_by_id() {
        let candidates = vec![
            Candidate::product("c", "C").with_style_traits("Minimalist"),
            Candidate::product("a", "A"),
            Candidate::product("b", "B").with_colors("Black"),
        ];
        let blank = Profile::new("blank", "Blank", Relationship::Other);
        let ranked = Ranker::default().rank(&blank, &candidates, full(), DiscoveryMode::Balanced, 3);

        assert_eq!(ids(&ranked), vec!["a", "b", "c"]);
        assert!(ranked.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_zero_personalization_is_score_independent() {
        let candidates: Vec<Candidate> = (0..20)
            .map(|i| Candidate::product(format!("p{:02}", i), "Item").with_style_traits("Minimalist"))
            .collect();
        let ranked = Ranker::default().rank(
            &profile(),
            &candidates,
            PersonalizationLevel::new(0.0),
            DiscoveryMode::Balanced,
            11,
        );

        for result in &ranked {
            assert_eq!(result.adjusted_score, novelty_factor(11, &result.candidate.id));
        }
    }

    #[test]
    fn test_trending_bonus_lifts_trending_candidate() {
        let candidates = vec![
            Candidate::product("a", "A").with_style_traits("Minimalist, Modern"),
            Candidate::product("b", "B").with_style_traits("Minimalist").trending(),
        ];
        let ranker = Ranker::default().with_trending_bonus(2.0);

        let balanced = ranker.rank(&profile(), &candidates, full(), DiscoveryMode::Balanced, 1);
        let trending = ranker.rank(&profile(), &candidates, full(), DiscoveryMode::Trending, 1);

        assert_eq!(ids(&balanced), vec!["a", "b"]);
        assert_eq!(ids(&trending), vec!["b", "a"]);
        // Base score is never touched by the mode.
        assert_eq!(trending[0].score, balanced[1].score);
    }

    #[test]
    fn test_similar_mode_narrows_to_strongest_category() {
        // "b" wins on the configured weights; similar mode narrows onto
        // style, the heaviest category, where only "a" matches.
        let weights = CategoryWeights::default().with(AttributeCategory::StylePreferences, 1.5);
        let candidates = vec![
            Candidate::product("a", "A").with_style_traits("Minimalist"),
            Candidate::product("b", "B").with_colors("Black, White"),
        ];
        let ranker = Ranker::new(weights).with_similar_focus_boost(4.0);

        let similar = ranker.rank(&profile(), &candidates, full(), DiscoveryMode::Similar, 1);
        assert_eq!(similar[0].id(), "a");
        assert!(similar[0].adjusted_score > similar[0].score);
    }

    #[test]
    fn test_diverse_interleaves_distinct_candidate() {
        let twin = |id: &str| {
            Candidate::person(id, "Twin")
                .with_style_traits("Minimalist, Modern")
                .with_colors("Black")
        };
        let candidates = vec![
            twin("dup-1"),
            twin("dup-2"),
            twin("dup-3"),
            Candidate::person("other", "Other")
                .with_style_traits("Scandinavian")
                .with_colors("Black"),
        ];

        let profile = Profile::new("me", "Jordan", Relationship::Own)
            .with_style_preferences("Minimalist, Modern")
            .with_favorite_colors("Black");

        let balanced = Ranker::default().rank(&profile, &candidates, full(), DiscoveryMode::Balanced, 1);
        assert_eq!(ids(&balanced), vec!["dup-1", "dup-2", "dup-3", "other"]);

        let ranked = Ranker::default().rank(&profile, &candidates, full(), DiscoveryMode::Diverse, 1);
        assert_eq!(ids(&ranked), vec!["dup-1", "dup-2", "other", "dup-3"]);

        for pair in ranked.windows(2) {
            assert!(pair[0].adjusted_score >= pair[1].adjusted_score);
        }
    }

    #[test]
    fn test_diverse_ties_after_discount_go_to_smaller_id() {
        let result = |candidate: Candidate, adjusted_score: f64| MatchResult {
            candidate,
            score: adjusted_score,
            adjusted_score,
            matched_attributes: Default::default(),
            reasons: Vec::new(),
        };
        // "b" fully overlaps "top", so its 0.8 halves to exactly 0.4 and ties "a"
        let ranked = vec![
            result(Candidate::product("top", "Top").with_style_traits("Minimalist"), 0.9),
            result(Candidate::product("b", "B").with_style_traits("Minimalist"), 0.8),
            result(Candidate::product("a", "A").with_style_traits("Boho"), 0.4),
        ];

        let placed = Ranker::default().diversify(ranked);
        assert_eq!(ids(&placed), vec!["top", "a", "b"]);
        assert_eq!(placed[1].adjusted_score, placed[2].adjusted_score);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let candidates: Vec<Candidate> = (0..30)
            .map(|i| {
                Candidate::product(format!("p{}", i), "Item")
                    .with_style_traits(if i % 2 == 0 { "Minimalist" } else { "Modern, Bold" })
                    .with_colors(if i % 3 == 0 { "Black" } else { "Red" })
            })
            .collect();
        let level = PersonalizationLevel::new(60.0);

        for mode in DiscoveryMode::ALL {
            let first = Ranker::default().rank(&profile(), &candidates, level, mode, 5);
            let second = Ranker::default().rank(&profile(), &candidates, level, mode, 5);
            assert_eq!(first, second);
        }
    }
}
