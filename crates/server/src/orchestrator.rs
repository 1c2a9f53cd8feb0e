//! # Discovery Service
//!
//! This module coordinates one discovery request end to end:
//! 1. Fetch the profile and the candidate pool from the provider
//! 2. Pick the weight preset for the pool kind
//! 3. Rank, apply the discovery mode and filter (on the blocking pool)
//! 4. Truncate to the requested number of results
//!
//! Every page of the application (AI discovery, style twins, shopping
//! assistant) goes through the same service; they differ only in the pool
//! kind and the controls they pass.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use catalog::{Candidate, CandidateKind, CatalogError, CatalogProvider, Profile};
use matching::{MatchedAttributes, attribute_similarity};
use pipeline::{MatchResult, RankingControls, RankingRequest, RefreshOutcome, ShownHistory};

use crate::config::EngineConfig;

/// Side-by-side view of two candidates for the Compare dialog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub profile_id: String,
    pub left: MatchResult,
    pub right: MatchResult,
    /// Attribute overlap between the two candidates, in `[0, 1]`
    pub similarity: f64,
    /// Profile tags matched by both candidates
    pub shared_matches: MatchedAttributes,
}

/// Shared entry point for ranking requests.
#[derive(Clone)]
pub struct DiscoveryService {
    catalog: Arc<dyn CatalogProvider>,
    config: Arc<EngineConfig>,
}

impl DiscoveryService {
    pub fn new(catalog: Arc<dyn CatalogProvider>, config: EngineConfig) -> Self {
        Self {
            catalog,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Controls with the configured default personalization.
    pub fn default_controls(&self) -> RankingControls {
        RankingControls::new().with_personalization(self.config.default_personalization)
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.catalog.profiles()
    }

    pub fn profile(&self, profile_id: &str) -> Result<Profile> {
        self.catalog
            .get_profile(profile_id)
            .with_context(|| format!("Failed to fetch profile {}", profile_id))
    }

    /// Rank the `kind` pool for a profile and return the top `limit`.
    ///
    /// # Arguments
    /// * `profile_id` - Profile to rank for
    /// * `kind` - Products or people
    /// * `controls` - Personalization, mode, seed and filters
    /// * `limit` - Maximum number of results
    ///
    /// # Returns
    /// Results in ranking order, or an error if the profile is unknown
    pub async fn recommend(
        &self,
        profile_id: &str,
        kind: CandidateKind,
        controls: RankingControls,
        limit: usize,
    ) -> Result<Vec<MatchResult>> {
        let start_time = Instant::now();
        let profile = self.profile(profile_id)?;
        let pool = self.pool(kind)?;
        let pool_size = pool.len();

        let ranker = self.config.ranker_for(kind);
        let mut results = tokio::task::spawn_blocking(move || {
            ranker.execute(&RankingRequest::new(&profile, &pool, &controls))
        })
        .await
        .context("Ranking task panicked")?;
        results.truncate(limit);

        info!(
            "Recommended {} of {} {} for profile {} in {:.2?}",
            results.len(),
            pool_size,
            kind,
            profile_id,
            start_time.elapsed()
        );
        Ok(results)
    }

    /// "Refresh matches".
    ///
    /// `current` is the list on screen, produced with `controls`; it counts
    /// as one more appearance on top of `history`. The returned outcome
    /// carries the seed and history to send with the next refresh.
    ///
    /// # Returns
    /// The reranked top `limit` together with the next seed and history
    pub async fn refresh(
        &self,
        profile_id: &str,
        kind: CandidateKind,
        controls: RankingControls,
        current: Vec<MatchResult>,
        history: ShownHistory,
        limit: usize,
    ) -> Result<RefreshOutcome> {
        let start_time = Instant::now();
        let profile = self.profile(profile_id)?;
        let pool = self.pool(kind)?;

        let ranker = self.config.ranker_for(kind);
        let controller = self.config.refresh_controller();
        let mut outcome = tokio::task::spawn_blocking(move || {
            let request = RankingRequest::new(&profile, &pool, &controls);
            controller.refresh(&ranker, &request, &current, &history)
        })
        .await
        .context("Refresh task panicked")?;
        outcome.results.truncate(limit);

        info!(
            "Refreshed {} {} for profile {} in {:.2?}",
            outcome.results.len(),
            kind,
            profile_id,
            start_time.elapsed()
        );
        Ok(outcome)
    }

    /// Score two candidates of the same pool against a profile.
    ///
    /// # Arguments
    /// * `left_id` / `right_id` - Two distinct candidates of the `kind` pool
    ///
    /// # Returns
    /// Both results, their attribute overlap and the profile tags both of
    /// them match
    pub async fn compare(
        &self,
        profile_id: &str,
        kind: CandidateKind,
        left_id: &str,
        right_id: &str,
    ) -> Result<Comparison> {
        if left_id == right_id {
            anyhow::bail!("Compare needs two distinct candidates, got {} twice", left_id);
        }
        let profile = self.profile(profile_id)?;
        let pool = self.pool(kind)?;
        let find = |id: &str| {
            pool.iter()
                .find(|candidate| candidate.id == id)
                .cloned()
                .ok_or_else(|| CatalogError::CandidateNotFound(id.to_string()))
        };
        let pair = vec![find(left_id)?, find(right_id)?];

        // Full personalization: the comparison shows pure match scores.
        let controls = RankingControls::new().with_personalization(100.0);
        let ranker = self.config.ranker_for(kind);
        let ranked = tokio::task::spawn_blocking(move || {
            ranker.execute(&RankingRequest::new(&profile, &pair, &controls))
        })
        .await
        .context("Compare task panicked")?;

        let (mut lefts, mut rights): (Vec<_>, Vec<_>) =
            ranked.into_iter().partition(|result| result.id() == left_id);
        let (Some(left), Some(right)) = (lefts.pop(), rights.pop()) else {
            anyhow::bail!("Failed to score {} and {}", left_id, right_id);
        };

        let similarity = attribute_similarity(&left.candidate, &right.candidate);
        let shared_matches = shared_matches(&left.matched_attributes, &right.matched_attributes);
        info!(
            "Compared {} and {} for profile {} (similarity {:.2})",
            left_id, right_id, profile_id, similarity
        );

        Ok(Comparison {
            profile_id: profile_id.to_string(),
            left,
            right,
            similarity,
            shared_matches,
        })
    }

    fn pool(&self, kind: CandidateKind) -> Result<Vec<Candidate>> {
        self.catalog
            .get_candidate_pool(kind)
            .with_context(|| format!("Failed to fetch {} pool", kind))
    }
}

fn shared_matches(left: &MatchedAttributes, right: &MatchedAttributes) -> MatchedAttributes {
    left.iter()
        .filter_map(|(category, tags)| {
            let other = right.get(category)?;
            let shared: Vec<String> = tags.iter().filter(|tag| other.contains(tag)).cloned().collect();
            (!shared.is_empty()).then_some((*category, shared))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{Catalog, Relationship};
    use matching::AttributeCategory;
    use pipeline::{DiscoveryMode, Filters};

    fn build_test_catalog() -> Arc<dyn CatalogProvider> {
        let profiles = vec![
            Profile::new("me", "Jordan", Relationship::Own)
                .with_style_preferences(["Minimalist", "Modern"])
                .with_favorite_colors(["Black", "White"])
                .with_favorite_categories(["Shoes", "Home Decor"]),
            Profile::new("blank", "New Friend", Relationship::Friend),
        ];
        let products = vec![
            Candidate::product("prod-1", "Leather Sneaker")
                .with_price(98.0)
                .with_style_traits("Minimalist, Modern")
                .with_colors("Black, White")
                .with_categories("Shoes"),
            Candidate::product("prod-2", "Oak Pendant Lamp")
                .with_price(249.99)
                .with_style_traits("Scandinavian, Minimalist")
                .with_colors("White")
                .with_categories("Home Decor"),
            Candidate::product("prod-3", "Trail Shoe")
                .with_price(140.0)
                .with_style_traits("Athletic")
                .with_colors("Orange")
                .with_categories("Shoes")
                .trending(),
            Candidate::product("prod-4", "Tote")
                .with_price(60.0)
                .with_style_traits("Bohemian")
                .with_colors("Tan")
                .with_categories("Bags"),
        ];
        let people = vec![
            Candidate::person("twin-1", "Ava")
                .with_style_traits("Minimalist, Modern")
                .with_colors("Black"),
            Candidate::person("twin-2", "Ben").with_style_traits("Streetwear"),
        ];
        Arc::new(Catalog::from_parts(profiles, products, people).unwrap())
    }

    fn build_test_service() -> DiscoveryService {
        DiscoveryService::new(build_test_catalog(), EngineConfig::default())
    }

    fn full() -> RankingControls {
        RankingControls::new().with_personalization(100.0)
    }

    // ============================================================================
    // recommend
    // ============================================================================

    #[tokio::test]
    async fn test_recommend_ranks_best_match_first() {
        let service = build_test_service();
        let results = service.recommend("me", CandidateKind::Product, full(), 10).await.unwrap();

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].id(), "prod-1");
        assert!(results.windows(2).all(|w| w[0].adjusted_score >= w[1].adjusted_score));
        assert!(!results[0].reasons.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_truncates_to_limit() {
        let service = build_test_service();
        let results = service.recommend("me", CandidateKind::Product, full(), 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_recommend_applies_filters() {
        let service = build_test_service();
        let controls = full().with_filters(Filters::new().with_price_range(0.0, 100.0));
        let results = service.recommend("me", CandidateKind::Product, controls, 10).await.unwrap();

        let ids: Vec<&str> = results.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, vec!["prod-1", "prod-4"]);
    }

    #[tokio::test]
    async fn test_recommend_people_pool() {
        let service = build_test_service();
        let results = service.recommend("me", CandidateKind::Person, full(), 10).await.unwrap();

        assert_eq!(results[0].id(), "twin-1");
        assert!(results.iter().all(|r| r.candidate.kind == CandidateKind::Person));
    }

    #[tokio::test]
    async fn test_recommend_blank_profile_is_not_an_error() {
        let service = build_test_service();
        let results = service.recommend("blank", CandidateKind::Product, full(), 10).await.unwrap();

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[tokio::test]
    async fn test_recommend_missing_profile() {
        let service = build_test_service();
        let err = service
            .recommend("nobody", CandidateKind::Product, full(), 10)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::ProfileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_recommend_is_deterministic() {
        let service = build_test_service();
        let controls = RankingControls::new()
            .with_personalization(40.0)
            .with_mode(DiscoveryMode::Diverse)
            .with_seed(123);

        let first = service.recommend("me", CandidateKind::Product, controls.clone(), 10).await.unwrap();
        let second = service.recommend("me", CandidateKind::Product, controls, 10).await.unwrap();
        assert_eq!(first, second);
    }

    // ============================================================================
    // refresh
    // ============================================================================

    #[tokio::test]
    async fn test_refresh_moves_shown_results_down() {
        let service = build_test_service();
        let controls = full().with_seed(5);

        let shown = service.recommend("me", CandidateKind::Product, controls.clone(), 1).await.unwrap();
        let outcome = service
            .refresh("me", CandidateKind::Product, controls, shown.clone(), ShownHistory::new(), 1)
            .await
            .unwrap();

        assert_eq!(outcome.history.appearances(shown[0].id()), 1);
        assert_eq!(outcome.history.len(), 1);
        assert_eq!(outcome.results[0].id(), "prod-2");
        assert_ne!(outcome.seed, 5);
    }

    #[tokio::test]
    async fn test_refresh_chains_seeds() {
        let service = build_test_service();
        let controls = full().with_seed(1);
        let shown = service.recommend("me", CandidateKind::Product, controls.clone(), 2).await.unwrap();

        let first = service
            .refresh("me", CandidateKind::Product, controls, shown, ShownHistory::new(), 2)
            .await
            .unwrap();
        let second = service
            .refresh(
                "me",
                CandidateKind::Product,
                full().with_seed(first.seed),
                first.results.clone(),
                first.history.clone(),
                2,
            )
            .await
            .unwrap();

        assert_ne!(second.seed, first.seed);
        let ids = |results: &[MatchResult]| results.iter().map(|r| r.id().clone()).collect::<Vec<_>>();
        // One halving is not enough to drop prod-2 below prod-3; two are.
        assert_eq!(ids(&first.results), vec!["prod-1", "prod-2"]);
        assert_eq!(ids(&second.results), vec!["prod-1", "prod-3"]);
        assert_eq!(second.history.appearances("prod-2"), 2);
    }

    // ============================================================================
    // compare
    // ============================================================================

    #[tokio::test]
    async fn test_compare_two_products() {
        let service = build_test_service();
        let comparison = service
            .compare("me", CandidateKind::Product, "prod-1", "prod-2")
            .await
            .unwrap();

        assert_eq!(comparison.left.id(), "prod-1");
        assert_eq!(comparison.right.id(), "prod-2");
        assert!(comparison.left.score > comparison.right.score);
        assert!(comparison.similarity > 0.0 && comparison.similarity < 1.0);
        assert_eq!(
            comparison.shared_matches.get(&AttributeCategory::StylePreferences),
            Some(&vec!["Minimalist".to_string()])
        );
    }

    #[tokio::test]
    async fn test_compare_unknown_candidate() {
        let service = build_test_service();
        let err = service
            .compare("me", CandidateKind::Product, "prod-1", "prod-99")
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::CandidateNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_compare_same_candidate_rejected() {
        let service = build_test_service();
        assert!(service.compare("me", CandidateKind::Product, "prod-1", "prod-1").await.is_err());
    }
}
