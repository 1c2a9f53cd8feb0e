//! "Refresh matches": re-rank with a new seed while pushing down candidates
//! the user has already been shown.

use crate::controls::RankingRequest;
use crate::filter_pipeline::FilterPipeline;
use crate::ranking::Ranker;
use crate::result::MatchResult;
use catalog::CandidateId;
use matching::next_seed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// How often each candidate has appeared in a shown result list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShownHistory(BTreeMap<CandidateId, u32>);

impl ShownHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more appearance for every result in `shown`.
    pub fn record(&mut self, shown: &[MatchResult]) {
        for result in shown {
            *self.0.entry(result.id().clone()).or_insert(0) += 1;
        }
    }

    pub fn appearances(&self, id: &str) -> u32 {
        self.0.get(id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of one refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    /// Seed to use for the next refresh
    pub seed: u64,
    pub results: Vec<MatchResult>,
    /// History including the list that was on screen before this refresh
    pub history: ShownHistory,
}

/// Produces a reshuffled list that favors unseen candidates.
///
/// Each candidate's adjusted score is multiplied by
/// `decay ^ appearances`, counting the list currently on screen.
#[derive(Debug, Clone)]
pub struct RefreshController {
    decay: f64,
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshController {
    pub const DEFAULT_DECAY: f64 = 0.5;

    pub fn new() -> Self {
        Self {
            decay: Self::DEFAULT_DECAY,
        }
    }

    /// Per-appearance multiplier in `[0, 1]`. 1 disables the decay.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = if decay.is_finite() { decay.clamp(0.0, 1.0) } else { Self::DEFAULT_DECAY };
        self
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// Rerank after the user asked for fresh matches.
    ///
    /// # Arguments
    /// * `ranker` - Ranker configured for the request's pool
    /// * `request` - Profile, pool and the controls `current` was ranked with
    /// * `current` - The list on screen, counted as one more appearance
    /// * `history` - Appearances from earlier refreshes
    ///
    /// # Returns
    /// The new list with the seed and history for the next refresh
    pub fn refresh(
        &self,
        ranker: &Ranker,
        request: &RankingRequest<'_>,
        current: &[MatchResult],
        history: &ShownHistory,
    ) -> RefreshOutcome {
        let controls = request.controls;
        let seed = next_seed(controls.seed);

        let mut history = history.clone();
        history.record(current);

        let ranked = ranker.rank_with_decay(
            request.profile,
            request.candidates,
            controls.personalization,
            controls.mode,
            seed,
            |candidate| self.decay.powi(history.appearances(&candidate.id) as i32),
        );
        let results = FilterPipeline::from_filters(&controls.filters).apply(ranked);

        info!(
            "Refreshed {} results for profile {} (seed {} -> {}, {} seen)",
            results.len(),
            request.profile.id,
            controls.seed,
            seed,
            history.len()
        );

        RefreshOutcome {
            seed,
            results,
            history,
        }
    }
}
