//! User-adjustable ranking controls.
//!
//! Controls come from sliders and selects that are already constrained, but
//! the engine can be called from elsewhere, so every value is clamped or
//! defaulted here instead of being rejected.

use catalog::{Candidate, Profile};
use matching::{PriceRange, RawTags, TagSet, vectorize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Personalization slider position, always within `[0, 100]`.
///
/// 100 ranks strictly by match score, 0 ranks purely by novelty.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct PersonalizationLevel(f64);

impl PersonalizationLevel {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;
    pub const DEFAULT: f64 = 75.0;

    /// Clamp into range. `NaN` falls back to [`PersonalizationLevel::DEFAULT`].
    pub fn new(level: f64) -> Self {
        if level.is_nan() {
            warn!("Personalization level is NaN, using default {}", Self::DEFAULT);
            return Self(Self::DEFAULT);
        }
        if !(Self::MIN..=Self::MAX).contains(&level) {
            warn!("Personalization level {} out of range, clamping", level);
        }
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Weight of the match score in the blend, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        self.0 / Self::MAX
    }
}

impl Default for PersonalizationLevel {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<f64> for PersonalizationLevel {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<PersonalizationLevel> for f64 {
    fn from(value: PersonalizationLevel) -> Self {
        value.0
    }
}

/// How the ranked list is post-processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DiscoveryMode {
    /// Pure adjusted-score order
    #[default]
    Balanced,
    /// Trending candidates get a multiplicative bonus
    Trending,
    /// Scorer narrowed toward the profile's strongest category
    Similar,
    /// Near-duplicates are pushed apart
    Diverse,
}

impl DiscoveryMode {
    pub const ALL: [DiscoveryMode; 4] = [
        DiscoveryMode::Balanced,
        DiscoveryMode::Trending,
        DiscoveryMode::Similar,
        DiscoveryMode::Diverse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryMode::Balanced => "balanced",
            DiscoveryMode::Trending => "trending",
            DiscoveryMode::Similar => "similar",
            DiscoveryMode::Diverse => "diverse",
        }
    }

    /// Parse a mode name; anything unknown becomes `Balanced`.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!("Unknown discovery mode {:?}, falling back to balanced", value);
            DiscoveryMode::Balanced
        })
    }
}

impl FromStr for DiscoveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        DiscoveryMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| format!("unknown discovery mode: {}", s))
    }
}

impl From<String> for DiscoveryMode {
    fn from(value: String) -> Self {
        DiscoveryMode::parse_lenient(&value)
    }
}

impl From<DiscoveryMode> for String {
    fn from(value: DiscoveryMode) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hard constraints applied after ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    /// Empty means no category constraint
    #[serde(default)]
    pub categories: TagSet,
    /// Empty means no search constraint
    #[serde(default)]
    pub search_query: String,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some(PriceRange::new(min, max));
        self
    }

    pub fn with_categories(mut self, raw: impl Into<RawTags>) -> Self {
        self.categories = vectorize(raw);
        self
    }

    pub fn with_search_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.price_range.is_none() && self.categories.is_empty() && self.search_query.trim().is_empty()
    }
}

/// Everything the user can adjust for one ranking call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingControls {
    #[serde(default)]
    pub personalization: PersonalizationLevel,
    #[serde(default)]
    pub mode: DiscoveryMode,
    #[serde(default)]
    pub filters: Filters,
    /// Session seed for the novelty factor
    #[serde(default)]
    pub seed: u64,
}

impl RankingControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_personalization(mut self, level: f64) -> Self {
        self.personalization = PersonalizationLevel::new(level);
        self
    }

    pub fn with_mode(mut self, mode: DiscoveryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// One ranking call: the profile, the pool, and the controls.
///
/// Ephemeral; borrowed inputs are never mutated.
#[derive(Debug, Clone, Copy)]
pub struct RankingRequest<'a> {
    pub profile: &'a Profile,
    pub candidates: &'a [Candidate],
    pub controls: &'a RankingControls,
}

impl<'a> RankingRequest<'a> {
    pub fn new(profile: &'a Profile, candidates: &'a [Candidate], controls: &'a RankingControls) -> Self {
        Self {
            profile,
            candidates,
            controls,
        }
    }
}
