//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields a working engine. Values are checked by [`EngineConfig::validate`]
//! before a service is built from them.

use std::fs;
use std::path::Path;

use catalog::CandidateKind;
use matching::{AttributeCategory, CategoryWeights};
use pipeline::{PersonalizationLevel, Ranker, RefreshController};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the discovery service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Weights used when ranking style twins
    #[serde(default = "default_people_weights")]
    pub people_weights: CategoryWeights,

    /// Weights used when ranking products
    #[serde(default = "default_product_weights")]
    pub product_weights: CategoryWeights,

    /// Bonus for trending candidates in trending mode
    #[serde(default = "default_trending_bonus")]
    pub trending_bonus: f64,

    /// Per-overlap discount in diverse mode
    #[serde(default = "default_diversity_penalty")]
    pub diversity_penalty: f64,

    /// Focus category multiplier in similar mode
    #[serde(default = "default_similar_focus_boost")]
    pub similar_focus_boost: f64,

    /// Per-appearance multiplier applied on refresh
    #[serde(default = "default_refresh_decay")]
    pub refresh_decay: f64,

    /// Reasons shown per result
    #[serde(default = "default_max_reasons")]
    pub max_reasons: usize,

    /// Personalization used when the caller does not choose one
    #[serde(default = "default_personalization")]
    pub default_personalization: f64,
}

fn default_people_weights() -> CategoryWeights {
    CategoryWeights::default().with(AttributeCategory::StylePreferences, 1.5)
}

fn default_product_weights() -> CategoryWeights {
    CategoryWeights::default().with(AttributeCategory::PriceAffinity, 1.0)
}

fn default_trending_bonus() -> f64 {
    Ranker::DEFAULT_TRENDING_BONUS
}

fn default_diversity_penalty() -> f64 {
    Ranker::DEFAULT_DIVERSITY_PENALTY
}

fn default_similar_focus_boost() -> f64 {
    Ranker::DEFAULT_SIMILAR_FOCUS_BOOST
}

fn default_refresh_decay() -> f64 {
    RefreshController::DEFAULT_DECAY
}

fn default_max_reasons() -> usize {
    Ranker::DEFAULT_MAX_REASONS
}

fn default_personalization() -> f64 {
    PersonalizationLevel::DEFAULT
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            people_weights: default_people_weights(),
            product_weights: default_product_weights(),
            trending_bonus: default_trending_bonus(),
            diversity_penalty: default_diversity_penalty(),
            similar_focus_boost: default_similar_focus_boost(),
            refresh_decay: default_refresh_decay(),
            max_reasons: default_max_reasons(),
            default_personalization: default_personalization(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path_str.clone(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path: path_str.clone(), source })?;
        config.validate()?;
        info!("Loaded engine config from {}", path_str);
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, weights) in [
            (CandidateKind::Person, &self.people_weights),
            (CandidateKind::Product, &self.product_weights),
        ] {
            let invalid = weights.invalid_categories();
            if !invalid.is_empty() {
                let names: Vec<_> = invalid.iter().map(|c| c.label()).collect();
                return Err(ConfigError::Invalid(format!(
                    "{} weights must be finite and non-negative: {}",
                    kind,
                    names.join(", ")
                )));
            }
            if weights.total() <= 0.0 {
                warn!("All {} weights are zero; every {} score will be 0", kind, kind);
            }
        }

        check_range("trendingBonus", self.trending_bonus, 0.0, f64::MAX)?;
        check_range("diversityPenalty", self.diversity_penalty, 0.0, 1.0)?;
        check_range("similarFocusBoost", self.similar_focus_boost, 1.0, f64::MAX)?;
        check_range("refreshDecay", self.refresh_decay, 0.0, 1.0)?;
        check_range(
            "defaultPersonalization",
            self.default_personalization,
            PersonalizationLevel::MIN,
            PersonalizationLevel::MAX,
        )?;
        Ok(())
    }

    pub fn weights_for(&self, kind: CandidateKind) -> &CategoryWeights {
        match kind {
            CandidateKind::Person => &self.people_weights,
            CandidateKind::Product => &self.product_weights,
        }
    }

    pub fn ranker_for(&self, kind: CandidateKind) -> Ranker {
        Ranker::new(self.weights_for(kind).clone())
            .with_trending_bonus(self.trending_bonus)
            .with_diversity_penalty(self.diversity_penalty)
            .with_similar_focus_boost(self.similar_focus_boost)
            .with_max_reasons(self.max_reasons)
    }

    pub fn refresh_controller(&self) -> RefreshController {
        RefreshController::new().with_decay(self.refresh_decay)
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{} must be within [{}, {}], got {}",
            name, min, max, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_kind_presets_differ() {
        let config = EngineConfig::default();
        assert_eq!(
            config.weights_for(CandidateKind::Person).get(AttributeCategory::StylePreferences),
            Some(1.5)
        );
        assert_eq!(
            config.weights_for(CandidateKind::Product).get(AttributeCategory::PriceAffinity),
            Some(1.0)
        );
        assert_eq!(config.weights_for(CandidateKind::Person).get(AttributeCategory::PriceAffinity), None);
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{"trendingBonus": 0.5, "productWeights": {"favoriteColors": 2.0}}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.trending_bonus, 0.5);
        assert_eq!(config.diversity_penalty, Ranker::DEFAULT_DIVERSITY_PENALTY);
        let weights = config.weights_for(CandidateKind::Product);
        assert_eq!(weights.get(AttributeCategory::FavoriteColors), Some(2.0));
        assert_eq!(weights.get(AttributeCategory::Interests), None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let negative: EngineConfig =
            serde_json::from_str(r#"{"peopleWeights": {"interests": -1.0}}"#).unwrap();
        assert!(matches!(negative.validate(), Err(ConfigError::Invalid(_))));

        let penalty = EngineConfig {
            diversity_penalty: 1.5,
            ..EngineConfig::default()
        };
        assert!(matches!(penalty.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("style-match-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"refreshDecay": 0.25, "maxReasons": 5}"#).unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.refresh_decay, 0.25);
        assert_eq!(config.ranker_for(CandidateKind::Product).weights(), config.weights_for(CandidateKind::Product));
        fs::remove_file(&path).unwrap();

        match EngineConfig::from_file(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path.display().to_string()),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
