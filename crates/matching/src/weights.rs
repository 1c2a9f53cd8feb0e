//! Per-category scorer weights.

use crate::vectors::AttributeCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight per attribute category.
///
/// Only categories present in the map take part in scoring. A category that
/// is absent is skipped entirely: it adds nothing to the weighted sum and
/// nothing to the normalizing total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryWeights(BTreeMap<AttributeCategory, f64>);

impl Default for CategoryWeights {
    /// Equal weight for every tag category; price affinity is not scored.
    fn default() -> Self {
        Self(
            AttributeCategory::TAGGED
                .iter()
                .map(|&category| (category, 1.0))
                .collect(),
        )
    }
}

impl CategoryWeights {
    /// No category configured. Every score will be 0.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Set a category weight (builder pattern). Negative or non-finite
    /// weights are stored as 0.
    pub fn with(mut self, category: AttributeCategory, weight: f64) -> Self {
        self.set(category, weight);
        self
    }

    pub fn set(&mut self, category: AttributeCategory, weight: f64) {
        let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        self.0.insert(category, weight);
    }

    /// Remove a category from scoring altogether.
    pub fn without(mut self, category: AttributeCategory) -> Self {
        self.0.remove(&category);
        self
    }

    pub fn get(&self, category: AttributeCategory) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeCategory, f64)> + '_ {
        self.0.iter().map(|(&category, &weight)| (category, weight))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Categories whose weight is negative or not finite (possible after
    /// deserialization, which bypasses [`CategoryWeights::set`]).
    pub fn invalid_categories(&self) -> Vec<AttributeCategory> {
        self.0
            .iter()
            .filter(|(_, weight)| !weight.is_finite() || **weight < 0.0)
            .map(|(&category, _)| category)
            .collect()
    }

    /// Highest-weighted category accepted by `eligible`. Ties go to the
    /// category declared first.
    pub fn strongest(&self, eligible: impl Fn(AttributeCategory) -> bool) -> Option<AttributeCategory> {
        let mut best: Option<(AttributeCategory, f64)> = None;
        for (category, weight) in self.iter() {
            if weight <= 0.0 || !eligible(category) {
                continue;
            }
            match best {
                Some((_, best_weight)) if best_weight >= weight => {}
                _ => best = Some((category, weight)),
            }
        }
        best.map(|(category, _)| category)
    }

    /// Copy with one category's weight multiplied by `factor`.
    pub fn boosted(&self, category: AttributeCategory, factor: f64) -> Self {
        let mut boosted = self.clone();
        if let Some(weight) = self.get(category) {
            boosted.set(category, weight * factor);
        }
        boosted
    }
}
