//! Attribute categories and the [`Matchable`] seam shared by profiles and
//! candidates.

use crate::tags::{TagSet, normalize_tag};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

static EMPTY_TAGS: TagSet = TagSet::new();

/// A dimension the scorer compares on.
///
/// The serialized names follow the profile form fields, which is also how
/// matched attributes are keyed for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeCategory {
    StylePreferences,
    Interests,
    FavoriteCategories,
    FavoriteColors,
    FavoriteStores,
    /// Candidate price against the profile's per-category budget.
    PriceAffinity,
}

impl AttributeCategory {
    /// Categories backed by a [`TagSet`].
    pub const TAGGED: [AttributeCategory; 5] = [
        AttributeCategory::StylePreferences,
        AttributeCategory::Interests,
        AttributeCategory::FavoriteCategories,
        AttributeCategory::FavoriteColors,
        AttributeCategory::FavoriteStores,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AttributeCategory::StylePreferences => "style",
            AttributeCategory::Interests => "interests",
            AttributeCategory::FavoriteCategories => "categories",
            AttributeCategory::FavoriteColors => "colors",
            AttributeCategory::FavoriteStores => "brands",
            AttributeCategory::PriceAffinity => "price",
        }
    }
}

impl fmt::Display for AttributeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive numeric price range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Bounds given in the wrong order are swapped.
    pub fn new(min: f64, max: f64) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    /// Same range with the bounds in order.
    pub fn normalized(self) -> Self {
        Self::new(self.min, self.max)
    }
}

/// Per-category budget of a profile, keyed case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceAffinity {
    ranges: BTreeMap<String, (String, PriceRange)>,
}

impl PriceAffinity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the budget for a category. Blank category names are ignored.
    pub fn insert(&mut self, category: &str, range: PriceRange) {
        if let Some((key, display)) = normalize_tag(category) {
            self.ranges.insert(key, (display, range.normalized()));
        }
    }

    pub fn with(mut self, category: &str, range: PriceRange) -> Self {
        self.insert(category, range);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn get(&self, category: &str) -> Option<PriceRange> {
        let (key, _) = normalize_tag(category)?;
        self.ranges.get(&key).map(|(_, range)| *range)
    }

    /// `(display name, range)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PriceRange)> {
        self.ranges.values().map(|(display, range)| (display.as_str(), *range))
    }

    /// Display names of the budget categories shared with `categories`
    /// whose range accepts `price`.
    pub fn matching(&self, categories: &TagSet, price: f64) -> Vec<String> {
        self.ranges
            .iter()
            .filter(|(key, (_, range))| categories.contains_key(key) && range.contains(price))
            .map(|(_, (display, _))| display.clone())
            .collect()
    }
}

impl<'de> Deserialize<'de> for PriceAffinity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, PriceRange>>::deserialize(deserializer)?;
        let mut affinity = PriceAffinity::new();
        for (category, range) in raw.unwrap_or_default() {
            affinity.insert(&category, range);
        }
        Ok(affinity)
    }
}

impl Serialize for PriceAffinity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.ranges.values().map(|(display, range)| (display, range)))
    }
}

/// Anything the scorer can compare: profiles, candidates, or plain
/// [`AttributeVectors`].
///
/// Profiles and candidates expose the same tag categories so a single
/// scorer works for both people matching and product matching.
pub trait Matchable {
    fn tags(&self, category: AttributeCategory) -> &TagSet;

    /// Price used for budget matching. Profiles have none.
    fn price(&self) -> Option<f64> {
        None
    }

    /// Per-category budget. Candidates have none.
    fn price_affinity(&self) -> Option<&PriceAffinity> {
        None
    }
}

/// Free-standing attribute vectors, mostly useful when the caller does not
/// hold a full profile or candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeVectors {
    pub style: TagSet,
    pub interests: TagSet,
    pub categories: TagSet,
    pub colors: TagSet,
    pub brands: TagSet,
    pub price_affinity: PriceAffinity,
    pub price: Option<f64>,
}

impl Matchable for AttributeVectors {
    fn tags(&self, category: AttributeCategory) -> &TagSet {
        match category {
            AttributeCategory::StylePreferences => &self.style,
            AttributeCategory::Interests => &self.interests,
            AttributeCategory::FavoriteCategories => &self.categories,
            AttributeCategory::FavoriteColors => &self.colors,
            AttributeCategory::FavoriteStores => &self.brands,
            AttributeCategory::PriceAffinity => &EMPTY_TAGS,
        }
    }

    fn price(&self) -> Option<f64> {
        self.price
    }

    fn price_affinity(&self) -> Option<&PriceAffinity> {
        Some(&self.price_affinity)
    }
}

/// The tag set shared by every [`Matchable`] for categories without tags.
pub fn empty_tags() -> &'static TagSet {
    &EMPTY_TAGS
}
