//! Core domain types: shopping profiles and recommendation candidates.
//!
//! Profiles and candidates both implement [`Matchable`], so the scorer can
//! compare a profile against either people ("style twins") or products.

use matching::{AttributeCategory, Matchable, PriceAffinity, RawTags, TagSet, empty_tags, vectorize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a shopping profile, unique within the owning account
pub type ProfileId = String;

/// Identifier of a candidate (a product or another user)
pub type CandidateId = String;

// =============================================================================
// Profile
// =============================================================================

/// Who a shopping profile shops for.
///
/// Unknown strings deserialize to `Other` rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Relationship {
    #[default]
    Own,
    Spouse,
    Child,
    Parent,
    Friend,
    Other,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Own => "self",
            Relationship::Spouse => "spouse",
            Relationship::Child => "child",
            Relationship::Parent => "parent",
            Relationship::Friend => "friend",
            Relationship::Other => "other",
        }
    }
}

impl From<String> for Relationship {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "self" | "me" => Relationship::Own,
            "spouse" | "partner" => Relationship::Spouse,
            "child" => Relationship::Child,
            "parent" => Relationship::Parent,
            "friend" => Relationship::Friend,
            _ => Relationship::Other,
        }
    }
}

impl From<Relationship> for String {
    fn from(value: Relationship) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shopping persona.
///
/// The engine only ever reads profiles; edits happen in the forms that own
/// them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relationship: Relationship,
    #[serde(default)]
    pub interests: TagSet,
    #[serde(default)]
    pub style_preferences: TagSet,
    #[serde(default)]
    pub favorite_colors: TagSet,
    #[serde(default)]
    pub favorite_categories: TagSet,
    #[serde(default)]
    pub favorite_stores: TagSet,
    #[serde(default)]
    pub price_affinity: PriceAffinity,
}

impl Profile {
    pub fn new(id: impl Into<ProfileId>, name: impl Into<String>, relationship: Relationship) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            relationship,
            ..Default::default()
        }
    }

    pub fn with_interests(mut self, raw: impl Into<RawTags>) -> Self {
        self.interests = vectorize(raw);
        self
    }

    pub fn with_style_preferences(mut self, raw: impl Into<RawTags>) -> Self {
        self.style_preferences = vectorize(raw);
        self
    }

    pub fn with_favorite_colors(mut self, raw: impl Into<RawTags>) -> Self {
        self.favorite_colors = vectorize(raw);
        self
    }

    pub fn with_favorite_categories(mut self, raw: impl Into<RawTags>) -> Self {
        self.favorite_categories = vectorize(raw);
        self
    }

    pub fn with_favorite_stores(mut self, raw: impl Into<RawTags>) -> Self {
        self.favorite_stores = vectorize(raw);
        self
    }

    pub fn with_price_affinity(mut self, affinity: PriceAffinity) -> Self {
        self.price_affinity = affinity;
        self
    }

    /// True when every tag category and the budget are empty.
    pub fn is_blank(&self) -> bool {
        AttributeCategory::TAGGED
            .iter()
            .all(|&category| self.tags(category).is_empty())
            && self.price_affinity.is_empty()
    }
}

impl Matchable for Profile {
    fn tags(&self, category: AttributeCategory) -> &TagSet {
        match category {
            AttributeCategory::StylePreferences => &self.style_preferences,
            AttributeCategory::Interests => &self.interests,
            AttributeCategory::FavoriteCategories => &self.favorite_categories,
            AttributeCategory::FavoriteColors => &self.favorite_colors,
            AttributeCategory::FavoriteStores => &self.favorite_stores,
            AttributeCategory::PriceAffinity => empty_tags(),
        }
    }

    fn price_affinity(&self) -> Option<&PriceAffinity> {
        Some(&self.price_affinity)
    }
}

// =============================================================================
// Candidate
// =============================================================================

/// Which pool a candidate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    #[default]
    Product,
    Person,
}

impl CandidateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateKind::Product => "product",
            CandidateKind::Person => "person",
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "product" | "products" => Ok(CandidateKind::Product),
            "person" | "people" | "twins" => Ok(CandidateKind::Person),
            other => Err(format!("unknown candidate kind: {}", other)),
        }
    }
}

/// A product a person candidate recently bought or saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentProduct {
    pub title: String,
    #[serde(default)]
    pub price: Option<f64>,
}

/// What cards render. Never scored, only filtered on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayAttributes {
    /// Product title or person's name
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub recent_products: Vec<RecentProduct>,
}

/// Tag sets compared against a profile. Mirrors the profile's categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchableAttributes {
    #[serde(default, alias = "stylePreferences")]
    pub style_traits: TagSet,
    #[serde(default)]
    pub interests: TagSet,
    #[serde(default, alias = "favoriteCategories")]
    pub categories: TagSet,
    #[serde(default, alias = "favoriteColors")]
    pub colors: TagSet,
    #[serde(default, alias = "favoriteStores")]
    pub brands: TagSet,
}

/// Another user or a product, supplied fresh with every ranking request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(default)]
    pub kind: CandidateKind,
    #[serde(rename = "displayAttributes")]
    pub display: DisplayAttributes,
    #[serde(default, rename = "matchableAttributes")]
    pub attributes: MatchableAttributes,
    /// Flagged by the trending feed; boosted in trending discovery mode
    #[serde(default)]
    pub trending: bool,
}

impl Candidate {
    pub fn new(id: impl Into<CandidateId>, kind: CandidateKind, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            display: DisplayAttributes {
                title: title.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn product(id: impl Into<CandidateId>, title: impl Into<String>) -> Self {
        Self::new(id, CandidateKind::Product, title)
    }

    pub fn person(id: impl Into<CandidateId>, name: impl Into<String>) -> Self {
        Self::new(id, CandidateKind::Person, name)
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.display.price = Some(price);
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.display.bio = Some(bio.into());
        self
    }

    pub fn with_recent_product(mut self, title: impl Into<String>, price: Option<f64>) -> Self {
        self.display.recent_products.push(RecentProduct {
            title: title.into(),
            price,
        });
        self
    }

    pub fn with_style_traits(mut self, raw: impl Into<RawTags>) -> Self {
        self.attributes.style_traits = vectorize(raw);
        self
    }

    pub fn with_interests(mut self, raw: impl Into<RawTags>) -> Self {
        self.attributes.interests = vectorize(raw);
        self
    }

    pub fn with_categories(mut self, raw: impl Into<RawTags>) -> Self {
        self.attributes.categories = vectorize(raw);
        self
    }

    pub fn with_colors(mut self, raw: impl Into<RawTags>) -> Self {
        self.attributes.colors = vectorize(raw);
        self
    }

    pub fn with_brands(mut self, raw: impl Into<RawTags>) -> Self {
        self.attributes.brands = vectorize(raw);
        self
    }

    pub fn trending(mut self) -> Self {
        self.trending = true;
        self
    }

    /// Every known price: the candidate's own, then each recent product's.
    pub fn prices(&self) -> Vec<f64> {
        self.display
            .price
            .into_iter()
            .chain(self.display.recent_products.iter().filter_map(|p| p.price))
            .collect()
    }

    /// Fields free-text search looks at.
    pub fn searchable_text(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.display.title.as_str()).chain(self.display.bio.as_deref())
    }
}

impl Matchable for Candidate {
    fn tags(&self, category: AttributeCategory) -> &TagSet {
        match category {
            AttributeCategory::StylePreferences => &self.attributes.style_traits,
            AttributeCategory::Interests => &self.attributes.interests,
            AttributeCategory::FavoriteCategories => &self.attributes.categories,
            AttributeCategory::FavoriteColors => &self.attributes.colors,
            AttributeCategory::FavoriteStores => &self.attributes.brands,
            AttributeCategory::PriceAffinity => empty_tags(),
        }
    }

    fn price(&self) -> Option<f64> {
        self.display.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_parsing_is_lenient() {
        assert_eq!(Relationship::from("Self".to_string()), Relationship::Own);
        assert_eq!(Relationship::from(" spouse ".to_string()), Relationship::Spouse);
        assert_eq!(Relationship::from("grandma".to_string()), Relationship::Other);
    }

    #[test]
    fn test_profile_deserializes_from_form_json() {
        let json = r#"{
            "id": "p1",
            "name": "Me",
            "relationship": "self",
            "stylePreferences": "Minimalist, Modern",
            "favoriteColors": ["Black", "White"],
            "interests": null,
            "priceAffinity": {"Shoes": {"min": 50, "max": 150}}
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.relationship, Relationship::Own);
        assert_eq!(profile.style_preferences.len(), 2);
        assert!(profile.favorite_colors.contains("black"));
        assert!(profile.interests.is_empty());
        assert!(profile.favorite_stores.is_empty());
        assert!(profile.price_affinity.get("shoes").is_some());
    }

    #[test]
    fn test_candidate_deserializes_with_aliases() {
        let json = r#"{
            "id": "twin-1",
            "kind": "person",
            "displayAttributes": {"name": "Ava", "bio": "Capsule wardrobe fan"},
            "matchableAttributes": {"styleTraits": ["Minimalist"], "favoriteColors": "Black"}
        }"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();

        assert_eq!(candidate.kind, CandidateKind::Person);
        assert_eq!(candidate.display.title, "Ava");
        assert!(candidate.tags(AttributeCategory::FavoriteColors).contains("Black"));
        assert!(!candidate.trending);
    }

    #[test]
    fn test_prices_include_recent_products() {
        let twin = Candidate::person("t1", "Ava")
            .with_recent_product("Tote", Some(40.0))
            .with_recent_product("Scarf", None)
            .with_recent_product("Boots", Some(180.0));
        assert_eq!(twin.prices(), vec![40.0, 180.0]);

        let lamp = Candidate::product("p1", "Lamp").with_price(89.0);
        assert_eq!(lamp.prices(), vec![89.0]);
    }

    #[test]
    fn test_blank_profile() {
        assert!(Profile::new("p", "Blank", Relationship::Other).is_blank());
        assert!(!Profile::new("p", "Me", Relationship::Own)
            .with_interests("Yoga")
            .is_blank());
    }

    #[test]
    fn test_candidate_kind_from_str() {
        assert_eq!("people".parse::<CandidateKind>(), Ok(CandidateKind::Person));
        assert_eq!("Products".parse::<CandidateKind>(), Ok(CandidateKind::Product));
        assert!("cars".parse::<CandidateKind>().is_err());
    }
}
