//! Attribute vectorizer.
//!
//! Turns the free-form tag input collected by profile forms and candidate
//! feeds into a canonical [`TagSet`]:
//! - `"Casual, Sporty, Classic"` and `["Casual", "Sporty", "Classic"]` produce
//!   the same set
//! - entries are trimmed and internal whitespace is collapsed
//! - comparison is case-insensitive, display keeps the first-seen casing
//! - empty entries and missing (`null`) input yield nothing, never an error
//! - values of the wrong JSON type (numbers, objects, non-string list items)
//!   are dropped the same way

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Raw tag input as it arrives from a form field or a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTags {
    /// A single comma-separated string.
    Joined(String),
    /// An already-split list. `null` entries are tolerated and dropped.
    List(Vec<Option<String>>),
}

impl From<&str> for RawTags {
    fn from(value: &str) -> Self {
        RawTags::Joined(value.to_string())
    }
}

impl From<String> for RawTags {
    fn from(value: String) -> Self {
        RawTags::Joined(value)
    }
}

impl From<Vec<String>> for RawTags {
    fn from(value: Vec<String>) -> Self {
        RawTags::List(value.into_iter().map(Some).collect())
    }
}

impl From<&[&str]> for RawTags {
    fn from(value: &[&str]) -> Self {
        RawTags::List(value.iter().map(|s| Some(s.to_string())).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RawTags {
    fn from(value: [&str; N]) -> Self {
        RawTags::List(value.iter().map(|s| Some(s.to_string())).collect())
    }
}

/// Tag field as found in a JSON document. Anything that is neither a string
/// nor a list deserializes as `Other`.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireTags {
    Joined(String),
    List(Vec<WireTag>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTag {
    Tag(String),
    Other(IgnoredAny),
}

impl From<WireTags> for RawTags {
    fn from(value: WireTags) -> Self {
        match value {
            WireTags::Joined(joined) => RawTags::Joined(joined),
            WireTags::List(items) => RawTags::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        WireTag::Tag(tag) => Some(tag),
                        WireTag::Other(_) => None,
                    })
                    .collect(),
            ),
            WireTags::Other(_) => RawTags::List(Vec::new()),
        }
    }
}

impl<'de> Deserialize<'de> for RawTags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        WireTags::deserialize(deserializer).map(RawTags::from)
    }
}

/// Normalize raw tag input into a [`TagSet`].
pub fn vectorize(raw: impl Into<RawTags>) -> TagSet {
    let mut set = TagSet::new();
    match raw.into() {
        RawTags::Joined(joined) => set.extend_joined(&joined),
        RawTags::List(items) => {
            for item in items.iter().flatten() {
                set.extend_joined(item);
            }
        }
    }
    set
}

/// Canonical form of a single tag: `(comparison key, display form)`.
///
/// Returns `None` for empty or whitespace-only input.
pub fn normalize_tag(raw: &str) -> Option<(String, String)> {
    let display = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if display.is_empty() {
        return None;
    }
    Some((display.to_lowercase(), display))
}

/// Deduplicated, case-insensitive set of tags.
///
/// Keys are kept in a `BTreeMap` so iteration order (and therefore every
/// derived list such as matched attributes) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    entries: BTreeMap<String, String>,
}

impl TagSet {
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert one tag. Returns `true` if the tag was not present yet.
    ///
    /// The display form of an existing tag is never overwritten.
    pub fn insert(&mut self, raw: &str) -> bool {
        match normalize_tag(raw) {
            Some((key, display)) => {
                if self.entries.contains_key(&key) {
                    false
                } else {
                    self.entries.insert(key, display);
                    true
                }
            }
            None => false,
        }
    }

    fn extend_joined(&mut self, joined: &str) {
        for part in joined.split(',') {
            self.insert(part);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, raw: &str) -> bool {
        normalize_tag(raw)
            .map(|(key, _)| self.entries.contains_key(&key))
            .unwrap_or(false)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Comparison keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Display forms, ordered by comparison key.
    pub fn display_values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn display(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// `|self ∩ other|`
    pub fn intersection_count(&self, other: &TagSet) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.keys().filter(|k| large.contains_key(k)).count()
    }

    /// `|self ∪ other|`
    pub fn union_count(&self, other: &TagSet) -> usize {
        self.len() + other.len() - self.intersection_count(other)
    }

    /// Display forms (from `self`) of every tag also present in `other`.
    pub fn intersection_display(&self, other: &TagSet) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(key, _)| other.contains_key(key))
            .map(|(_, display)| display.clone())
            .collect()
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawTags>::deserialize(deserializer)?;
        Ok(raw.map(vectorize).unwrap_or_default())
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.display_values())
    }
}
