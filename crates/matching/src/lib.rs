//! # Matching Crate
//!
//! Profile-to-candidate similarity for the style match engine.
//!
//! ## Components
//!
//! - **tags**: the attribute vectorizer (`vectorize`, `TagSet`)
//! - **vectors**: attribute categories, price ranges and the `Matchable`
//!   trait implemented by profiles and candidates
//! - **weights**: per-category weights (`CategoryWeights`)
//! - **scorer**: weighted overlap scoring (`SimilarityScorer`)
//! - **novelty**: seeded per-candidate novelty values for re-ranking
//! - **reasons**: human-readable "why we recommend this" strings
//!
//! ## Example Usage
//!
//! ```
//! use matching::{vectorize, AttributeVectors, SimilarityScorer};
//!
//! let profile = AttributeVectors {
//!     style: vectorize("Minimalist, Modern"),
//!     ..Default::default()
//! };
//! let candidate = AttributeVectors {
//!     style: vectorize(["minimalist"]),
//!     ..Default::default()
//! };
//!
//! let breakdown = SimilarityScorer::default().score(&profile, &candidate);
//! assert!(breakdown.score > 0.0);
//! ```
//!
//! Everything here is pure: no I/O, no shared state, no randomness beyond
//! the explicitly seeded novelty factor.

pub mod novelty;
pub mod reasons;
pub mod scorer;
pub mod tags;
pub mod vectors;
pub mod weights;

pub use novelty::{next_seed, novelty_factor};
pub use reasons::explain;
pub use scorer::{MatchedAttributes, ScoreBreakdown, SimilarityScorer, attribute_similarity, overlap};
pub use tags::{RawTags, TagSet, normalize_tag, vectorize};
pub use vectors::{AttributeCategory, AttributeVectors, Matchable, PriceAffinity, PriceRange, empty_tags};
pub use weights::CategoryWeights;
