//! Ranking pipeline for style-matched discovery.
//!
//! This crate provides:
//! - [`Ranker`]: scores a candidate pool against a profile, blends in
//!   seeded novelty and applies the discovery mode
//! - [`ResultFilter`] and its implementations for post-ranking filters
//! - [`FilterPipeline`] for composing filters
//! - [`RefreshController`] for "refresh matches" with shown-candidate decay
//!
//! ## Architecture
//! A request is processed in stages:
//! 1. Every candidate is scored by the matching crate's similarity scorer
//! 2. The ranker turns scores into adjusted scores and orders the pool
//! 3. Filters drop results that violate the user's hard constraints
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{Ranker, RankingControls, RankingRequest, DiscoveryMode, Filters};
//!
//! let controls = RankingControls::new()
//!     .with_personalization(80.0)
//!     .with_mode(DiscoveryMode::Diverse)
//!     .with_filters(Filters::new().with_price_range(0.0, 100.0));
//!
//! let results = Ranker::default().execute(&RankingRequest::new(&profile, &pool, &controls));
//! ```

pub mod controls;
pub mod filter_pipeline;
pub mod filters;
pub mod ranking;
pub mod refresh;
pub mod result;
pub mod traits;

// Re-export main types
pub use controls::{DiscoveryMode, Filters, PersonalizationLevel, RankingControls, RankingRequest};
pub use filter_pipeline::{FilterPipeline, filter};
pub use ranking::{Ranker, rank};
pub use refresh::{RefreshController, RefreshOutcome, ShownHistory};
pub use result::{MatchResult, ranking_order};
pub use traits::ResultFilter;
