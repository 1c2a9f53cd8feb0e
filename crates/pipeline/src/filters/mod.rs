//! Filter implementations for the result pipeline.
//!
//! This module contains all the concrete filters that can be composed into
//! a FilterPipeline.

pub mod category;
pub mod price_range;
pub mod search_query;

// Re-export for convenience
pub use category::CategoryFilter;
pub use price_range::PriceRangeFilter;
pub use search_query::SearchQueryFilter;
