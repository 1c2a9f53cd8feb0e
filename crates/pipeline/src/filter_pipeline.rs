//! The FilterPipeline orchestrates multiple filters.
//!
//! Filters combine with logical AND: each one narrows the output of the
//! previous one. Because every filter only drops results, the pipeline is
//! order-preserving and idempotent.

use crate::controls::Filters;
use crate::filters::{CategoryFilter, PriceRangeFilter, SearchQueryFilter};
use crate::result::MatchResult;
use crate::traits::ResultFilter;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(PriceRangeFilter::new(PriceRange::new(0.0, 100.0)))
///     .add_filter(SearchQueryFilter::new("linen"));
///
/// let filtered = pipeline.apply(ranked);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn ResultFilter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Build the pipeline for a set of user filters. Unconstrained filters
    /// (no range, no categories, blank query) are not added at all.
    pub fn from_filters(filters: &Filters) -> Self {
        let mut pipeline = FilterPipeline::new();
        if let Some(range) = filters.price_range {
            pipeline = pipeline.add_filter(PriceRangeFilter::new(range));
        }
        if !filters.categories.is_empty() {
            pipeline = pipeline.add_filter(CategoryFilter::new(filters.categories.clone()));
        }
        if !filters.search_query.trim().is_empty() {
            pipeline = pipeline.add_filter(SearchQueryFilter::new(&filters.search_query));
        }
        pipeline
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl ResultFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence.
    pub fn apply(&self, results: Vec<MatchResult>) -> Vec<MatchResult> {
        let mut current = results;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply user filters to a ranked list.
pub fn filter(results: Vec<MatchResult>, filters: &Filters) -> Vec<MatchResult> {
    FilterPipeline::from_filters(filters).apply(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::result;
    use catalog::Candidate;

    fn ranked() -> Vec<MatchResult> {
        vec![
            result(
                Candidate::product("a", "Linen Throw")
                    .with_price(79.0)
                    .with_categories("Home Decor"),
                0.9,
            ),
            result(
                Candidate::product("b", "Oak Lamp")
                    .with_price(249.99)
                    .with_categories("Home Decor"),
                0.8,
            ),
            result(
                Candidate::product("c", "Linen Shirt")
                    .with_price(60.0)
                    .with_categories("Clothing"),
                0.7,
            ),
        ]
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::from_filters(&Filters::new());
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply(ranked()).len(), 3);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let filters = Filters::new()
            .with_price_range(0.0, 100.0)
            .with_categories("home decor")
            .with_search_query("linen");
        let pipeline = FilterPipeline::from_filters(&filters);
        assert_eq!(pipeline.len(), 3);

        let filtered = pipeline.apply(ranked());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id(), "a");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filters = Filters::new().with_price_range(0.0, 100.0);
        let once = filter(ranked(), &filters);
        let twice = filter(once.clone(), &filters);
        assert_eq!(once, twice);
    }
}
