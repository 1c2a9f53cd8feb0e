//! Filter to keep only candidates in at least one selected category.

use crate::result::MatchResult;
use crate::traits::ResultFilter;
use matching::{AttributeCategory, Matchable, TagSet};

/// Keeps results whose categories intersect the selection
/// (case-insensitive). An empty selection keeps everything.
pub struct CategoryFilter {
    categories: TagSet,
}

impl CategoryFilter {
    pub fn new(categories: TagSet) -> Self {
        Self { categories }
    }
}

impl ResultFilter for CategoryFilter {
    fn name(&self) -> &str {
        "CategoryFilter"
    }

    fn keep(&self, result: &MatchResult) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        result
            .candidate
            .tags(AttributeCategory::FavoriteCategories)
            .intersection_count(&self.categories)
            > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::result;
    use catalog::Candidate;
    use matching::vectorize;

    fn results() -> Vec<MatchResult> {
        vec![
            result(Candidate::product("a", "Sneaker").with_categories("Shoes"), 0.9),
            result(Candidate::product("b", "Lamp").with_categories("Home Decor, Lighting"), 0.8),
            result(Candidate::product("c", "Mystery box"), 0.7),
        ]
    }

    #[test]
    fn test_category_filter_matches_any() {
        let filter = CategoryFilter::new(vectorize("lighting, SHOES"));
        let ids: Vec<_> = filter.apply(results()).iter().map(|r| r.id().clone()).collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_empty_selection_is_no_constraint() {
        let filter = CategoryFilter::new(TagSet::new());
        assert_eq!(filter.apply(results()).len(), 3);
    }
}
