//! Free-text search over candidate titles, names and bios.

use crate::result::MatchResult;
use crate::traits::ResultFilter;

/// Case-insensitive substring match. A blank query keeps everything.
pub struct SearchQueryFilter {
    needle: String,
}

impl SearchQueryFilter {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
        }
    }
}

impl ResultFilter for SearchQueryFilter {
    fn name(&self) -> &str {
        "SearchQueryFilter"
    }

    fn keep(&self, result: &MatchResult) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        result
            .candidate
            .searchable_text()
            .any(|text| text.to_lowercase().contains(&self.needle))
    }
}
