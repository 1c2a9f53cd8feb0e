//! Filter to keep only candidates inside a price range.
//!
//! Products are judged on their own price. People are judged on every
//! recent product they show, so a style twin only passes when all of their
//! representative items are affordable.

use crate::result::MatchResult;
use crate::traits::ResultFilter;
use matching::PriceRange;

/// Removes results priced outside `[min, max]` (inclusive).
///
/// ## Algorithm
/// 1. Collect every known price of the candidate
/// 2. No price information: keep (the constraint cannot be evaluated)
/// 3. Otherwise keep only if all prices fall inside the range
pub struct PriceRangeFilter {
    range: PriceRange,
}

impl PriceRangeFilter {
    /// Bounds given in the wrong order are swapped.
    pub fn new(range: PriceRange) -> Self {
        Self {
            range: range.normalized(),
        }
    }
}

impl ResultFilter for PriceRangeFilter {
    fn name(&self) -> &str {
        "PriceRangeFilter"
    }

    fn keep(&self, result: &MatchResult) -> bool {
        result
            .candidate
            .prices()
            .into_iter()
            .all(|price| self.range.contains(price))
    }
}
