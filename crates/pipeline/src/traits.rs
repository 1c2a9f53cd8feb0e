//! Core traits for the filter stage.
//!
//! Filters run strictly after ranking. They may only drop results, never
//! reorder them, so a list keeps the same relative order whichever filters
//! are active.

use crate::result::MatchResult;

/// A hard constraint on ranked results.
///
/// ## Design Note
/// - `Send + Sync` so a pipeline can be shared across concurrent requests
/// - Implementors decide per result in [`ResultFilter::keep`]; the provided
///   [`ResultFilter::apply`] uses `retain`, which preserves order
pub trait ResultFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether `result` satisfies the constraint.
    fn keep(&self, result: &MatchResult) -> bool;

    /// Apply this filter to a ranked list (takes ownership).
    fn apply(&self, mut results: Vec<MatchResult>) -> Vec<MatchResult> {
        results.retain(|result| self.keep(result));
        results
    }
}
