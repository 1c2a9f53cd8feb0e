//! Read interface between the engine and whatever stores profiles and
//! candidates.
//!
//! The engine never talks to a state store directly. Callers hand it a
//! provider, and tests or demos can swap in an in-memory one.

use crate::error::Result;
use crate::types::{Candidate, CandidateKind, Profile};

/// Narrow read access to profiles and candidate pools.
///
/// `Send + Sync` so one provider can serve concurrent ranking requests.
pub trait CatalogProvider: Send + Sync {
    /// Fetch a profile by id.
    fn get_profile(&self, id: &str) -> Result<Profile>;

    /// Fetch a fresh, fully materialized candidate pool.
    fn get_candidate_pool(&self, kind: CandidateKind) -> Result<Vec<Candidate>>;

    /// All profiles of the account, in a stable order.
    fn profiles(&self) -> Vec<Profile>;
}
