//! Seeded novelty factor.
//!
//! Replaces an opaque shuffle with a value that is stable for a given
//! `(seed, candidate id)` pair: the same seed reproduces the same order,
//! a new seed (an explicit refresh) produces a different one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the id bytes. Stable across processes and platforms.
fn id_hash(id: &str) -> u64 {
    id.bytes()
        .fold(FNV_OFFSET, |hash, byte| (hash ^ byte as u64).wrapping_mul(FNV_PRIME))
}

/// Pseudo-random value in `[0, 1)` for a candidate under a session seed.
pub fn novelty_factor(seed: u64, candidate_id: &str) -> f64 {
    let mut rng = StdRng::seed_from_u64(seed ^ id_hash(candidate_id));
    rng.random::<f64>()
}

/// Derive the seed for the next refresh (SplitMix64 step).
pub fn next_seed(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
