//! Random number generator construction
//!
//! Every stochastic routine in the workspace takes `&mut impl Rng`; this is
//! the single place where a generator is created from a caller seed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator type used by the orchestration layer
pub type ImputeRng = ChaCha8Rng;

/// Seeded generator when `seed` is given, fresh OS entropy otherwise
pub fn seeded_rng(seed: Option<u64>) -> ImputeRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
