//! Seeded random number generator creation.
//!
//! Every stochastic operation in this crate takes an explicit `&mut R: Rng`;
//! this is the one place a generator gets built.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// Create a random number generator, optionally seeded for reproducibility.
/// Without a seed the generator is initialized from OS entropy.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}
