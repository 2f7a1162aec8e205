#![forbid(unsafe_code)]

//! Random tree contents.

use std::ops::RangeInclusive;

use bstviz_core::Key;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Keys inserted by a random fill when no count is given.
pub const DEFAULT_FILL_COUNT: usize = 15;

/// Range random keys are drawn from.
pub const FILL_KEY_RANGE: RangeInclusive<Key> = 1..=100;

/// Draw `count` keys from [`FILL_KEY_RANGE`]. Repeats are possible; AVL
/// insertion ignores them.
///
/// The same `seed` always yields the same keys. Without one the generator
/// is seeded from the OS.
#[must_use]
pub fn random_keys(count: usize, seed: Option<u64>) -> Vec<Key> {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    (0..count)
        .map(|_| rng.random_range(FILL_KEY_RANGE))
        .collect()
}
