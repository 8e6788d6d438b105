//! Input-array builders for the kind distributions under test.

use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use strum::Display;
use typecase::kind::{KindId, Registry};
use typecase::shape::Shape;

/// How kinds are spread over the input array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Distribution {
    /// Kind `i % N` at slot `i`: every kind recurs with period N.
    Sequential,
    /// Uniformly random kinds, deterministic per seed.
    Random,
    /// One kind, everywhere: the monomorphic fast path.
    Repetitive,
}

/// Builds the input array for one distribution.
///
/// `seed` drives the RNG for [`Distribution::Random`] and picks the repeated
/// kind for [`Distribution::Repetitive`]; [`Distribution::Sequential`]
/// ignores it.
pub fn build_values(
    registry: &Registry,
    distribution: Distribution,
    len: usize,
    seed: u64,
) -> Vec<Box<dyn Shape>> {
    let n = registry.len() as u32;
    match distribution {
        Distribution::Sequential => (0..len)
            .map(|i| registry.make_value(KindId(i as u32 % n)))
            .collect(),
        Distribution::Random => {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            (0..len)
                .map(|_| registry.make_value(KindId(rng.random_range(0..n))))
                .collect()
        }
        Distribution::Repetitive => {
            let k = KindId((seed % u64::from(n)) as u32);
            (0..len).map(|_| registry.make_value(k)).collect()
        }
    }
}
