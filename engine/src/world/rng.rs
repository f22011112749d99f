//! Seeded Random Source
//!
//! Every random decision of the generator goes through [`CityRng`]. It wraps a
//! seeded `StdRng` and exposes the three primitives the generator needs:
//!
//! - [`CityRng::int_between`] - inclusive integer range
//! - [`CityRng::more_or_less`] - `base +/- spread` jitter
//! - [`CityRng::chance`] - percentage roll
//!
//! Buildings and texture classes each draw from their own [`CityRng::fork`], so
//! the result does not depend on the order in which they are generated.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{CityError, Result};

/// Seedable random source used by all generators.
#[derive(Debug, Clone)]
pub struct CityRng {
    seed: u64,
    inner: StdRng,
}

impl CityRng {
    /// Create a random source from an explicit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a random source from OS entropy. The chosen seed is available
    /// through [`CityRng::seed`] so the city can be reproduced later.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    /// Seed this source was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent stream for item `stream`.
    ///
    /// Forking does not consume anything from `self`; two forks with the same
    /// stream id are identical.
    pub fn fork(&self, stream: u64) -> CityRng {
        CityRng::new(mix_seed(self.seed, stream))
    }

    /// Uniform integer in `[min, max]`.
    pub fn int_between(&mut self, min: i32, max: i32) -> Result<i32> {
        if max < min {
            return Err(CityError::invalid(format!(
                "int_between: max ({max}) is lower than min ({min})"
            )));
        }
        Ok(self.inner.gen_range(min..=max))
    }

    /// `base + U(-spread, +spread)`, both bounds inclusive.
    pub fn more_or_less(&mut self, base: i32, spread: i32) -> Result<i32> {
        if spread < 0 {
            return Err(CityError::invalid(format!(
                "more_or_less: negative spread ({spread})"
            )));
        }
        Ok(base + self.inner.gen_range(-spread..=spread))
    }

    /// Returns true with a probability of `percentage / 100`.
    pub fn chance(&mut self, percentage: i32) -> bool {
        self.inner.gen_range(0..100) < percentage
    }

    /// Uniform index in `[0, len)`.
    pub fn index_below(&mut self, len: usize) -> Result<usize> {
        if len == 0 {
            return Err(CityError::invalid("index_below: empty range"));
        }
        Ok(self.inner.gen_range(0..len))
    }

    /// Uniform percentage roll in `[0, 100)`.
    pub fn percent(&mut self) -> i32 {
        self.inner.gen_range(0..100)
    }
}

/// SplitMix64 finalizer over the root seed and the stream id.
fn mix_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_between_inclusive_bounds() {
        let mut rng = CityRng::new(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2000 {
            let v = rng.int_between(3, 6).unwrap();
            assert!((3..=6).contains(&v));
            seen_min |= v == 3;
            seen_max |= v == 6;
        }
        assert!(seen_min && seen_max, "both bounds should be reachable");
    }

    #[test]
    fn test_int_between_single_value() {
        let mut rng = CityRng::new(1);
        assert_eq!(rng.int_between(42, 42).unwrap(), 42);
    }

    #[test]
    fn test_int_between_rejects_inverted_range() {
        let mut rng = CityRng::new(1);
        let err = rng.int_between(10, 5).unwrap_err();
        assert!(matches!(err, CityError::InvalidArgument(_)));
    }

    #[test]
    fn test_more_or_less_range() {
        let mut rng = CityRng::new(99);
        for _ in 0..1000 {
            let v = rng.more_or_less(20, 10).unwrap();
            assert!((10..=30).contains(&v));
        }
        assert_eq!(rng.more_or_less(5, 0).unwrap(), 5);
        assert!(rng.more_or_less(5, -1).is_err());
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = CityRng::new(3);
        for _ in 0..500 {
            assert!(!rng.chance(0));
            assert!(rng.chance(100));
        }
    }

    #[test]
    fn test_index_below_empty() {
        let mut rng = CityRng::new(3);
        assert!(rng.index_below(0).is_err());
        assert!(rng.index_below(5).unwrap() < 5);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = CityRng::new(1234);
        let mut b = CityRng::new(1234);
        for _ in 0..100 {
            assert_eq!(a.int_between(0, 1000).unwrap(), b.int_between(0, 1000).unwrap());
        }
    }

    #[test]
    fn test_forks_are_independent_of_parent_state() {
        let mut parent = CityRng::new(55);
        let before = parent.fork(3);
        let _ = parent.int_between(0, 100).unwrap();
        let after = parent.fork(3);

        let mut a = before;
        let mut b = after;
        assert_eq!(a.int_between(0, 1_000_000).unwrap(), b.int_between(0, 1_000_000).unwrap());
        assert_ne!(mix_seed(55, 3), mix_seed(55, 4));
    }
}
