//! # RandomStream
//!
//! The `RandomStream` struct is the single source of randomness for a run. Every
//! operator receives it explicitly, so a run is fully determined by its seed and
//! the order in which operators draw from it.
//!
//! ## Example
//!
//! ```rust
//! use evorun::rng::RandomStream;
//!
//! let mut first = RandomStream::from_seed(42);
//! let mut second = RandomStream::from_seed(42);
//!
//! assert_eq!(first.uniform(), second.uniform());
//! assert!(first.index(10) < 10);
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};

/// A wrapper around the `rand` crate's `StdRng` exposing the draws the
/// evolutionary operators need.
#[derive(Clone, Debug)]
pub struct RandomStream {
    rng: StdRng,
}

impl RandomStream {
    /// Creates a new `RandomStream` seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomStream` with a specific seed.
    ///
    /// Two streams built from the same seed produce the same sequence of draws.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a real number uniformly from `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws a real number uniformly from `[from, to)` as `from + (to - from) * u`.
    pub fn uniform_range(&mut self, from: f64, to: f64) -> f64 {
        from + (to - from) * self.uniform()
    }

    /// Returns `true` with probability `p`, drawing exactly one uniform value.
    pub fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    /// Draws an index uniformly from `0..len`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Draws an integer uniformly from the inclusive range `lo..=hi`.
    pub fn int_range(&mut self, lo: u64, hi: u64) -> u64 {
        self.rng.gen_range(lo..=hi)
    }
}

impl Default for RandomStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives `count` run seeds in `1..=999` from a single master seed.
///
/// The same master seed always yields the same list, so one number is enough
/// to reproduce a whole collection of runs.
pub fn derive_seeds(master_seed: u64, count: usize) -> Vec<u64> {
    let mut stream = RandomStream::from_seed(master_seed);
    (0..count).map(|_| stream.int_range(1, 999)).collect()
}
