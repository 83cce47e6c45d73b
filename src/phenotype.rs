//! # Phenotype Trait
//!
//! The `Phenotype` trait defines the interface for types that represent individuals
//! in an evolutionary run. It provides the two variation operations an engine
//! applies in place: single-point crossover with a partner and mutation.
//!
//! ## Example
//!
//! ```rust
//! use evorun::breeding::MutationOperator;
//! use evorun::phenotype::Phenotype;
//! use evorun::rng::RandomStream;
//!
//! #[derive(Clone, Debug)]
//! struct Digits {
//!     digits: Vec<u8>,
//! }
//!
//! impl Phenotype for Digits {
//!     fn width(&self) -> usize {
//!         self.digits.len()
//!     }
//!
//!     fn crossover(&mut self, other: &mut Self, point: usize) {
//!         if point < self.digits.len() {
//!             self.digits[point..].swap_with_slice(&mut other.digits[point..]);
//!         }
//!     }
//!
//!     fn mutate(&mut self, mutation: &MutationOperator, rng: &mut RandomStream) {
//!         for digit in self.digits.iter_mut() {
//!             if rng.chance(mutation.get_probability()) {
//!                 *digit = (rng.index(10)) as u8;
//!             }
//!         }
//!     }
//! }
//! ```

use std::fmt::Debug;

use crate::breeding::MutationOperator;
use crate::rng::RandomStream;

/// Trait for types that represent individuals in an evolutionary run.
///
/// Implementors are value types: cloning an individual must produce storage
/// that shares nothing with its source, so selection can copy winners
/// into several slots without aliasing.
pub trait Phenotype: Clone + Debug + Send + Sync {
    /// Number of crossover positions (genes or bits).
    fn width(&self) -> usize;

    /// Exchanges all genetic material from `point` to the end with `other`.
    ///
    /// A `point` at or beyond [`width`](Phenotype::width) leaves both
    /// individuals unchanged.
    fn crossover(&mut self, other: &mut Self, point: usize);

    /// Applies per-position mutation using the provided random stream.
    fn mutate(&mut self, mutation: &MutationOperator, rng: &mut RandomStream);
}
