//! # Breeding Operators
//!
//! Variation operators applied after selection: single-point crossover over
//! consecutive pairs and per-position mutation.
pub mod crossover;
pub mod mutation;

pub use crossover::CrossoverOperator;
pub use mutation::{MutationOperator, RealMutation};
