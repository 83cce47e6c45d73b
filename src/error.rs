//! # Error Types
//!
//! This module defines the error type shared by every operation in the crate.
//! Configuration problems are reported before any run starts; the remaining
//! variants cover failures that can surface while a run is in progress.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use evorun::error::{GeneticError, Result};
//!
//! fn check_population(size: usize) -> Result<()> {
//!     if size == 0 {
//!         return Err(GeneticError::Configuration(
//!             "Population size cannot be zero".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_population(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use evorun::error::{GeneticError, OptionExt};
//!
//! fn first_score(scores: &[f64]) -> evorun::error::Result<f64> {
//!     scores.first().copied().ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert!(first_score(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or executing runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneticError {
    /// An invalid configuration was supplied. Always raised before a run starts.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operator received a generation with no individuals.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A fitness evaluator produced a value that cannot be compared.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// A selection strategy received inconsistent inputs.
    #[error("Selection error: {0}")]
    Selection(String),
}

/// A specialized Result type for evolutionary operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
