//! # evorun
//!
//! A seeded evolutionary-algorithm engine. Runs evolve either real-valued
//! vectors or packed bit-strings with proportional, tournament or
//! linear-ranking selection, single-point crossover and per-position
//! mutation, or use the Jaya update rule instead. Many independent runs are
//! summarized by the mean and sample standard deviation of their best values.
//!
//! ```rust
//! use evorun::evolution::{run_collection, RunConfig, SelectionMethod};
//!
//! let config = RunConfig::builder()
//!     .population_size(20)
//!     .num_generations(10)
//!     .master_seed(7)
//!     .num_runs(4)
//!     .selection(SelectionMethod::LinearRanking)
//!     .build()
//!     .unwrap();
//!
//! let result = run_collection(&config).unwrap();
//! assert_eq!(result.runs.len(), 4);
//! ```
pub mod breeding;
pub mod chromosome;
pub mod error;
pub mod evolution;
pub mod fitness;
pub mod phenotype;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use error::{GeneticError, OptionExt, Result};
pub use evolution::{run_collection, RunCollectionResult, RunConfig};
