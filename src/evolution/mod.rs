//! # Evolution
//!
//! Engines that advance a generation, the tracker that drives one seeded run,
//! and the collection that runs every seed of a configuration and summarizes
//! the results.
pub mod collection;
pub mod engine;
pub mod jaya;
pub mod options;
pub mod statistics;
pub mod tracker;

pub use collection::{run_collection, GenerationAverage, RunCollection, RunCollectionResult};
pub use engine::{Engine, GenerationEngine};
pub use jaya::JayaEngine;
pub use options::{
    EngineKind, FitnessKind, Representation, RunConfig, RunConfigBuilder, SelectionMethod,
};
pub use statistics::mean_and_std_dev;
pub use tracker::{BestOfRun, GenerationSnapshot, Improvement, RunResult, RunTracker};
