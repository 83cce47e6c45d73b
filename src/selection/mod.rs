//! # Selection
//!
//! Strategies that turn a scored generation into a same-size replacement
//! generation: fitness-proportional sampling, binary tournaments and linear
//! ranking. All three judge quality through [`crate::fitness::compare`] or the
//! configured direction, so penalised knapsack scores are handled uniformly.
pub mod proportional;
pub mod rank;
pub mod selection_strategy;
pub mod tournament;

pub use proportional::{cumulative_table, ProportionalSelection, SENTINEL};
pub use rank::LinearRankingSelection;
pub use selection_strategy::SelectionStrategy;
pub use tournament::TournamentSelection;
