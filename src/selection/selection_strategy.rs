use std::fmt::Debug;

use crate::error::{GeneticError, Result};
use crate::fitness::Score;
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;

/// Trait for selection strategies in evolutionary runs.
///
/// A strategy consumes one generation together with its scores and produces a
/// replacement generation of the same size. Winners are cloned into their
/// slots, so the same individual may occupy several of them.
///
/// # Examples
///
/// ```
/// use evorun::chromosome::RealVector;
/// use evorun::fitness::{Direction, Score};
/// use evorun::rng::RandomStream;
/// use evorun::selection::{SelectionStrategy, TournamentSelection};
///
/// let population = vec![
///     RealVector::new(vec![1.0]),
///     RealVector::new(vec![2.0]),
///     RealVector::new(vec![3.0]),
/// ];
/// let scores = vec![Score::new(1.0), Score::new(4.0), Score::new(9.0)];
/// let mut rng = RandomStream::from_seed(5);
///
/// let selection = TournamentSelection::new(Direction::Minimize);
/// let next = selection.select(&population, &scores, &mut rng).unwrap();
/// assert_eq!(next.len(), 3);
/// ```
pub trait SelectionStrategy<P>: Debug + Send + Sync
where
    P: Phenotype,
{
    /// Builds the next generation from `population`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyPopulation` if `population` is empty and
    /// `GeneticError::Selection` if `scores` does not have one entry per
    /// individual.
    fn select(&self, population: &[P], scores: &[Score], rng: &mut RandomStream) -> Result<Vec<P>>;
}

pub(crate) fn check_inputs<P>(population: &[P], scores: &[Score]) -> Result<()> {
    if population.is_empty() {
        return Err(GeneticError::EmptyPopulation);
    }
    if scores.len() != population.len() {
        return Err(GeneticError::Selection(format!(
            "Score count ({}) doesn't match population size ({})",
            scores.len(),
            population.len()
        )));
    }
    Ok(())
}
