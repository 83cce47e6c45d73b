use tracing::warn;

use crate::error::Result;
use crate::fitness::{Direction, Score};
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;
use crate::selection::selection_strategy::{check_inputs, SelectionStrategy};

/// Value forced into the last slot of a cumulative table so that every draw
/// from `[0, 1)` lands somewhere, whatever rounding the running sum suffered.
pub const SENTINEL: f64 = 2.0;

/// Normalizes `weights` into a running cumulative distribution.
///
/// The result has one entry per weight and ends at (approximately) `1.0`.
/// Callers are expected to pass non-negative weights with a positive, finite
/// sum; see [`ProportionalSelection`] for how degenerate inputs are handled.
///
/// ```
/// use evorun::selection::cumulative_table;
///
/// assert_eq!(cumulative_table(&[1.0, 1.0, 2.0]), vec![0.25, 0.5, 1.0]);
/// ```
pub fn cumulative_table(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    weights
        .iter()
        .scan(0.0, |running, w| {
            *running += w / total;
            Some(*running)
        })
        .collect()
}

/// Cumulative table with the sentinel in its last slot, falling back to
/// uniform weights when the distribution cannot be normalized.
pub(crate) fn sampling_table(weights: &[f64], strategy: &'static str) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    let degenerate =
        !total.is_finite() || total <= 0.0 || weights.iter().any(|w| !w.is_finite() || *w < 0.0);

    let mut table = if degenerate {
        warn!(
            strategy = strategy,
            total = total,
            "selection weights cannot be normalized; sampling uniformly"
        );
        cumulative_table(&vec![1.0; weights.len()])
    } else {
        cumulative_table(weights)
    };

    if let Some(last) = table.last_mut() {
        *last = SENTINEL;
    }
    table
}

/// Draws one uniform value and returns the first slot whose entry is `>= u`.
pub(crate) fn spin(table: &[f64], rng: &mut RandomStream) -> usize {
    let u = rng.uniform();
    table
        .iter()
        .position(|&c| c >= u)
        .unwrap_or(table.len().saturating_sub(1))
}

/// Fitness-proportional ("roulette wheel") selection.
///
/// When maximizing, each individual's share is its fitness value. When
/// minimizing, the values are reflected as `(min + max) - fitness` so the
/// smallest value gets the largest share. Penalties are ignored, so this
/// strategy is not offered for knapsack runs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProportionalSelection {
    direction: Direction,
}

impl ProportionalSelection {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Share of each individual before normalization.
    pub fn weights(&self, scores: &[Score]) -> Vec<f64> {
        let values = scores.iter().map(|s| s.value);
        match self.direction {
            Direction::Maximize => values.collect(),
            Direction::Minimize => {
                let (min, max) = values
                    .clone()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                        (lo.min(v), hi.max(v))
                    });
                values.map(|v| (min + max) - v).collect()
            }
        }
    }
}

impl<P> SelectionStrategy<P> for ProportionalSelection
where
    P: Phenotype,
{
    fn select(&self, population: &[P], scores: &[Score], rng: &mut RandomStream) -> Result<Vec<P>> {
        check_inputs(population, scores)?;

        let table = sampling_table(&self.weights(scores), "proportional");
        Ok((0..population.len())
            .map(|_| population[spin(&table, rng)].clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::RealVector;
    use crate::error::GeneticError;

    fn population(values: &[f64]) -> Vec<RealVector> {
        values.iter().map(|&v| RealVector::new(vec![v])).collect()
    }

    #[test]
    fn test_cumulative_table_and_sentinel() {
        assert_eq!(cumulative_table(&[1.0, 1.0, 2.0]), vec![0.25, 0.5, 1.0]);
        assert_eq!(
            sampling_table(&[1.0, 1.0, 2.0], "test"),
            vec![0.25, 0.5, SENTINEL]
        );
    }

    #[test]
    fn test_minimize_weights_are_reflected() {
        let selection = ProportionalSelection::new(Direction::Minimize);
        let scores = vec![Score::new(1.0), Score::new(2.0), Score::new(5.0)];
        assert_eq!(selection.weights(&scores), vec![5.0, 4.0, 1.0]);

        let selection = ProportionalSelection::new(Direction::Maximize);
        assert_eq!(selection.weights(&scores), vec![1.0, 2.0, 5.0]);
    }

    #[test]
    fn test_identical_zero_fitness_falls_back_to_uniform() {
        let table = sampling_table(&[0.0, 0.0, 0.0, 0.0], "test");
        assert_eq!(table, vec![0.25, 0.5, 0.75, SENTINEL]);

        let selection = ProportionalSelection::new(Direction::Maximize);
        let pop = population(&[0.0, 0.0, 0.0, 0.0]);
        let scores = vec![Score::new(0.0); 4];
        let mut rng = RandomStream::from_seed(11);
        let next = selection.select(&pop, &scores, &mut rng).unwrap();
        assert_eq!(next.len(), 4);
    }

    #[test]
    fn test_zero_weight_never_selected() {
        let selection = ProportionalSelection::new(Direction::Maximize);
        let pop = population(&[1.0, 2.0, 3.0]);
        let scores = vec![Score::new(0.0), Score::new(3.0), Score::new(1.0)];
        let mut rng = RandomStream::from_seed(9);
        for _ in 0..50 {
            let next = selection.select(&pop, &scores, &mut rng).unwrap();
            assert_eq!(next.len(), 3);
            assert!(next.iter().all(|c| c.genes()[0] != 1.0));
        }
    }

    #[test]
    fn test_spin_picks_first_entry_at_or_above_draw() {
        let table = vec![0.0, 0.0, SENTINEL];
        let mut rng = RandomStream::from_seed(1);
        for _ in 0..20 {
            assert_eq!(spin(&table, &mut rng), 2);
        }
    }

    #[test]
    fn test_input_validation() {
        let selection = ProportionalSelection::new(Direction::Maximize);
        let mut rng = RandomStream::from_seed(1);
        let empty: Vec<RealVector> = Vec::new();
        assert_eq!(
            selection.select(&empty, &[], &mut rng).unwrap_err(),
            GeneticError::EmptyPopulation
        );
        let result = selection.select(&population(&[1.0, 2.0]), &[Score::new(1.0)], &mut rng);
        assert!(matches!(result, Err(GeneticError::Selection(_))));
    }
}
