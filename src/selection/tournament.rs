use crate::error::Result;
use crate::fitness::{compare, Direction, Score};
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;
use crate::selection::selection_strategy::{check_inputs, SelectionStrategy};

use std::cmp::Ordering;

/// Binary tournament selection.
///
/// For every slot two distinct contestants are drawn uniformly (the second is
/// redrawn while it equals the first) and the better one is copied in. Quality
/// is judged with [`compare`], so penalised scores follow the feasibility rule.
/// A tie goes to the second contestant.
///
/// A generation with a single individual is copied as is.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TournamentSelection {
    direction: Direction,
}

impl TournamentSelection {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Runs a single tournament and returns the index of the winner.
    fn run_tournament(&self, scores: &[Score], rng: &mut RandomStream) -> usize {
        let first = rng.index(scores.len());
        let mut second = rng.index(scores.len());
        while second == first {
            second = rng.index(scores.len());
        }

        match compare(self.direction, &scores[first], &scores[second]) {
            Ordering::Greater => first,
            _ => second,
        }
    }
}

impl<P> SelectionStrategy<P> for TournamentSelection
where
    P: Phenotype,
{
    fn select(&self, population: &[P], scores: &[Score], rng: &mut RandomStream) -> Result<Vec<P>> {
        check_inputs(population, scores)?;

        if population.len() < 2 {
            return Ok(population.to_vec());
        }

        Ok((0..population.len())
            .map(|_| population[self.run_tournament(scores, rng)].clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::{PackedBits, RealVector};

    fn population(values: &[f64]) -> Vec<RealVector> {
        values.iter().map(|&v| RealVector::new(vec![v])).collect()
    }

    #[test]
    fn test_worst_never_wins() {
        let pop = population(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let scores: Vec<Score> = [1.0, 4.0, 9.0, 16.0, 25.0]
            .iter()
            .map(|&v| Score::new(v))
            .collect();
        let mut rng = RandomStream::from_seed(42);

        let selection = TournamentSelection::new(Direction::Minimize);
        for _ in 0..50 {
            let next = selection.select(&pop, &scores, &mut rng).unwrap();
            assert_eq!(next.len(), 5);
            assert!(next.iter().all(|c| c.genes()[0] != 5.0));
        }

        let selection = TournamentSelection::new(Direction::Maximize);
        for _ in 0..50 {
            let next = selection.select(&pop, &scores, &mut rng).unwrap();
            assert!(next.iter().all(|c| c.genes()[0] != 1.0));
        }
    }

    #[test]
    fn test_two_individuals_always_pick_better() {
        let pop = population(&[1.0, 2.0]);
        let scores = vec![Score::new(10.0), Score::new(3.0)];
        let mut rng = RandomStream::from_seed(3);
        let selection = TournamentSelection::new(Direction::Minimize);
        let next = selection.select(&pop, &scores, &mut rng).unwrap();
        assert!(next.iter().all(|c| c.genes()[0] == 2.0));
    }

    #[test]
    fn test_feasible_beats_infeasible() {
        let pop = vec![PackedBits::new(0b01, 2), PackedBits::new(0b10, 2)];
        let scores = vec![Score::penalized(50.0, 4.0), Score::penalized(5.0, -1.0)];
        let mut rng = RandomStream::from_seed(8);
        let selection = TournamentSelection::new(Direction::Maximize);
        let next = selection.select(&pop, &scores, &mut rng).unwrap();
        assert!(next.iter().all(|c| c.bits() == 0b10));
    }

    #[test]
    fn test_single_individual_is_copied() {
        let pop = population(&[7.0]);
        let mut rng = RandomStream::from_seed(3);
        let selection = TournamentSelection::new(Direction::Minimize);
        let next = selection
            .select(&pop, &[Score::new(49.0)], &mut rng)
            .unwrap();
        assert_eq!(next, pop);
    }

    #[test]
    fn test_tournament_selection_mismatched_lengths() {
        let pop = population(&[1.0, 2.0]);
        let mut rng = RandomStream::from_seed(3);
        let selection = TournamentSelection::default();
        assert!(selection.select(&pop, &[Score::new(1.0)], &mut rng).is_err());
    }
}
