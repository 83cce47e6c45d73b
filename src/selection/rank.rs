use crate::error::Result;
use crate::fitness::{compare, Direction, Score};
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;
use crate::selection::proportional::{sampling_table, spin};
use crate::selection::selection_strategy::{check_inputs, SelectionStrategy};

/// Linear ranking selection.
///
/// Individuals are ordered from worst to best with a stable sort, so equal
/// scores keep their encounter order and every individual gets a distinct
/// rank `0..n`. Rank `r` is sampled with probability `2r / ((n - 1) n)`: the
/// worst individual is never chosen and the best is chosen most often.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearRankingSelection {
    direction: Direction,
}

impl LinearRankingSelection {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Population indices ordered from worst (rank 0) to best.
    pub fn ranking(&self, scores: &[Score]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| compare(self.direction, &scores[a], &scores[b]));
        order
    }

    /// Selection weight of every rank, worst first.
    pub fn rank_weights(size: usize) -> Vec<f64> {
        if size < 2 {
            return vec![1.0; size];
        }
        let denominator = ((size - 1) * size) as f64;
        (0..size).map(|r| 2.0 * r as f64 / denominator).collect()
    }
}

impl<P> SelectionStrategy<P> for LinearRankingSelection
where
    P: Phenotype,
{
    fn select(&self, population: &[P], scores: &[Score], rng: &mut RandomStream) -> Result<Vec<P>> {
        check_inputs(population, scores)?;

        let order = self.ranking(scores);
        let table = sampling_table(&Self::rank_weights(population.len()), "linear-ranking");

        Ok((0..population.len())
            .map(|_| population[order[spin(&table, rng)]].clone())
            .collect())
    }
}
