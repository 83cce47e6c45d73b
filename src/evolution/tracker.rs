//! # RunTracker
//!
//! Drives a single seeded run: creates the initial generation, advances it
//! with an [`Engine`] for the configured number of generations and records the
//! best-of-run candidate plus periodic best/worst/average snapshots.
//!
//! Generation `0` is the randomly initialized generation. Snapshots are taken
//! at generation `0`, at every multiple of the snapshot interval and at the
//! final generation.

use tracing::{debug, info};

use crate::chromosome::Chromosome;
use crate::error::{GeneticError, OptionExt, Result};
use crate::evolution::engine::Engine;
use crate::fitness::{best_index, evaluate_all, is_better, GenerationStats, Score};
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;

/// The best candidate seen during a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BestOfRun {
    pub score: Score,
    pub chromosome: Chromosome,
}

/// Raw fitness extremes and mean of one generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSnapshot {
    pub generation: usize,
    pub high: f64,
    pub low: f64,
    pub average: f64,
    pub high_vector: Chromosome,
    pub low_vector: Chromosome,
}

/// A strict improvement of the best-of-run candidate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Improvement {
    pub generation: usize,
    pub score: Score,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub seed: u64,
    pub best: BestOfRun,
    pub snapshots: Vec<GenerationSnapshot>,
    pub improvements: Vec<Improvement>,
}

/// Runs one seeded evolution with a borrowed engine.
#[derive(Debug)]
pub struct RunTracker<'a, P>
where
    P: Phenotype,
{
    engine: &'a dyn Engine<P>,
    seed: u64,
    population_size: usize,
    num_generations: usize,
    snapshot_interval: usize,
}

impl<'a, P> RunTracker<'a, P>
where
    P: Phenotype + Into<Chromosome>,
{
    pub fn new(
        engine: &'a dyn Engine<P>,
        seed: u64,
        population_size: usize,
        num_generations: usize,
        snapshot_interval: usize,
    ) -> Self {
        Self {
            engine,
            seed,
            population_size,
            num_generations,
            snapshot_interval,
        }
    }

    pub fn get_seed(&self) -> u64 {
        self.seed
    }

    fn is_snapshot_generation(&self, generation: usize) -> bool {
        generation == self.num_generations
            || (self.snapshot_interval > 0 && generation % self.snapshot_interval == 0)
    }

    /// Runs the full evolution, building each initial individual with `init`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyPopulation` for a zero population size and
    /// propagates any engine or fitness error.
    pub fn run<F>(&self, mut init: F) -> Result<RunResult>
    where
        F: FnMut(&mut RandomStream) -> P,
    {
        if self.population_size == 0 {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut rng = RandomStream::from_seed(self.seed);
        let mut generation: Vec<P> = (0..self.population_size)
            .map(|_| init(&mut rng))
            .collect();

        let direction = self.engine.direction();
        let mut snapshots = Vec::new();
        let mut improvements = Vec::new();
        let mut best: Option<BestOfRun> = None;

        let mut scores = evaluate_all(self.engine.evaluator(), &generation)?;
        for current in 0..=self.num_generations {
            if current > 0 {
                self.engine.step(&mut generation, &scores, &mut rng)?;
                scores = evaluate_all(self.engine.evaluator(), &generation)?;
            }

            let leader = best_index(direction, &scores)
                .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;

            let improved = best
                .as_ref()
                .map_or(true, |b| is_better(direction, &scores[leader], &b.score));
            if improved {
                best = Some(BestOfRun {
                    score: scores[leader],
                    chromosome: generation[leader].clone().into(),
                });
                improvements.push(Improvement {
                    generation: current,
                    score: scores[leader],
                });
            }

            if self.is_snapshot_generation(current) {
                let stats = GenerationStats::from_scores(&scores)?;
                debug!(
                    seed = self.seed,
                    generation = current,
                    high = stats.high.score.value,
                    low = stats.low.score.value,
                    average = stats.average,
                    "generation snapshot"
                );
                snapshots.push(GenerationSnapshot {
                    generation: current,
                    high: stats.high.score.value,
                    low: stats.low.score.value,
                    average: stats.average,
                    high_vector: generation[stats.high.index].clone().into(),
                    low_vector: generation[stats.low.index].clone().into(),
                });
            }
        }

        let best = best.ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        info!(
            seed = self.seed,
            best = best.score.value,
            penalty = ?best.score.penalty,
            improvements = improvements.len(),
            "run complete"
        );

        Ok(RunResult {
            seed: self.seed,
            best,
            snapshots,
            improvements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breeding::{CrossoverOperator, MutationOperator, RealMutation};
    use crate::chromosome::{Bounds, RealVector};
    use crate::evolution::engine::GenerationEngine;
    use crate::fitness::{Direction, SumOfSquares};
    use crate::selection::ProportionalSelection;

    fn engine() -> GenerationEngine<RealVector> {
        let bounds = Bounds::new(-1.0, 5.0).unwrap();
        GenerationEngine::new(
            Box::new(SumOfSquares),
            Box::new(ProportionalSelection::new(Direction::Minimize)),
            CrossoverOperator::new(1, 0.8, 3).unwrap(),
            MutationOperator::new(0.1, 0.01, RealMutation::ResampleClamp, bounds).unwrap(),
            Direction::Minimize,
        )
    }

    fn random_vector(rng: &mut RandomStream) -> RealVector {
        RealVector::random(3, Bounds::new(-1.0, 5.0).unwrap(), rng)
    }

    #[test]
    fn test_snapshot_generations() {
        let engine = engine();
        let tracker = RunTracker::new(&engine, 3, 10, 25, 10);
        let result = tracker.run(random_vector).unwrap();
        let generations: Vec<usize> = result.snapshots.iter().map(|s| s.generation).collect();
        assert_eq!(generations, vec![0, 10, 20, 25]);
        assert_eq!(result.seed, 3);
    }

    #[test]
    fn test_final_generation_not_duplicated() {
        let engine = engine();
        let tracker = RunTracker::new(&engine, 3, 10, 20, 10);
        let result = tracker.run(random_vector).unwrap();
        let generations: Vec<usize> = result.snapshots.iter().map(|s| s.generation).collect();
        assert_eq!(generations, vec![0, 10, 20]);
    }

    #[test]
    fn test_best_never_regresses() {
        let engine = engine();
        let tracker = RunTracker::new(&engine, 42, 12, 40, 5);
        let result = tracker.run(random_vector).unwrap();

        assert_eq!(result.improvements[0].generation, 0);
        for pair in result.improvements.windows(2) {
            assert!(pair[1].score.value < pair[0].score.value);
            assert!(pair[1].generation > pair[0].generation);
        }
        let last = result.improvements.last().unwrap();
        assert_eq!(last.score, result.best.score);

        for snapshot in &result.snapshots {
            assert!(result.best.score.value <= snapshot.low);
        }
    }

    #[test]
    fn test_best_vector_matches_score() {
        let engine = engine();
        let tracker = RunTracker::new(&engine, 8, 10, 15, 10);
        let result = tracker.run(random_vector).unwrap();
        let genes = result.best.chromosome.as_real().unwrap().genes().to_vec();
        let expected: f64 = genes.iter().map(|g| g * g).sum();
        assert!((expected - result.best.score.value).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_result() {
        let engine = engine();
        let a = RunTracker::new(&engine, 5, 10, 20, 10).run(random_vector).unwrap();
        let b = RunTracker::new(&engine, 5, 10, 20, 10).run(random_vector).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_population() {
        let engine = engine();
        let tracker = RunTracker::new(&engine, 5, 0, 20, 10);
        assert!(tracker.run(random_vector).is_err());
    }
}
