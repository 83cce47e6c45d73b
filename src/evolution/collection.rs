//! # RunCollection
//!
//! Executes one independent run per configured seed and aggregates the
//! best-of-run values into cross-run statistics. Runs share nothing but the
//! engine, so they are executed in parallel with `rayon` once there are at
//! least `parallel_threshold` of them. Results are always kept in seed order,
//! which makes the outcome identical whichever path was taken.

use rayon::prelude::*;
use tracing::info;

use crate::chromosome::{Chromosome, PackedBits, RealVector};
use crate::error::{GeneticError, OptionExt, Result};
use crate::evolution::engine::{Engine, GenerationEngine};
use crate::evolution::jaya::JayaEngine;
use crate::evolution::options::{
    EngineKind, FitnessKind, Representation, RunConfig, SelectionMethod,
};
use crate::evolution::statistics::{mean, mean_and_std_dev};
use crate::evolution::tracker::{BestOfRun, RunResult, RunTracker};
use crate::fitness::{
    best_index, DecodedSumOfSquares, Direction, FitnessEvaluator, KnapsackPenalty, Score,
    SumOfSquares,
};
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;
use crate::selection::{
    LinearRankingSelection, ProportionalSelection, SelectionStrategy, TournamentSelection,
};

/// Cross-run averages for one snapshot generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationAverage {
    pub generation: usize,
    /// Mean over runs of the generation's average fitness.
    pub average: f64,
    /// Mean over runs of the generation's best raw value (high when
    /// maximizing, low when minimizing).
    pub best: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RunCollectionResult {
    pub runs: Vec<RunResult>,
    pub mean_of_best: f64,
    /// Sample standard deviation of the best-of-run values.
    pub std_dev_of_best: f64,
    pub global_best: BestOfRun,
    pub global_best_seed: u64,
    pub generation_averages: Vec<GenerationAverage>,
}

/// Runs every seed of a configuration against one engine.
#[derive(Debug)]
pub struct RunCollection<'a, P>
where
    P: Phenotype,
{
    engine: &'a dyn Engine<P>,
    config: &'a RunConfig,
}

impl<'a, P> RunCollection<'a, P>
where
    P: Phenotype + Into<Chromosome>,
{
    pub fn new(engine: &'a dyn Engine<P>, config: &'a RunConfig) -> Self {
        Self { engine, config }
    }

    /// Runs all seeds, building initial individuals with `init`.
    ///
    /// # Errors
    ///
    /// Propagates the first error of any run.
    pub fn run<F>(&self, init: F) -> Result<RunCollectionResult>
    where
        F: Fn(&mut RandomStream) -> P + Sync,
    {
        let seeds = self.config.get_seeds();
        let track = |seed: &u64| {
            RunTracker::new(
                self.engine,
                *seed,
                self.config.get_population_size(),
                self.config.get_num_generations(),
                self.config.get_snapshot_interval(),
            )
            .run(&init)
        };

        let runs: Result<Vec<RunResult>> = if seeds.len() >= self.config.get_parallel_threshold() {
            seeds.par_iter().map(track).collect()
        } else {
            seeds.iter().map(track).collect()
        };

        summarize(runs?, self.engine.direction())
    }
}

/// Aggregates finished runs into a `RunCollectionResult`.
///
/// # Errors
///
/// Returns `GeneticError::Configuration` if `runs` is empty.
pub fn summarize(runs: Vec<RunResult>, direction: Direction) -> Result<RunCollectionResult> {
    let best_scores: Vec<Score> = runs.iter().map(|r| r.best.score).collect();
    let best_values: Vec<f64> = best_scores.iter().map(|s| s.value).collect();

    let (mean_of_best, std_dev_of_best) = mean_and_std_dev(&best_values)
        .ok_or_else_genetic(|| GeneticError::Configuration("No runs to summarize".to_string()))?;
    let winner = best_index(direction, &best_scores)
        .ok_or_else_genetic(|| GeneticError::Configuration("No runs to summarize".to_string()))?;

    let generation_averages = generation_averages(&runs, direction);
    let global_best = runs[winner].best.clone();
    let global_best_seed = runs[winner].seed;

    info!(
        runs = runs.len(),
        mean = mean_of_best,
        std_dev = std_dev_of_best,
        global_best = global_best.score.value,
        global_best_seed = global_best_seed,
        "run collection complete"
    );

    Ok(RunCollectionResult {
        runs,
        mean_of_best,
        std_dev_of_best,
        global_best,
        global_best_seed,
        generation_averages,
    })
}

fn generation_averages(runs: &[RunResult], direction: Direction) -> Vec<GenerationAverage> {
    let Some(first) = runs.first() else {
        return Vec::new();
    };

    first
        .snapshots
        .iter()
        .enumerate()
        .filter_map(|(idx, snapshot)| {
            let at_index: Vec<_> = runs.iter().filter_map(|r| r.snapshots.get(idx)).collect();
            let averages: Vec<f64> = at_index.iter().map(|s| s.average).collect();
            let bests: Vec<f64> = at_index
                .iter()
                .map(|s| if direction.is_maximize() { s.high } else { s.low })
                .collect();
            Some(GenerationAverage {
                generation: snapshot.generation,
                average: mean(&averages)?,
                best: mean(&bests)?,
            })
        })
        .collect()
}

fn generation_engine<P>(
    config: &RunConfig,
    evaluator: Box<dyn FitnessEvaluator<P>>,
) -> Result<GenerationEngine<P>>
where
    P: Phenotype + 'static,
{
    let direction = config.get_direction();
    let selection: Box<dyn SelectionStrategy<P>> = match config.get_selection() {
        SelectionMethod::Proportional => Box::new(ProportionalSelection::new(direction)),
        SelectionMethod::Tournament => Box::new(TournamentSelection::new(direction)),
        SelectionMethod::LinearRanking => Box::new(LinearRankingSelection::new(direction)),
    };
    Ok(GenerationEngine::new(
        evaluator,
        selection,
        config.crossover_operator()?,
        config.mutation_operator()?,
        direction,
    ))
}

fn packed_evaluator(config: &RunConfig) -> Result<Box<dyn FitnessEvaluator<PackedBits>>> {
    match config.get_fitness() {
        FitnessKind::SumOfSquares => {
            let codec = config.codec()?.ok_or_else_genetic(|| {
                GeneticError::Configuration("Packed runs need bit lengths".to_string())
            })?;
            Ok(Box::new(DecodedSumOfSquares::new(codec)))
        }
        FitnessKind::Knapsack {
            instance,
            penalty_constant,
        } => {
            let evaluator = KnapsackPenalty::new(instance.clone());
            Ok(Box::new(match penalty_constant {
                Some(constant) => evaluator.with_constant(*constant),
                None => evaluator,
            }))
        }
    }
}

/// Validates `config`, builds the matching engine and runs every seed.
///
/// # Errors
///
/// Returns `GeneticError::Configuration` for an invalid configuration and
/// propagates any error raised during a run.
///
/// # Examples
///
/// ```
/// use evorun::evolution::options::{Representation, RunConfig};
/// use evorun::evolution::run_collection;
///
/// let config = RunConfig::builder()
///     .representation(Representation::RealVector { size: 2 })
///     .population_size(10)
///     .num_generations(5)
///     .seeds(vec![1, 2, 3])
///     .build()
///     .unwrap();
///
/// let result = run_collection(&config).unwrap();
/// assert_eq!(result.runs.len(), 3);
/// assert!(result.global_best.score.value <= result.mean_of_best);
/// ```
pub fn run_collection(config: &RunConfig) -> Result<RunCollectionResult> {
    config.validate()?;
    let bounds = config.get_bounds();
    let direction = config.get_direction();

    match (config.get_representation(), config.get_engine()) {
        (Representation::RealVector { size }, EngineKind::Jaya) => {
            let size = *size;
            let engine = JayaEngine::new(Box::new(SumOfSquares), bounds, direction);
            RunCollection::new(&engine, config).run(|rng| RealVector::random(size, bounds, rng))
        }
        (Representation::RealVector { size }, EngineKind::Generational) => {
            let size = *size;
            let engine = generation_engine::<RealVector>(config, Box::new(SumOfSquares))?;
            RunCollection::new(&engine, config).run(|rng| RealVector::random(size, bounds, rng))
        }
        (Representation::PackedBits { .. }, EngineKind::Generational) => {
            let width = config.get_representation().width() as u32;
            let engine = generation_engine(config, packed_evaluator(config)?)?;
            RunCollection::new(&engine, config).run(|rng| PackedBits::random(width, rng))
        }
        (Representation::PackedBits { .. }, EngineKind::Jaya) => Err(GeneticError::Configuration(
            "The Jaya engine requires real-valued chromosomes".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::tracker::GenerationSnapshot;

    fn run_with(seed: u64, best: f64, snapshots: Vec<(usize, f64, f64, f64)>) -> RunResult {
        let chromosome = Chromosome::from(RealVector::new(vec![best]));
        RunResult {
            seed,
            best: BestOfRun {
                score: Score::new(best),
                chromosome: chromosome.clone(),
            },
            snapshots: snapshots
                .into_iter()
                .map(|(generation, high, low, average)| GenerationSnapshot {
                    generation,
                    high,
                    low,
                    average,
                    high_vector: chromosome.clone(),
                    low_vector: chromosome.clone(),
                })
                .collect(),
            improvements: Vec::new(),
        }
    }

    #[test]
    fn test_summarize_statistics() {
        let runs = vec![
            run_with(11, 2.0, vec![(0, 9.0, 3.0, 5.0)]),
            run_with(22, 4.0, vec![(0, 7.0, 1.0, 3.0)]),
            run_with(33, 6.0, vec![(0, 8.0, 2.0, 4.0)]),
        ];
        let result = summarize(runs, Direction::Minimize).unwrap();
        assert_eq!(result.mean_of_best, 4.0);
        assert_eq!(result.std_dev_of_best, 2.0);
        assert_eq!(result.global_best.score.value, 2.0);
        assert_eq!(result.global_best_seed, 11);
        assert_eq!(
            result.generation_averages,
            vec![GenerationAverage {
                generation: 0,
                average: 4.0,
                best: 2.0,
            }]
        );
    }

    #[test]
    fn test_summarize_maximize_picks_highest() {
        let runs = vec![run_with(1, 2.0, vec![]), run_with(2, 6.0, vec![])];
        let result = summarize(runs, Direction::Maximize).unwrap();
        assert_eq!(result.global_best_seed, 2);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(Vec::new(), Direction::Minimize).is_err());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let builder = || {
            RunConfig::builder()
                .population_size(12)
                .num_generations(15)
                .seeds(vec![3, 1, 4, 1, 5, 9])
        };
        let sequential = builder().parallel_threshold(100).build().unwrap();
        let parallel = builder().parallel_threshold(1).build().unwrap();
        assert_eq!(
            run_collection(&sequential).unwrap(),
            run_collection(&parallel).unwrap()
        );
    }

    #[test]
    fn test_runs_follow_seed_order() {
        let config = RunConfig::builder()
            .population_size(6)
            .num_generations(3)
            .seeds(vec![30, 10, 20])
            .parallel_threshold(1)
            .build()
            .unwrap();
        let result = run_collection(&config).unwrap();
        let seeds: Vec<u64> = result.runs.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![30, 10, 20]);
    }
}
