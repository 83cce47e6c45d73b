//! # RunConfig
//!
//! The `RunConfig` struct is the fully validated configuration record handed to
//! [`run_collection`](crate::evolution::run_collection). It fixes the
//! chromosome representation, the operators and their probabilities, the
//! objective, and the list of seeds, one per independent run.
//!
//! ## Example
//!
//! ```rust
//! use evorun::evolution::options::{RunConfig, Representation, SelectionMethod};
//!
//! let config = RunConfig::builder()
//!     .representation(Representation::RealVector { size: 3 })
//!     .bounds(-1.0, 5.0)
//!     .population_size(20)
//!     .num_generations(10)
//!     .seeds(vec![11, 22, 33])
//!     .selection(SelectionMethod::Tournament)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.get_num_runs(), 3);
//! assert_eq!(config.get_crossover_point(), 1);
//! ```
//!
//! Invalid combinations are rejected before any run starts:
//!
//! ```rust
//! use evorun::evolution::options::RunConfig;
//!
//! assert!(RunConfig::builder().mutation_probability(1.5).build().is_err());
//! assert!(RunConfig::builder().bounds(2.0, 2.0).build().is_err());
//! ```

use crate::breeding::{CrossoverOperator, MutationOperator, RealMutation};
use crate::chromosome::{BitCodec, Bounds};
use crate::error::{GeneticError, Result};
use crate::fitness::{Direction, KnapsackInstance};
use crate::rng::derive_seeds;

/// Chromosome encoding used by every individual of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Representation {
    /// `size` real genes, each within the configured bounds.
    RealVector { size: usize },
    /// A packed bit-string split into fields of the given lengths, most
    /// significant field first.
    PackedBits { bit_lengths: Vec<u32> },
}

impl Representation {
    /// Number of crossover positions: genes or bits.
    pub fn width(&self) -> usize {
        match self {
            Representation::RealVector { size } => *size,
            Representation::PackedBits { bit_lengths } => {
                bit_lengths.iter().map(|&len| len as usize).sum()
            }
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMethod {
    #[default]
    Proportional,
    Tournament,
    LinearRanking,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FitnessKind {
    /// Sum of squares of the genes, or of the decoded fields for packed
    /// chromosomes.
    #[default]
    SumOfSquares,
    /// Knapsack value with a static penalty. `penalty_constant` defaults to
    /// `floor(items / 4)`.
    Knapsack {
        instance: KnapsackInstance,
        penalty_constant: Option<f64>,
    },
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    /// Selection, crossover and mutation every generation.
    #[default]
    Generational,
    /// The Jaya update rule; no selection or crossover.
    Jaya,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    representation: Representation,
    bounds: Bounds,
    population_size: usize,
    num_generations: usize,
    seeds: Vec<u64>,
    selection: SelectionMethod,
    crossover_point: Option<usize>,
    crossover_probability: f64,
    mutation_probability: f64,
    mutation_alpha: f64,
    mutation_variant: RealMutation,
    direction: Direction,
    fitness: FitnessKind,
    engine: EngineKind,
    snapshot_interval: usize,
    /// Minimum number of runs before they are executed in parallel.
    parallel_threshold: usize,
}

impl RunConfig {
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    pub fn get_representation(&self) -> &Representation {
        &self.representation
    }

    pub fn get_bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_num_runs(&self) -> usize {
        self.seeds.len()
    }

    pub fn get_seeds(&self) -> &[u64] {
        &self.seeds
    }

    pub fn get_selection(&self) -> SelectionMethod {
        self.selection
    }

    /// The configured crossover point, or half the chromosome width (at least
    /// 1) when none was given.
    pub fn get_crossover_point(&self) -> usize {
        self.crossover_point
            .unwrap_or_else(|| (self.representation.width() / 2).max(1))
    }

    pub fn get_crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn get_mutation_probability(&self) -> f64 {
        self.mutation_probability
    }

    pub fn get_mutation_alpha(&self) -> f64 {
        self.mutation_alpha
    }

    pub fn get_mutation_variant(&self) -> RealMutation {
        self.mutation_variant
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn get_fitness(&self) -> &FitnessKind {
        &self.fitness
    }

    pub fn get_engine(&self) -> EngineKind {
        self.engine
    }

    pub fn get_snapshot_interval(&self) -> usize {
        self.snapshot_interval
    }

    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Codec for packed representations; `None` for real vectors.
    pub fn codec(&self) -> Result<Option<BitCodec>> {
        match &self.representation {
            Representation::RealVector { .. } => Ok(None),
            Representation::PackedBits { bit_lengths } => {
                BitCodec::new(bit_lengths.clone(), self.bounds).map(Some)
            }
        }
    }

    /// Builds the crossover operator, clamping a degenerate point with a warning.
    pub fn crossover_operator(&self) -> Result<CrossoverOperator> {
        CrossoverOperator::new(
            self.get_crossover_point(),
            self.crossover_probability,
            self.representation.width(),
        )
    }

    pub fn mutation_operator(&self) -> Result<MutationOperator> {
        MutationOperator::new(
            self.mutation_probability,
            self.mutation_alpha,
            self.mutation_variant,
            self.bounds,
        )
    }

    /// Checks every field and the combination of representation, engine,
    /// objective and selection.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        Bounds::new(self.bounds.min(), self.bounds.max())?;

        for (name, value) in [
            ("population size", self.population_size),
            ("number of generations", self.num_generations),
            ("number of runs", self.seeds.len()),
            ("snapshot interval", self.snapshot_interval),
        ] {
            if value == 0 {
                return Err(GeneticError::Configuration(format!(
                    "The {} must be at least 1",
                    name
                )));
            }
        }

        match &self.representation {
            Representation::RealVector { size } => {
                if *size == 0 {
                    return Err(GeneticError::Configuration(
                        "Real-valued chromosomes need at least one gene".to_string(),
                    ));
                }
            }
            Representation::PackedBits { .. } => {
                self.codec()?;
            }
        }

        self.crossover_operator()?;
        self.mutation_operator()?;

        self.validate_combination()
    }

    fn validate_combination(&self) -> Result<()> {
        let is_real = matches!(self.representation, Representation::RealVector { .. });

        if self.engine == EngineKind::Jaya {
            if !is_real {
                return Err(GeneticError::Configuration(
                    "The Jaya engine requires real-valued chromosomes".to_string(),
                ));
            }
            if self.fitness != FitnessKind::SumOfSquares {
                return Err(GeneticError::Configuration(
                    "The Jaya engine only supports the sum-of-squares objective".to_string(),
                ));
            }
        }

        if let FitnessKind::Knapsack {
            instance,
            penalty_constant,
        } = &self.fitness
        {
            if is_real {
                return Err(GeneticError::Configuration(
                    "The knapsack objective requires packed chromosomes".to_string(),
                ));
            }
            instance.validate()?;
            if self.representation.width() != instance.len() {
                return Err(GeneticError::Configuration(format!(
                    "Chromosome width {} doesn't match the {} knapsack items",
                    self.representation.width(),
                    instance.len()
                )));
            }
            if self.direction != Direction::Maximize {
                return Err(GeneticError::Configuration(
                    "The knapsack objective must be maximized".to_string(),
                ));
            }
            if self.selection == SelectionMethod::Proportional {
                return Err(GeneticError::Configuration(
                    "Proportional selection ignores penalties; use tournament or linear ranking for knapsack runs"
                        .to_string(),
                ));
            }
            if penalty_constant.is_some_and(|c| !c.is_finite() || c < 0.0) {
                return Err(GeneticError::Configuration(
                    "The knapsack penalty constant must be a non-negative number".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            representation: Representation::RealVector { size: 3 },
            bounds: Bounds::default(),
            population_size: 30,
            num_generations: 50,
            seeds: derive_seeds(DEFAULT_MASTER_SEED, DEFAULT_NUM_RUNS),
            selection: SelectionMethod::default(),
            crossover_point: None,
            crossover_probability: 0.8,
            mutation_probability: 0.1,
            mutation_alpha: 0.01,
            mutation_variant: RealMutation::default(),
            direction: Direction::default(),
            fitness: FitnessKind::default(),
            engine: EngineKind::default(),
            snapshot_interval: 10,
            parallel_threshold: 8,
        }
    }
}

const DEFAULT_MASTER_SEED: u64 = 1;
const DEFAULT_NUM_RUNS: usize = 10;

/// Builder for `RunConfig`.
///
/// Unset fields take the values of `RunConfig::default()`. Seeds come from
/// an explicit list, or are derived from a master seed.
#[derive(Debug, Clone, Default)]
pub struct RunConfigBuilder {
    representation: Option<Representation>,
    bounds: Option<(f64, f64)>,
    population_size: Option<usize>,
    num_generations: Option<usize>,
    num_runs: Option<usize>,
    seeds: Option<Vec<u64>>,
    master_seed: Option<u64>,
    selection: Option<SelectionMethod>,
    crossover_point: Option<usize>,
    crossover_probability: Option<f64>,
    mutation_probability: Option<f64>,
    mutation_alpha: Option<f64>,
    mutation_variant: Option<RealMutation>,
    direction: Option<Direction>,
    fitness: Option<FitnessKind>,
    engine: Option<EngineKind>,
    snapshot_interval: Option<usize>,
    parallel_threshold: Option<usize>,
}

impl RunConfigBuilder {
    pub fn representation(mut self, value: Representation) -> Self {
        self.representation = Some(value);
        self
    }

    pub fn bounds(mut self, min: f64, max: f64) -> Self {
        self.bounds = Some((min, max));
        self
    }

    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    /// Sets the number of runs. Must match the seed list when both are given.
    pub fn num_runs(mut self, value: usize) -> Self {
        self.num_runs = Some(value);
        self
    }

    /// Sets one seed per run explicitly.
    pub fn seeds(mut self, value: Vec<u64>) -> Self {
        self.seeds = Some(value);
        self
    }

    /// Derives the run seeds from a single master seed.
    pub fn master_seed(mut self, value: u64) -> Self {
        self.master_seed = Some(value);
        self
    }

    pub fn selection(mut self, value: SelectionMethod) -> Self {
        self.selection = Some(value);
        self
    }

    pub fn crossover_point(mut self, value: usize) -> Self {
        self.crossover_point = Some(value);
        self
    }

    pub fn crossover_probability(mut self, value: f64) -> Self {
        self.crossover_probability = Some(value);
        self
    }

    pub fn mutation_probability(mut self, value: f64) -> Self {
        self.mutation_probability = Some(value);
        self
    }

    pub fn mutation_alpha(mut self, value: f64) -> Self {
        self.mutation_alpha = Some(value);
        self
    }

    pub fn mutation_variant(mut self, value: RealMutation) -> Self {
        self.mutation_variant = Some(value);
        self
    }

    pub fn direction(mut self, value: Direction) -> Self {
        self.direction = Some(value);
        self
    }

    pub fn fitness(mut self, value: FitnessKind) -> Self {
        self.fitness = Some(value);
        self
    }

    pub fn engine(mut self, value: EngineKind) -> Self {
        self.engine = Some(value);
        self
    }

    pub fn snapshot_interval(mut self, value: usize) -> Self {
        self.snapshot_interval = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if any field or combination of
    /// fields is invalid, including a run count that differs from the length
    /// of an explicit seed list.
    pub fn build(self) -> Result<RunConfig> {
        let defaults = RunConfig::default();

        let bounds = match self.bounds {
            Some((min, max)) => Bounds::new(min, max)?,
            None => defaults.bounds,
        };

        let seeds = match (self.seeds, self.num_runs) {
            (Some(seeds), Some(num_runs)) if seeds.len() != num_runs => {
                return Err(GeneticError::Configuration(format!(
                    "Requested {} runs but {} seeds were given",
                    num_runs,
                    seeds.len()
                )));
            }
            (Some(seeds), _) => seeds,
            (None, num_runs) => derive_seeds(
                self.master_seed.unwrap_or(DEFAULT_MASTER_SEED),
                num_runs.unwrap_or(DEFAULT_NUM_RUNS),
            ),
        };

        let config = RunConfig {
            representation: self.representation.unwrap_or(defaults.representation),
            bounds,
            population_size: self.population_size.unwrap_or(defaults.population_size),
            num_generations: self.num_generations.unwrap_or(defaults.num_generations),
            seeds,
            selection: self.selection.unwrap_or(defaults.selection),
            crossover_point: self.crossover_point.or(defaults.crossover_point),
            crossover_probability: self
                .crossover_probability
                .unwrap_or(defaults.crossover_probability),
            mutation_probability: self
                .mutation_probability
                .unwrap_or(defaults.mutation_probability),
            mutation_alpha: self.mutation_alpha.unwrap_or(defaults.mutation_alpha),
            mutation_variant: self.mutation_variant.unwrap_or(defaults.mutation_variant),
            direction: self.direction.unwrap_or(defaults.direction),
            fitness: self.fitness.unwrap_or(defaults.fitness),
            engine: self.engine.unwrap_or(defaults.engine),
            snapshot_interval: self.snapshot_interval.unwrap_or(defaults.snapshot_interval),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(defaults.parallel_threshold),
        };

        config.validate()?;
        Ok(config)
    }
}
