//! # Knapsack Fitness
//!
//! A 0/1 knapsack scored by total value, with a static penalty proportional to
//! how far the selected weight exceeds capacity. Item `i` of an `n`-item
//! instance is included when bit `n - 1 - i` of the chromosome is set, so the
//! most significant bit is the first item.

use crate::chromosome::PackedBits;
use crate::error::{GeneticError, Result};
use crate::fitness::{FitnessEvaluator, Score};
use crate::rng::RandomStream;

/// Item values, item weights and the weight capacity of a knapsack.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackInstance {
    values: Vec<f64>,
    weights: Vec<f64>,
    capacity: f64,
}

impl KnapsackInstance {
    /// Creates an instance from explicit values and weights.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the lists are empty, differ in length,
    /// hold more than 128 items, or contain non-finite numbers.
    pub fn new(values: Vec<f64>, weights: Vec<f64>, capacity: f64) -> Result<Self> {
        let instance = Self {
            values,
            weights,
            capacity,
        };
        instance.validate()?;
        Ok(instance)
    }

    /// Checks the invariants `new` enforces. Deserialized instances skip
    /// `new`, so configurations re-check them here before a run.
    ///
    /// # Errors
    ///
    /// Same conditions as [`KnapsackInstance::new`].
    pub fn validate(&self) -> Result<()> {
        if self.values.is_empty() {
            return Err(GeneticError::Configuration(
                "Knapsack needs at least one item".to_string(),
            ));
        }
        if self.values.len() != self.weights.len() {
            return Err(GeneticError::Configuration(format!(
                "Knapsack has {} values but {} weights",
                self.values.len(),
                self.weights.len()
            )));
        }
        if self.values.len() > 128 {
            return Err(GeneticError::Configuration(format!(
                "Knapsack has {} items, at most 128 are supported",
                self.values.len()
            )));
        }
        if !self.capacity.is_finite()
            || self.values.iter().chain(&self.weights).any(|v| !v.is_finite())
        {
            return Err(GeneticError::Configuration(
                "Knapsack values, weights and capacity must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Generates a random instance whose weights sum to roughly twice the capacity.
    ///
    /// Values are drawn from `1..=size`. Weights start in
    /// `1..=floor(4 * capacity / size)` and are then nudged one unit at a time at
    /// random positions until their total lies in
    /// `[2 * capacity - 1, 2 * capacity + 1]`. On average about half of the
    /// items fit.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `size` is zero or larger than 128, or if
    /// the weight limits make the target total unreachable.
    pub fn random(size: usize, capacity: u64, rng: &mut RandomStream) -> Result<Self> {
        if size == 0 || size > 128 {
            return Err(GeneticError::Configuration(format!(
                "Knapsack size must be in 1..=128, got {}",
                size
            )));
        }
        let too_large = || {
            GeneticError::Configuration(format!("Knapsack capacity {} is too large", capacity))
        };
        let size_u64 = size as u64;
        let upper = capacity.checked_mul(4).ok_or_else(too_large)? / size_u64;
        let target = capacity.checked_mul(2).ok_or_else(too_large)?;
        if upper == 0 || upper * size_u64 + 1 < target {
            return Err(GeneticError::Configuration(format!(
                "Capacity {} is too small for {} randomly weighted items",
                capacity, size
            )));
        }
        // With every weight at 1 the total is `size`, which must not overshoot.
        if size_u64 > target + 1 {
            return Err(GeneticError::Configuration(format!(
                "{} items of weight 1 already exceed twice the capacity {}",
                size, capacity
            )));
        }

        let values: Vec<u64> = (0..size).map(|_| rng.int_range(1, size as u64)).collect();
        let mut weights: Vec<u64> = (0..size).map(|_| rng.int_range(1, upper)).collect();

        while weights.iter().sum::<u64>() + 1 < target {
            let idx = rng.index(size);
            if weights[idx] < upper {
                weights[idx] += 1;
            }
        }
        while weights.iter().sum::<u64>() > target + 1 {
            let idx = rng.index(size);
            if weights[idx] > 1 {
                weights[idx] -= 1;
            }
        }

        Self::new(
            values.into_iter().map(|v| v as f64).collect(),
            weights.into_iter().map(|w| w as f64).collect(),
            capacity as f64,
        )
    }

    /// Every item weighs 1, so with `capacity >= size` everything fits.
    pub fn trivially_light(size: usize, capacity: u64) -> Result<Self> {
        Self::new(cycling_values(size), vec![1.0; size], capacity as f64)
    }

    /// Every item weighs a hundred times the capacity, so nothing fits.
    pub fn trivially_heavy(size: usize, capacity: u64) -> Result<Self> {
        Self::new(
            cycling_values(size),
            vec![(capacity * 100) as f64; size],
            capacity as f64,
        )
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn included(&self, chromosome: &PackedBits) -> impl Iterator<Item = usize> + '_ {
        assert_eq!(
            chromosome.width() as usize,
            self.len(),
            "chromosome width does not match the number of knapsack items"
        );
        let bits = chromosome.bits();
        let size = self.len();
        (0..size).filter(move |i| (bits >> (size - 1 - i)) & 1 == 1)
    }

    /// Total value of the items selected by `chromosome`.
    pub fn total_value(&self, chromosome: &PackedBits) -> f64 {
        self.included(chromosome).map(|i| self.values[i]).sum()
    }

    /// Total weight of the items selected by `chromosome`.
    pub fn total_weight(&self, chromosome: &PackedBits) -> f64 {
        self.included(chromosome).map(|i| self.weights[i]).sum()
    }
}

fn cycling_values(size: usize) -> Vec<f64> {
    (0..size).map(|i| (i % 10 + 1) as f64).collect()
}

/// Knapsack evaluator with a static, deviation-proportional penalty.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackPenalty {
    instance: KnapsackInstance,
    constant: f64,
}

impl KnapsackPenalty {
    /// Uses the default penalty constant `floor(items / 4)`.
    pub fn new(instance: KnapsackInstance) -> Self {
        let constant = (instance.len() / 4) as f64;
        Self { instance, constant }
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    pub fn instance(&self) -> &KnapsackInstance {
        &self.instance
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// `constant * (total_weight - capacity)`; positive means over capacity.
    pub fn penalty(&self, chromosome: &PackedBits) -> f64 {
        self.constant * (self.instance.total_weight(chromosome) - self.instance.capacity)
    }
}

impl FitnessEvaluator<PackedBits> for KnapsackPenalty {
    fn evaluate(&self, individual: &PackedBits) -> Score {
        Score::penalized(self.instance.total_value(individual), self.penalty(individual))
    }
}
