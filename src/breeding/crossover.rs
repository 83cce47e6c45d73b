use tracing::warn;

use crate::error::{GeneticError, Result};
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;

/// Single-point crossover applied to disjoint consecutive pairs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CrossoverOperator {
    point: usize,
    probability: f64,
}

impl CrossoverOperator {
    /// Creates a crossover operator for chromosomes of the given width.
    ///
    /// A point of `0` or at or beyond `width` cannot exchange anything useful.
    /// It is reported with a warning and clamped to `width`, which turns every
    /// crossover into a no-op.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `probability` is outside `[0, 1]`.
    pub fn new(point: usize, probability: f64, width: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(GeneticError::Configuration(format!(
                "Crossover probability must be in [0, 1], got {}",
                probability
            )));
        }

        let point = if point == 0 || point >= width {
            warn!(
                point = point,
                width = width,
                "crossover point lies outside [1, width); crossover will not change chromosomes"
            );
            width
        } else {
            point
        };

        Ok(Self { point, probability })
    }

    pub fn get_point(&self) -> usize {
        self.point
    }

    pub fn get_probability(&self) -> f64 {
        self.probability
    }

    /// Walks the pairs `(0, 1), (2, 3), ...` and crosses each one with the
    /// configured probability. An odd last individual is left alone.
    ///
    /// One uniform value is drawn per pair whether or not the point is degenerate.
    pub fn apply<P: Phenotype>(&self, generation: &mut [P], rng: &mut RandomStream) {
        for pair in generation.chunks_exact_mut(2) {
            if rng.chance(self.probability) {
                let (first, second) = pair.split_at_mut(1);
                first[0].crossover(&mut second[0], self.point);
            }
        }
    }
}
