use crate::chromosome::codec::Bounds;
use crate::error::{GeneticError, Result};
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;

/// Number of perturbations tried before a resampled gene is clamped.
const MAX_RESAMPLES: usize = 5;

/// How a selected real-valued gene is perturbed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RealMutation {
    /// Signed step of `alpha * span * u`, redrawn up to five times while it
    /// leaves the bounds, then clamped.
    #[default]
    ResampleClamp,
    /// Signed step of exactly `alpha * span`, mirrored back across whichever
    /// bound it crosses.
    Reflect,
}

/// Per-position mutation settings shared by every individual of a run.
///
/// Packed chromosomes only use the probability; real vectors also use the
/// step size `alpha`, the variant and the bounds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOperator {
    probability: f64,
    alpha: f64,
    variant: RealMutation,
    bounds: Bounds,
}

impl MutationOperator {
    /// Creates a mutation operator.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `probability` is outside `[0, 1]` or
    /// `alpha` is negative or not finite.
    pub fn new(probability: f64, alpha: f64, variant: RealMutation, bounds: Bounds) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(GeneticError::Configuration(format!(
                "Mutation probability must be in [0, 1], got {}",
                probability
            )));
        }
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(GeneticError::Configuration(format!(
                "Mutation alpha must be a non-negative number, got {}",
                alpha
            )));
        }
        Ok(Self {
            probability,
            alpha,
            variant,
            bounds,
        })
    }

    pub fn get_probability(&self) -> f64 {
        self.probability
    }

    pub fn get_alpha(&self) -> f64 {
        self.alpha
    }

    pub fn get_variant(&self) -> RealMutation {
        self.variant
    }

    pub fn get_bounds(&self) -> Bounds {
        self.bounds
    }

    /// Mutates every individual of the generation in order.
    pub fn apply<P: Phenotype>(&self, generation: &mut [P], rng: &mut RandomStream) {
        for individual in generation.iter_mut() {
            individual.mutate(self, rng);
        }
    }

    /// Returns a perturbed copy of a gene already chosen for mutation.
    pub fn perturb(&self, value: f64, rng: &mut RandomStream) -> f64 {
        match self.variant {
            RealMutation::ResampleClamp => self.resample_with_clamp(value, rng),
            RealMutation::Reflect => self.reflect(value, rng),
        }
    }

    fn sign(rng: &mut RandomStream) -> f64 {
        if rng.chance(0.5) {
            -1.0
        } else {
            1.0
        }
    }

    fn resample_with_clamp(&self, value: f64, rng: &mut RandomStream) -> f64 {
        let sign = Self::sign(rng);
        let span = self.bounds.span();
        let mut candidate = value;
        for _ in 0..MAX_RESAMPLES {
            candidate = value + rng.uniform() * self.alpha * sign * span;
            if self.bounds.contains(candidate) {
                break;
            }
        }
        self.bounds.clamp(candidate)
    }

    fn reflect(&self, value: f64, rng: &mut RandomStream) -> f64 {
        let sign = Self::sign(rng);
        let mut candidate = value + sign * self.alpha * self.bounds.span();
        if candidate > self.bounds.max() {
            candidate -= 2.0 * (candidate - self.bounds.max());
        } else if candidate < self.bounds.min() {
            candidate -= 2.0 * (candidate - self.bounds.min());
        }
        // A step larger than the whole range can still overshoot after one reflection.
        self.bounds.clamp(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(-1.0, 5.0).unwrap()
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(MutationOperator::new(1.5, 0.1, RealMutation::Reflect, bounds()).is_err());
        assert!(MutationOperator::new(-0.1, 0.1, RealMutation::Reflect, bounds()).is_err());
        assert!(MutationOperator::new(0.1, -0.1, RealMutation::Reflect, bounds()).is_err());
        assert!(MutationOperator::new(0.1, f64::NAN, RealMutation::Reflect, bounds()).is_err());
    }

    #[test]
    fn test_reflect_step_size() {
        let mutation = MutationOperator::new(1.0, 0.1, RealMutation::Reflect, bounds()).unwrap();
        let mut rng = RandomStream::from_seed(4);
        for _ in 0..100 {
            let moved = mutation.perturb(2.0, &mut rng);
            assert!(((moved - 2.0).abs() - 0.6).abs() < 1e-12);
        }
    }

    #[test]
    fn test_reflect_mirrors_at_bound() {
        // A step of 0.6 from 4.9 either lands at 4.3 or reflects 5.5 back to 4.5.
        let mutation = MutationOperator::new(1.0, 0.1, RealMutation::Reflect, bounds()).unwrap();
        let mut rng = RandomStream::from_seed(12);
        for _ in 0..100 {
            let moved = mutation.perturb(4.9, &mut rng);
            assert!((moved - 4.3).abs() < 1e-9 || (moved - 4.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_resample_bounded_step() {
        let mutation =
            MutationOperator::new(1.0, 0.01, RealMutation::ResampleClamp, bounds()).unwrap();
        let mut rng = RandomStream::from_seed(9);
        for _ in 0..100 {
            let moved = mutation.perturb(2.0, &mut rng);
            assert!((moved - 2.0).abs() <= 0.06);
        }
    }

    #[test]
    fn test_resample_clamps_at_edge() {
        let mutation =
            MutationOperator::new(1.0, 10.0, RealMutation::ResampleClamp, bounds()).unwrap();
        let mut rng = RandomStream::from_seed(2);
        for _ in 0..100 {
            let moved = mutation.perturb(5.0, &mut rng);
            assert!(bounds().contains(moved));
        }
    }

    #[test]
    fn test_resample_keeps_later_in_range_draw() {
        // From 4.9 an upward step of up to 0.6 leaves the range whenever u > 1/6.
        let mutation =
            MutationOperator::new(1.0, 0.1, RealMutation::ResampleClamp, bounds()).unwrap();
        let mut retried = 0;

        for seed in 0..500 {
            let mut twin = RandomStream::from_seed(seed);
            let sign = if twin.chance(0.5) { -1.0 } else { 1.0 };
            let draws: Vec<f64> = (0..MAX_RESAMPLES)
                .map(|_| 4.9 + twin.uniform() * 0.1 * sign * bounds().span())
                .collect();
            let first_inside = draws.iter().position(|&d| bounds().contains(d));

            let moved = mutation.perturb(4.9, &mut RandomStream::from_seed(seed));
            match first_inside {
                Some(0) => assert_eq!(moved, draws[0]),
                Some(idx) => {
                    retried += 1;
                    assert_eq!(moved, draws[idx]);
                    assert!(moved < 5.0);
                }
                None => assert_eq!(moved, 5.0),
            }
        }

        assert!(retried > 0);
    }
}
