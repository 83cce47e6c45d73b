//! # Engines
//!
//! An engine advances one generation in place. The generational engine runs
//! selection, crossover and mutation; the Jaya engine (see
//! [`crate::evolution::jaya`]) moves each candidate relative to the current
//! best and worst instead.

use std::fmt::Debug;

use crate::breeding::{CrossoverOperator, MutationOperator};
use crate::error::Result;
use crate::fitness::{Direction, FitnessEvaluator, Score};
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;
use crate::selection::SelectionStrategy;

/// Advances a generation by one step.
pub trait Engine<P>: Debug + Send + Sync
where
    P: Phenotype,
{
    /// The evaluator that defines quality for this engine.
    fn evaluator(&self) -> &dyn FitnessEvaluator<P>;

    fn direction(&self) -> Direction;

    /// Replaces `generation` with its successor.
    ///
    /// `scores` holds the current fitness of every individual, in order. The
    /// generation keeps its size.
    ///
    /// # Errors
    ///
    /// Propagates selection and fitness errors.
    fn step(
        &self,
        generation: &mut Vec<P>,
        scores: &[Score],
        rng: &mut RandomStream,
    ) -> Result<()>;
}

/// Non-elitist generational engine: selection, then crossover, then mutation.
///
/// Random draws happen in that order every step, so a run is reproducible
/// from its seed.
#[derive(Debug)]
pub struct GenerationEngine<P>
where
    P: Phenotype,
{
    evaluator: Box<dyn FitnessEvaluator<P>>,
    selection: Box<dyn SelectionStrategy<P>>,
    crossover: CrossoverOperator,
    mutation: MutationOperator,
    direction: Direction,
}

impl<P> GenerationEngine<P>
where
    P: Phenotype,
{
    pub fn new(
        evaluator: Box<dyn FitnessEvaluator<P>>,
        selection: Box<dyn SelectionStrategy<P>>,
        crossover: CrossoverOperator,
        mutation: MutationOperator,
        direction: Direction,
    ) -> Self {
        Self {
            evaluator,
            selection,
            crossover,
            mutation,
            direction,
        }
    }

    pub fn get_crossover(&self) -> &CrossoverOperator {
        &self.crossover
    }

    pub fn get_mutation(&self) -> &MutationOperator {
        &self.mutation
    }
}

impl<P> Engine<P> for GenerationEngine<P>
where
    P: Phenotype,
{
    fn evaluator(&self) -> &dyn FitnessEvaluator<P> {
        self.evaluator.as_ref()
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn step(
        &self,
        generation: &mut Vec<P>,
        scores: &[Score],
        rng: &mut RandomStream,
    ) -> Result<()> {
        let mut next = self.selection.select(generation, scores, rng)?;
        self.crossover.apply(&mut next, rng);
        self.mutation.apply(&mut next, rng);

        assert_eq!(
            next.len(),
            generation.len(),
            "a generation step must preserve the population size"
        );
        *generation = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breeding::RealMutation;
    use crate::chromosome::{BitCodec, Bounds, PackedBits, RealVector};
    use crate::fitness::{evaluate_all, DecodedSumOfSquares, SumOfSquares};
    use crate::selection::{LinearRankingSelection, TournamentSelection};

    fn real_engine() -> GenerationEngine<RealVector> {
        let bounds = Bounds::new(-1.0, 5.0).unwrap();
        GenerationEngine::new(
            Box::new(SumOfSquares),
            Box::new(TournamentSelection::new(Direction::Minimize)),
            CrossoverOperator::new(1, 0.8, 3).unwrap(),
            MutationOperator::new(0.1, 0.01, RealMutation::ResampleClamp, bounds).unwrap(),
            Direction::Minimize,
        )
    }

    #[test]
    fn test_step_preserves_size_and_bounds() {
        let engine = real_engine();
        let bounds = Bounds::new(-1.0, 5.0).unwrap();
        let mut rng = RandomStream::from_seed(4);
        let mut generation: Vec<RealVector> = (0..7)
            .map(|_| RealVector::random(3, bounds, &mut rng))
            .collect();

        for _ in 0..20 {
            let scores = evaluate_all(engine.evaluator(), &generation).unwrap();
            engine.step(&mut generation, &scores, &mut rng).unwrap();
            assert_eq!(generation.len(), 7);
            assert!(generation
                .iter()
                .all(|c| c.len() == 3 && c.genes().iter().all(|&g| bounds.contains(g))));
        }
    }

    #[test]
    fn test_step_is_deterministic() {
        let engine = real_engine();
        let bounds = Bounds::new(-1.0, 5.0).unwrap();

        let run = |seed| {
            let mut rng = RandomStream::from_seed(seed);
            let mut generation: Vec<RealVector> = (0..6)
                .map(|_| RealVector::random(3, bounds, &mut rng))
                .collect();
            for _ in 0..5 {
                let scores = evaluate_all(engine.evaluator(), &generation).unwrap();
                engine.step(&mut generation, &scores, &mut rng).unwrap();
            }
            generation
        };

        assert_eq!(run(9), run(9));
    }

    #[test]
    fn test_packed_step() {
        let bounds = Bounds::new(-1.0, 5.0).unwrap();
        let codec = BitCodec::new(vec![4, 4], bounds).unwrap();
        let engine: GenerationEngine<PackedBits> = GenerationEngine::new(
            Box::new(DecodedSumOfSquares::new(codec)),
            Box::new(LinearRankingSelection::new(Direction::Minimize)),
            CrossoverOperator::new(4, 1.0, 8).unwrap(),
            MutationOperator::new(0.05, 0.01, RealMutation::ResampleClamp, bounds).unwrap(),
            Direction::Minimize,
        );
        let mut rng = RandomStream::from_seed(12);
        let mut generation: Vec<PackedBits> =
            (0..5).map(|_| PackedBits::random(8, &mut rng)).collect();
        let scores = evaluate_all(engine.evaluator(), &generation).unwrap();
        engine.step(&mut generation, &scores, &mut rng).unwrap();
        assert_eq!(generation.len(), 5);
        assert!(generation.iter().all(|c| c.width() == 8));
    }

    #[test]
    fn test_mismatched_scores() {
        let engine = real_engine();
        let mut rng = RandomStream::from_seed(4);
        let mut generation = vec![RealVector::new(vec![0.0, 0.0, 0.0]); 3];
        assert!(engine
            .step(&mut generation, &[Score::new(0.0)], &mut rng)
            .is_err());
    }
}
