//! # Jaya Engine
//!
//! A parameter-free update rule for real vectors. Each step draws two
//! coefficient vectors `r1` and `r2` (one value per gene, shared by the whole
//! generation) and proposes, for every candidate,
//!
//! ```text
//! new[g] = gene[g] + r1[g] * (best[g] - |gene[g]|) - r2[g] * (worst[g] - |gene[g]|)
//! ```
//!
//! clamped into the bounds. A proposal replaces its candidate only if it is
//! strictly better. Best and worst are taken from the generation as it was at
//! the start of the step.

use crate::chromosome::{Bounds, RealVector};
use crate::error::{GeneticError, OptionExt, Result};
use crate::evolution::engine::Engine;
use crate::fitness::{
    best_index, evaluate_all, is_better, worst_index, Direction, FitnessEvaluator, Score,
};
use crate::rng::RandomStream;

#[derive(Debug)]
pub struct JayaEngine {
    evaluator: Box<dyn FitnessEvaluator<RealVector>>,
    bounds: Bounds,
    direction: Direction,
}

impl JayaEngine {
    pub fn new(
        evaluator: Box<dyn FitnessEvaluator<RealVector>>,
        bounds: Bounds,
        direction: Direction,
    ) -> Self {
        Self {
            evaluator,
            bounds,
            direction,
        }
    }

    pub fn get_bounds(&self) -> Bounds {
        self.bounds
    }

    /// Draws `r1[g]` and `r2[g]` alternately for every gene.
    fn coefficients(size: usize, rng: &mut RandomStream) -> (Vec<f64>, Vec<f64>) {
        (0..size).map(|_| (rng.uniform(), rng.uniform())).unzip()
    }

    /// Builds the proposal for one candidate.
    pub fn propose(
        &self,
        candidate: &RealVector,
        best: &RealVector,
        worst: &RealVector,
        r1: &[f64],
        r2: &[f64],
    ) -> RealVector {
        candidate
            .genes()
            .iter()
            .enumerate()
            .map(|(g, &gene)| {
                let mut value = gene + r1[g] * (best.genes()[g] - gene.abs());
                value -= r2[g] * (worst.genes()[g] - gene.abs());
                self.bounds.clamp(value)
            })
            .collect::<Vec<f64>>()
            .into()
    }
}

impl Engine<RealVector> for JayaEngine {
    fn evaluator(&self) -> &dyn FitnessEvaluator<RealVector> {
        self.evaluator.as_ref()
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn step(
        &self,
        generation: &mut Vec<RealVector>,
        scores: &[Score],
        rng: &mut RandomStream,
    ) -> Result<()> {
        if scores.len() != generation.len() {
            return Err(GeneticError::Selection(format!(
                "Score count ({}) doesn't match population size ({})",
                scores.len(),
                generation.len()
            )));
        }
        let best = best_index(self.direction, scores)
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        let worst = worst_index(self.direction, scores)
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        let best = generation[best].clone();
        let worst = generation[worst].clone();

        let (r1, r2) = Self::coefficients(best.len(), rng);

        let proposals: Vec<RealVector> = generation
            .iter()
            .map(|candidate| self.propose(candidate, &best, &worst, &r1, &r2))
            .collect();
        let proposal_scores = evaluate_all(self.evaluator.as_ref(), &proposals)?;

        for ((slot, score), (proposal, proposal_score)) in generation
            .iter_mut()
            .zip(scores)
            .zip(proposals.into_iter().zip(&proposal_scores))
        {
            if is_better(self.direction, proposal_score, score) {
                *slot = proposal;
            }
        }
        Ok(())
    }
}
