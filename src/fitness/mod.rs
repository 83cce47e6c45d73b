//! # Fitness
//!
//! Scores, the direction in which scores improve, and the evaluators that
//! produce them. Two objectives are provided: the sum of squares of a
//! chromosome's (decoded) values and a penalised knapsack value.
//!
//! Every comparison between candidates goes through [`compare`], so selection,
//! the Jaya update and best-of-run tracking agree on what "better" means.

pub mod knapsack;
pub mod sum_of_squares;

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::error::{GeneticError, OptionExt, Result};

pub use knapsack::{KnapsackInstance, KnapsackPenalty};
pub use sum_of_squares::{sum_of_squares, DecodedSumOfSquares, SumOfSquares};

/// Whether larger or smaller fitness values are preferred.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Maximize,
    #[default]
    Minimize,
}

impl Direction {
    pub fn is_maximize(self) -> bool {
        matches!(self, Direction::Maximize)
    }

    /// Sign-adjusts a value so that larger always means better.
    pub fn adjust(self, value: f64) -> f64 {
        match self {
            Direction::Maximize => value,
            Direction::Minimize => -value,
        }
    }
}

/// The result of evaluating one chromosome.
///
/// Constrained objectives attach a penalty: `<= 0` means the candidate is
/// feasible, `> 0` means it violates the constraint by that margin.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub value: f64,
    pub penalty: Option<f64>,
}

impl Score {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            penalty: None,
        }
    }

    pub fn penalized(value: f64, penalty: f64) -> Self {
        Self {
            value,
            penalty: Some(penalty),
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.penalty.map_or(true, |p| p <= 0.0)
    }

    fn is_finite(&self) -> bool {
        self.value.is_finite() && self.penalty.map_or(true, f64::is_finite)
    }
}

/// A score together with the position of the individual it belongs to.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessRecord {
    pub index: usize,
    pub score: Score,
}

/// Orders two scores by quality: `Greater` means `a` is better than `b`.
///
/// Unpenalised scores compare by value in the configured direction. When both
/// scores carry a penalty the feasibility rule applies regardless of
/// direction: two infeasible candidates compare by smaller penalty, a feasible
/// candidate beats an infeasible one, and two feasible candidates compare by
/// larger value.
pub fn compare(direction: Direction, a: &Score, b: &Score) -> Ordering {
    match (a.penalty, b.penalty) {
        (Some(pa), Some(pb)) => match (pa <= 0.0, pb <= 0.0) {
            (false, false) => pb.partial_cmp(&pa).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (true, true) => a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal),
        },
        _ => match direction {
            Direction::Maximize => a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal),
            Direction::Minimize => b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal),
        },
    }
}

/// Returns `true` when `candidate` is strictly better than `incumbent`.
pub fn is_better(direction: Direction, candidate: &Score, incumbent: &Score) -> bool {
    compare(direction, candidate, incumbent) == Ordering::Greater
}

/// Index of the best score; the first one wins ties.
pub fn best_index(direction: Direction, scores: &[Score]) -> Option<usize> {
    let mut iter = scores.iter().enumerate();
    let (mut best, mut best_score) = iter.next()?;
    for (idx, score) in iter {
        if is_better(direction, score, best_score) {
            best = idx;
            best_score = score;
        }
    }
    Some(best)
}

/// Index of the worst score; the first one wins ties.
pub fn worst_index(direction: Direction, scores: &[Score]) -> Option<usize> {
    let mut iter = scores.iter().enumerate();
    let (mut worst, mut worst_score) = iter.next()?;
    for (idx, score) in iter {
        if is_better(direction, worst_score, score) {
            worst = idx;
            worst_score = score;
        }
    }
    Some(worst)
}

/// Raw extremes and mean of one generation's fitness values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Highest value, first occurrence.
    pub high: FitnessRecord,
    /// Lowest value, first occurrence.
    pub low: FitnessRecord,
    pub average: f64,
}

impl GenerationStats {
    /// Summarizes a generation's scores.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::EmptyPopulation` if `scores` is empty.
    pub fn from_scores(scores: &[Score]) -> Result<Self> {
        let first = scores
            .first()
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        let mut high = FitnessRecord {
            index: 0,
            score: *first,
        };
        let mut low = high;
        let mut total = first.value;

        for (index, score) in scores.iter().enumerate().skip(1) {
            total += score.value;
            if score.value > high.score.value {
                high = FitnessRecord { index, score: *score };
            }
            if score.value < low.score.value {
                low = FitnessRecord { index, score: *score };
            }
        }

        Ok(Self {
            high,
            low,
            average: total / scores.len() as f64,
        })
    }
}

/// Computes the fitness of a single chromosome.
pub trait FitnessEvaluator<P>: Debug + Send + Sync {
    fn evaluate(&self, individual: &P) -> Score;
}

/// Evaluates every individual of a generation, in order.
///
/// # Errors
///
/// Returns `GeneticError::FitnessCalculation` if any score is NaN or infinite.
pub fn evaluate_all<P, E>(evaluator: &E, population: &[P]) -> Result<Vec<Score>>
where
    E: FitnessEvaluator<P> + ?Sized,
{
    population
        .iter()
        .enumerate()
        .map(|(idx, individual)| {
            let score = evaluator.evaluate(individual);
            if !score.is_finite() {
                return Err(GeneticError::FitnessCalculation(format!(
                    "Non-finite fitness score {:?} for individual {}",
                    score, idx
                )));
            }
            Ok(score)
        })
        .collect()
}
