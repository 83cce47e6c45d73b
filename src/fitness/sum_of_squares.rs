use crate::chromosome::{BitCodec, PackedBits, RealVector};
use crate::fitness::{FitnessEvaluator, Score};

/// Sum of the squares of `values`.
pub fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, x| acc + x * x)
}

/// Sum of squares over the genes of a real vector.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SumOfSquares;

impl FitnessEvaluator<RealVector> for SumOfSquares {
    fn evaluate(&self, individual: &RealVector) -> Score {
        Score::new(sum_of_squares(individual.genes()))
    }
}

/// Sum of squares over the decoded fields of a packed chromosome.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSumOfSquares {
    codec: BitCodec,
}

impl DecodedSumOfSquares {
    pub fn new(codec: BitCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &BitCodec {
        &self.codec
    }
}

impl FitnessEvaluator<PackedBits> for DecodedSumOfSquares {
    fn evaluate(&self, individual: &PackedBits) -> Score {
        Score::new(sum_of_squares(&self.codec.decode(individual)))
    }
}
