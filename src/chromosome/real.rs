use crate::breeding::MutationOperator;
use crate::chromosome::codec::Bounds;
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;

/// A fixed-length vector of real-valued genes.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RealVector {
    genes: Vec<f64>,
}

impl RealVector {
    pub fn new(genes: Vec<f64>) -> Self {
        Self { genes }
    }

    /// Draws `size` genes uniformly from `bounds`, in order.
    pub fn random(size: usize, bounds: Bounds, rng: &mut RandomStream) -> Self {
        let genes = (0..size)
            .map(|_| rng.uniform_range(bounds.min(), bounds.max()))
            .collect();
        Self { genes }
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut [f64] {
        &mut self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn into_genes(self) -> Vec<f64> {
        self.genes
    }
}

impl From<Vec<f64>> for RealVector {
    fn from(genes: Vec<f64>) -> Self {
        Self::new(genes)
    }
}

impl Phenotype for RealVector {
    fn width(&self) -> usize {
        self.genes.len()
    }

    fn crossover(&mut self, other: &mut Self, point: usize) {
        assert_eq!(
            self.genes.len(),
            other.genes.len(),
            "crossover between vectors of different lengths"
        );
        if point >= self.genes.len() {
            return;
        }
        self.genes[point..].swap_with_slice(&mut other.genes[point..]);
    }

    fn mutate(&mut self, mutation: &MutationOperator, rng: &mut RandomStream) {
        for gene in self.genes.iter_mut() {
            if rng.chance(mutation.get_probability()) {
                *gene = mutation.perturb(*gene, rng);
            }
        }
    }
}
