use crate::breeding::MutationOperator;
use crate::chromosome::codec::low_mask;
use crate::phenotype::Phenotype;
use crate::rng::RandomStream;

/// Largest supported packed chromosome width, in bits.
pub const MAX_WIDTH: u32 = 128;

/// A fixed-width bit-string stored in a single unsigned integer.
///
/// Bit `width - 1` is the most significant position. Crossover points count
/// from that end: a point `p` keeps the top `p` bits of each parent and swaps
/// the remaining `width - p` low bits.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedBits {
    bits: u128,
    width: u32,
}

impl PackedBits {
    /// Creates a chromosome from raw bits.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds 128 or `bits` has bits set at or above `width`.
    pub fn new(bits: u128, width: u32) -> Self {
        assert!(
            width <= MAX_WIDTH,
            "packed width {} exceeds {}",
            width,
            MAX_WIDTH
        );
        assert!(
            bits & !low_mask(width) == 0,
            "bits {:#b} do not fit in width {}",
            bits,
            width
        );
        Self { bits, width }
    }

    /// Builds a chromosome whose bits are each set with probability one half,
    /// drawing from the most significant bit down.
    pub fn random(width: u32, rng: &mut RandomStream) -> Self {
        let mut bits = 0u128;
        for pos in (0..width).rev() {
            if rng.chance(0.5) {
                bits |= 1u128 << pos;
            }
        }
        Self::new(bits, width)
    }

    pub fn bits(&self) -> u128 {
        self.bits
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the bit at `pos`, counted from the least significant end.
    pub fn bit(&self, pos: u32) -> bool {
        pos < self.width && (self.bits >> pos) & 1 == 1
    }

    /// Flips the bit at `pos`, counted from the least significant end.
    pub fn flip(&mut self, pos: u32) {
        assert!(pos < self.width, "bit {} outside width {}", pos, self.width);
        self.bits ^= 1u128 << pos;
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.bits.count_ones()
    }
}

impl Phenotype for PackedBits {
    fn width(&self) -> usize {
        self.width as usize
    }

    fn crossover(&mut self, other: &mut Self, point: usize) {
        assert_eq!(self.width, other.width, "crossover between different widths");
        if point >= self.width as usize {
            return;
        }
        let mask = low_mask(self.width - point as u32);
        let mine = self.bits & mask;
        let theirs = other.bits & mask;
        self.bits = (self.bits & !mask) | theirs;
        other.bits = (other.bits & !mask) | mine;
    }

    fn mutate(&mut self, mutation: &MutationOperator, rng: &mut RandomStream) {
        for pos in 0..self.width {
            if rng.chance(mutation.get_probability()) {
                self.flip(pos);
            }
        }
    }
}
