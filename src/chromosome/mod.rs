//! # Chromosomes
//!
//! The two encodings a run can evolve: [`RealVector`] holds genes directly,
//! [`PackedBits`] packs them into bit fields that a [`BitCodec`] decodes.
//! [`Chromosome`] is the encoding-erased form stored in run results.

pub mod codec;
pub mod packed;
pub mod real;

pub use codec::{decode, BitCodec, Bounds};
pub use packed::PackedBits;
pub use real::RealVector;

/// A chromosome of either encoding, as recorded in results.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Chromosome {
    Real(RealVector),
    Packed(PackedBits),
}

impl Chromosome {
    pub fn as_real(&self) -> Option<&RealVector> {
        match self {
            Chromosome::Real(v) => Some(v),
            Chromosome::Packed(_) => None,
        }
    }

    pub fn as_packed(&self) -> Option<&PackedBits> {
        match self {
            Chromosome::Packed(p) => Some(p),
            Chromosome::Real(_) => None,
        }
    }
}

impl From<RealVector> for Chromosome {
    fn from(value: RealVector) -> Self {
        Chromosome::Real(value)
    }
}

impl From<PackedBits> for Chromosome {
    fn from(value: PackedBits) -> Self {
        Chromosome::Packed(value)
    }
}
