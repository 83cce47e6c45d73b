//! # Chromosome Codec
//!
//! Maps packed bit-strings onto real values. A packed chromosome is a single
//! unsigned integer whose bits are split into contiguous fields, most
//! significant field first. Each field is read as an unsigned integer in
//! `[0, 2^len)`, divided by `2^len` and scaled linearly into `[min, max)`.
//!
//! ## Example
//!
//! ```rust
//! use evorun::chromosome::codec::decode;
//!
//! // Fields 0b10 and 0b11 of a 4-bit chromosome.
//! let values = decode(0b1011, &[2, 2], 0.0, 4.0);
//! assert_eq!(values, vec![2.0, 3.0]);
//! ```

use crate::chromosome::packed::{PackedBits, MAX_WIDTH};
use crate::error::{GeneticError, Result};

/// Inclusive value range shared by every gene of a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min: f64,
    max: f64,
}

impl Bounds {
    /// Creates a new range. `max` must be strictly greater than `min` and both
    /// must be finite.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(GeneticError::Configuration(format!(
                "Bounds must be finite, got [{}, {}]",
                min, max
            )));
        }
        if max <= min {
            return Err(GeneticError::Configuration(format!(
                "Maximum value ({}) must be greater than minimum value ({})",
                max, min
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the range, `max - min`.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Maps a normalized value in `[0, 1)` into the range.
    pub fn scale(&self, normalized: f64) -> f64 {
        self.min + self.span() * normalized
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: -1.0,
            max: 5.0,
        }
    }
}

/// Field layout of a packed chromosome together with the range its fields map to.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BitCodec {
    bit_lengths: Vec<u32>,
    bounds: Bounds,
}

impl BitCodec {
    /// Creates a codec for the given field lengths.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no fields are given, a field has zero
    /// length, or the total width exceeds 128 bits.
    pub fn new(bit_lengths: Vec<u32>, bounds: Bounds) -> Result<Self> {
        if bit_lengths.is_empty() {
            return Err(GeneticError::Configuration(
                "At least one bit field length is required".to_string(),
            ));
        }
        if let Some(pos) = bit_lengths.iter().position(|&len| len == 0) {
            return Err(GeneticError::Configuration(format!(
                "Bit field {} has zero length",
                pos
            )));
        }
        let width: u32 = bit_lengths.iter().sum();
        if width > MAX_WIDTH {
            return Err(GeneticError::Configuration(format!(
                "Total bit width {} exceeds the supported maximum of {}",
                width, MAX_WIDTH
            )));
        }
        Ok(Self {
            bit_lengths,
            bounds,
        })
    }

    pub fn bit_lengths(&self) -> &[u32] {
        &self.bit_lengths
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Total number of bits, the sum of all field lengths.
    pub fn width(&self) -> u32 {
        self.bit_lengths.iter().sum()
    }

    /// Decodes every field of `chromosome` into its real value.
    ///
    /// # Panics
    ///
    /// Panics if the chromosome width differs from the codec width.
    pub fn decode(&self, chromosome: &PackedBits) -> Vec<f64> {
        assert_eq!(
            chromosome.width(),
            self.width(),
            "chromosome width does not match codec width"
        );
        decode(
            chromosome.bits(),
            &self.bit_lengths,
            self.bounds.min,
            self.bounds.max,
        )
    }

    /// Splits `chromosome` into its raw unsigned field values, most significant first.
    pub fn fields(&self, chromosome: &PackedBits) -> Vec<u128> {
        assert_eq!(
            chromosome.width(),
            self.width(),
            "chromosome width does not match codec width"
        );
        split_fields(chromosome.bits(), &self.bit_lengths).collect()
    }
}

/// Low-`len`-bit mask. A length of 128 selects every bit.
pub(crate) fn low_mask(len: u32) -> u128 {
    if len >= MAX_WIDTH {
        u128::MAX
    } else {
        (1u128 << len) - 1
    }
}

fn split_fields(chromo: u128, bit_lengths: &[u32]) -> impl Iterator<Item = u128> + '_ {
    let mut break_point: u32 = bit_lengths.iter().sum();
    bit_lengths.iter().map(move |&len| {
        break_point -= len;
        let shifted = if break_point >= MAX_WIDTH {
            0
        } else {
            chromo >> break_point
        };
        shifted & low_mask(len)
    })
}

/// Decodes a packed chromosome into one real value per field.
///
/// Each field is normalized by dividing by `2^len` and mapped to
/// `min_val + (max_val - min_val) * normalized`.
///
/// # Panics
///
/// Panics if the field lengths sum to more than 128 bits or `chromo` has bits
/// set above the declared width.
pub fn decode(chromo: u128, bit_lengths: &[u32], min_val: f64, max_val: f64) -> Vec<f64> {
    let width: u32 = bit_lengths.iter().sum();
    assert!(
        width <= MAX_WIDTH,
        "bit fields span {} bits, more than {}",
        width,
        MAX_WIDTH
    );
    assert!(
        chromo & !low_mask(width) == 0,
        "chromosome has bits set outside its {}-bit width",
        width
    );

    let diff = max_val - min_val;
    split_fields(chromo, bit_lengths)
        .zip(bit_lengths)
        .map(|(field, &len)| {
            let normalized = field as f64 / 2f64.powi(len as i32);
            min_val + diff * normalized
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_two_fields() {
        // 0b10 -> 2/4, 0b11 -> 3/4
        assert_eq!(decode(0b1011, &[2, 2], 0.0, 3.0), vec![1.5, 2.25]);
        assert_eq!(decode(0b1011, &[2, 2], 0.0, 4.0), vec![2.0, 3.0]);
    }

    #[test]
    fn test_decode_zero_is_min() {
        let values = decode(0, &[10, 15, 20], -1.0, 5.0);
        assert_eq!(values, vec![-1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_decode_all_ones_below_max() {
        let values = decode(0b111_1111, &[3, 4], -1.0, 5.0);
        assert_eq!(values[0], -1.0 + 6.0 * (7.0 / 8.0));
        assert_eq!(values[1], -1.0 + 6.0 * (15.0 / 16.0));
        assert!(values.iter().all(|&v| v < 5.0));
    }

    #[test]
    fn test_decode_full_width() {
        let values = decode(u128::MAX, &[64, 64], 0.0, 1.0);
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|&v| v <= 1.0));
    }

    #[test]
    #[should_panic(expected = "outside its")]
    fn test_decode_rejects_stray_bits() {
        decode(0b1_0000, &[2, 2], 0.0, 1.0);
    }

    #[test]
    fn test_codec_validation() {
        let bounds = Bounds::new(-1.0, 5.0).unwrap();
        assert!(BitCodec::new(vec![], bounds).is_err());
        assert!(BitCodec::new(vec![4, 0], bounds).is_err());
        assert!(BitCodec::new(vec![100, 29], bounds).is_err());

        let codec = BitCodec::new(vec![10, 15, 20], bounds).unwrap();
        assert_eq!(codec.width(), 45);
    }

    #[test]
    fn test_codec_fields_and_decode() {
        let bounds = Bounds::new(0.0, 4.0).unwrap();
        let codec = BitCodec::new(vec![2, 2], bounds).unwrap();
        let chromosome = PackedBits::new(0b1011, 4);
        assert_eq!(codec.fields(&chromosome), vec![0b10, 0b11]);
        assert_eq!(codec.decode(&chromosome), vec![2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "does not match codec width")]
    fn test_codec_width_mismatch_panics() {
        let bounds = Bounds::new(0.0, 4.0).unwrap();
        let codec = BitCodec::new(vec![2, 2], bounds).unwrap();
        codec.decode(&PackedBits::new(0b1, 5));
    }

    #[test]
    fn test_bounds() {
        assert!(Bounds::new(1.0, 1.0).is_err());
        assert!(Bounds::new(2.0, 1.0).is_err());
        assert!(Bounds::new(f64::NAN, 1.0).is_err());

        let bounds = Bounds::new(-1.0, 5.0).unwrap();
        assert_eq!(bounds.span(), 6.0);
        assert_eq!(bounds.clamp(7.0), 5.0);
        assert_eq!(bounds.clamp(-3.0), -1.0);
        assert_eq!(bounds.clamp(2.0), 2.0);
        assert!(bounds.contains(5.0));
        assert!(!bounds.contains(5.5));
        assert_eq!(bounds.scale(0.5), 2.0);
    }
}
