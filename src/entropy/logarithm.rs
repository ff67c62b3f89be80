use std::fmt;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use super::error::EntropyError;

const MANTISSA_SCALE: u32 = 63;

/// Number of fractional bits carried by a fixed-point logarithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Precision(u8);

impl Precision {
    pub const DEFAULT: Precision = Precision(16);
    pub const MAX_BITS: u8 = 32;

    pub fn new(bits: u8) -> Result<Self, EntropyError> {
        if bits == 0 || bits > Self::MAX_BITS {
            return Err(EntropyError::InvalidPrecision {
                got: bits,
                max: Self::MAX_BITS,
            });
        }
        Ok(Self(bits))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// The value `1.0` in this fixed-point representation.
    pub const fn one(self) -> u64 {
        1u64 << self.0
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Precision {
    type Error = EntropyError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<Precision> for u8 {
    fn from(precision: Precision) -> Self {
        precision.0
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fractional bits", self.0)
    }
}

/// Fixed-point `log2(n)`, never below the true value.
///
/// Powers of two are exact. Any other input has its fraction extracted one bit
/// per squaring of a mantissa left-aligned to 63 fractional bits. The truncated
/// result then has its low bit forced on, or is bumped by one unit when that bit
/// is already set, so it always lands above `log2(n) * 2^P`.
pub fn binary_logarithm(n: NonZeroU64, precision: Precision) -> u64 {
    let value = n.get();
    let exponent = value.ilog2();
    let integer_part = u64::from(exponent);
    let bits = u32::from(precision.bits());

    if value.is_power_of_two() {
        return integer_part << bits;
    }

    // Mantissa in [2^63, 2^64), i.e. [1, 2) at scale 2^63. Its square stays
    // below 2^128 so u128 never truncates it.
    let one = 1u128 << MANTISSA_SCALE;
    let doubled = one << 1;
    let mut mantissa = u128::from(value) << (MANTISSA_SCALE - exponent);
    let mut fraction = 0u64;
    for _ in 0..bits {
        fraction <<= 1;
        mantissa = (mantissa * mantissa) >> MANTISSA_SCALE;
        if mantissa >= doubled {
            fraction |= 1;
            mantissa >>= 1;
        }
    }

    let truncated = (integer_part << bits) | fraction;
    if truncated & 1 == 1 {
        truncated + 1
    } else {
        truncated | 1
    }
}

/// Renders a fixed-point value as a float. Diagnostics only.
pub fn fixed_to_f64(value: u64, precision: Precision) -> f64 {
    value as f64 / precision.one() as f64
}
