use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use super::error::EntropyError;
use super::logarithm::{binary_logarithm, fixed_to_f64, Precision};

/// Bits of entropy a single bounded draw can spend on the ordering.
pub const SEED_ENTROPY_BITS: u64 = 128;

/// Largest `k` for which the full permutation of `k` items stays admissible
/// at the default precision.
/// `log2(34!)` is about 127.8 bits while `log2(35!)` is about 132.9.
pub const MAX_SAFE_WINNERS: u8 = 34;

/// Running products stay strictly below this before being log-reduced.
const PRODUCT_CEILING: u64 = 1 << 63;

/// `SEED_ENTROPY_BITS` in fixed point.
pub fn safety_limit(precision: Precision) -> u64 {
    SEED_ENTROPY_BITS << precision.bits()
}

/// Fixed-point `log2(n! / (n - k)!)`.
///
/// Consecutive factors are folded into one 64-bit product for as long as it
/// stays under 2^63, so a single logarithm covers several terms and its
/// rounding slack is paid once per product rather than once per factor.
/// The accumulator saturates rather than wraps.
pub fn k_permutation_entropy(
    participants: u32,
    winners: u8,
    precision: Precision,
) -> Result<u64, EntropyError> {
    if u32::from(winners) > participants {
        return Err(EntropyError::SelectionTooLarge {
            participants,
            winners,
        });
    }

    let log = |product: u64| {
        NonZeroU64::new(product).map_or(0, |value| binary_logarithm(value, precision))
    };

    let upper = u64::from(participants);
    let lower = upper - u64::from(winners) + 1;
    let mut product = 1u64;
    let mut sum = 0u64;
    for factor in lower..=upper {
        match product.checked_mul(factor) {
            Some(next) if next < PRODUCT_CEILING => product = next,
            _ => {
                sum = sum.saturating_add(log(product));
                product = factor;
            }
        }
    }

    Ok(sum.saturating_add(log(product)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyBound {
    pub entropy: u64,
    pub limit: u64,
    pub precision: Precision,
}

impl SafetyBound {
    pub fn evaluate(
        participants: u32,
        winners: u8,
        precision: Precision,
    ) -> Result<Self, EntropyError> {
        Ok(Self {
            entropy: k_permutation_entropy(participants, winners, precision)?,
            limit: safety_limit(precision),
            precision,
        })
    }

    pub fn is_safe(&self) -> bool {
        self.entropy <= self.limit
    }

    pub fn entropy_bits(&self) -> f64 {
        fixed_to_f64(self.entropy, self.precision)
    }

    pub fn headroom(&self) -> i128 {
        i128::from(self.limit) - i128::from(self.entropy)
    }
}

/// Rejects selections whose ordering count may exceed `2^128`.
pub fn ensure_within_safety_bound(
    participants: u32,
    winners: u8,
    precision: Precision,
) -> Result<SafetyBound, EntropyError> {
    let bound = SafetyBound::evaluate(participants, winners, precision)?;
    if !bound.is_safe() {
        return Err(EntropyError::SafetyBoundExceeded {
            entropy: bound.entropy,
            limit: bound.limit,
        });
    }
    Ok(bound)
}
