//! Fixed-point entropy accounting for k-permutations.
//!
//! Every logarithm rounds up, so a sum of them bounds the true entropy from
//! above and an admitted selection never has more than `2^128` orderings. The
//! permutation sum saturates instead of wrapping.

mod error;
mod logarithm;
mod permutation;

pub use error::EntropyError;
pub use logarithm::{binary_logarithm, fixed_to_f64, Precision};
pub use permutation::{
    ensure_within_safety_bound, k_permutation_entropy, safety_limit, SafetyBound,
    MAX_SAFE_WINNERS, SEED_ENTROPY_BITS,
};
