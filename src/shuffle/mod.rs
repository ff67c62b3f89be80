//! Sparse partial Fisher-Yates shuffle.

mod error;
mod knuth;
mod sparse;

pub use error::ShuffleError;
pub use knuth::{draw_winners, draw_winners_with};
pub use sparse::{SparsePermutation, DEFAULT_BUCKETS};

#[cfg(test)]
mod tests;
