use tracing::trace;

use crate::prng::{Pcg128, Seed};

use super::error::ShuffleError;
use super::sparse::{SparsePermutation, DEFAULT_BUCKETS};

const LOG_TARGET: &str = "verifiable_shuffle::shuffle";

/// Ordered, 0-based winners for `winners` picks out of `participants`.
pub fn draw_winners(
    participants: u32,
    winners: u8,
    seed: &Seed,
) -> Result<Vec<u32>, ShuffleError> {
    let mut rng = Pcg128::from_seed(seed);
    draw_winners_with(participants, winners, &mut rng, DEFAULT_BUCKETS)
}

/// Partial Fisher-Yates over an implicit `[0, participants)` array.
///
/// Runs `min(winners, participants - 1)` swap steps, each drawing from
/// `[i, participants)`. A full permutation takes its final element from the
/// map instead of drawing from a one-value range.
pub fn draw_winners_with(
    participants: u32,
    winners: u8,
    rng: &mut Pcg128,
    buckets: usize,
) -> Result<Vec<u32>, ShuffleError> {
    let picks = u32::from(winners);
    if participants == 0 || picks > participants {
        return Err(ShuffleError::InvalidSelection {
            participants,
            winners,
        });
    }

    let mut permutation = SparsePermutation::with_buckets(buckets)?;
    let steps = picks.min(participants - 1);
    let mut selected = Vec::with_capacity(usize::from(winners));

    for i in 0..steps {
        let drawn = rng.random_range(u128::from(i), u128::from(participants))?;
        // drawn < participants, which is a u32
        let j = drawn as u32;
        let at_i = permutation.get(i);
        let at_j = permutation.get(j);
        trace!(target: LOG_TARGET, step = i, j, value = at_j, "swap");
        selected.push(at_j);
        permutation.set(j, at_i);
    }

    if picks == participants {
        selected.push(permutation.get(participants - 1));
    }

    Ok(selected)
}
