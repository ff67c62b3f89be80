use crate::prng::RangeError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShuffleError {
    #[error("cannot draw {winners} winners from {participants} participants")]
    InvalidSelection { participants: u32, winners: u8 },
    #[error("sparse permutation needs at least one bucket")]
    NoBuckets,
    #[error("draw failed: {0}")]
    Range(#[from] RangeError),
}
