#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntropyError {
    #[error("precision must be between 1 and {max} fractional bits, got {got}")]
    InvalidPrecision { got: u8, max: u8 },
    #[error("cannot select {winners} ordered items out of {participants}")]
    SelectionTooLarge { participants: u32, winners: u8 },
    #[error(
        "The number of k-permutation exceeds the safety parameters \
         (entropy {entropy} > limit {limit})"
    )]
    SafetyBoundExceeded { entropy: u64, limit: u64 },
}
