use crate::config::ConfigError;
use crate::entropy::EntropyError;
use crate::shuffle::ShuffleError;

use super::beacon::BeaconError;
use super::budget::BudgetError;
use super::storage::StoreError;
use super::types::CommitterId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The round delay is less than the safety parameters (delay {delay}, gap {gap})")]
    RoundDelayTooShort { delay: u8, gap: u64 },
    #[error("There must be at least one winner and less than 35")]
    WinnerCount(u8),
    #[error("There must be at least two participants")]
    ParticipantCount(u32),
    #[error("Winners must be less than or equal to Participants")]
    WinnersExceedParticipants { participants: u32, winners: u8 },
    #[error("target round overflows: {round} + {delay}")]
    RoundOverflow { round: u64, delay: u8 },
}

#[derive(Debug, thiserror::Error)]
pub enum ShuffleProtocolError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("The number of k-permutation exceeds the safety parameters (entropy {entropy}, limit {limit})")]
    SafetyBoundExceeded { entropy: u64, limit: u64 },
    #[error("The committed round has not elapsed yet (current {current}, target {target})")]
    RoundNotElapsed { current: u64, target: u64 },
    #[error("no active commitment for {0}")]
    NoActiveCommitment(CommitterId),
    #[error("a commitment is already pending until round {target_round}")]
    CommitmentPending { target_round: u64 },
    #[error("randomness beacon unavailable: {0}")]
    BeaconUnavailable(#[from] BeaconError),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("budget error: {0}")]
    Budget(#[from] BudgetError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("entropy error: {0}")]
    Entropy(EntropyError),
    #[error("shuffle error: {0}")]
    Shuffle(#[from] ShuffleError),
}

impl ShuffleProtocolError {
    /// Errors that clear up by retrying the same call later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RoundNotElapsed { .. } | Self::BeaconUnavailable(_)
        )
    }
}

impl From<EntropyError> for ShuffleProtocolError {
    fn from(err: EntropyError) -> Self {
        match err {
            EntropyError::SafetyBoundExceeded { entropy, limit } => {
                Self::SafetyBoundExceeded { entropy, limit }
            }
            other => Self::Entropy(other),
        }
    }
}
