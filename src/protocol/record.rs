use serde::{Deserialize, Serialize};

use super::types::RequestId;

/// `[32-byte request id][8-byte round][4-byte participants][1-byte winners]`,
/// integers big-endian.
pub const RECORD_LEN: usize = 32 + 8 + 4 + 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("commitment record must be {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },
}

/// Persisted state tying a commitment to its reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentRecord {
    pub request_id: RequestId,
    pub target_round: u64,
    pub participants: u32,
    pub winners: u8,
}

impl CommitmentRecord {
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut out = [0u8; RECORD_LEN];
        out[..32].copy_from_slice(self.request_id.as_bytes());
        out[32..40].copy_from_slice(&self.target_round.to_be_bytes());
        out[40..44].copy_from_slice(&self.participants.to_be_bytes());
        out[44] = self.winners;
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.len() != RECORD_LEN {
            return Err(RecordError::Length {
                expected: RECORD_LEN,
                got: bytes.len(),
            });
        }
        let mut id = [0u8; 32];
        id.copy_from_slice(&bytes[..32]);
        let mut round = [0u8; 8];
        round.copy_from_slice(&bytes[32..40]);
        let mut participants = [0u8; 4];
        participants.copy_from_slice(&bytes[40..44]);

        Ok(Self {
            request_id: RequestId::new(id),
            target_round: u64::from_be_bytes(round),
            participants: u32::from_be_bytes(participants),
            winners: bytes[44],
        })
    }

    pub fn is_revealable_at(&self, round: u64) -> bool {
        round >= self.target_round
    }
}
