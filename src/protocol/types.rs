use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex32;

/// Identifier of the request that created a commitment.
///
/// Doubles as the beacon nonce, so two commitments targeting the same round
/// still receive unrelated randomness.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(#[serde(with = "crate::hex32")] [u8; 32]);

impl RequestId {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl From<[u8; 32]> for RequestId {
    fn from(bytes: [u8; 32]) -> Self {
        RequestId::new(bytes)
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", hex32::encode(&self.0))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex32::encode(&self.0))
    }
}

/// Account that owns a commitment. At most one live record exists per committer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommitterId(#[serde(with = "crate::hex32")] [u8; 32]);

impl CommitterId {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for CommitterId {
    fn from(bytes: [u8; 32]) -> Self {
        CommitterId::new(bytes)
    }
}

impl fmt::Debug for CommitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitterId({})", hex32::encode(&self.0))
    }
}

impl fmt::Display for CommitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex32::encode(&self.0))
    }
}

/// Everything the protocol knows about the caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub committer: CommitterId,
    pub request_id: RequestId,
    pub round: u64,
}

/// Result of a successful reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealOutcome {
    pub request_id: RequestId,
    /// Ordered, 0-based indices into the participant list.
    pub winners: Vec<u32>,
}
