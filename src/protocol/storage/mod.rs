mod in_memory;

use async_trait::async_trait;

use super::record::{CommitmentRecord, RecordError};
use super::types::{CommitterId, RequestId};

pub use in_memory::InMemoryCommitmentStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("stored commitment is corrupt: {0}")]
    Corrupt(#[from] RecordError),
    #[error("commitment store unavailable: {0}")]
    Unavailable(String),
}

/// Per-committer slot holding at most one live commitment.
#[async_trait]
pub trait CommitmentStore: Send + Sync {
    async fn load(&self, committer: &CommitterId)
        -> Result<Option<CommitmentRecord>, StoreError>;

    /// Writes the committer's slot, returning whatever it held before.
    async fn save(
        &self,
        committer: &CommitterId,
        record: CommitmentRecord,
    ) -> Result<Option<CommitmentRecord>, StoreError>;

    /// Writes the slot only if it is empty.
    ///
    /// Returns the occupying record, untouched, when the slot is already taken.
    async fn insert_if_absent(
        &self,
        committer: &CommitterId,
        record: CommitmentRecord,
    ) -> Result<Option<CommitmentRecord>, StoreError>;

    /// Removes the record only if it still belongs to `request_id`.
    ///
    /// Returns `None` when the slot is empty or now holds a different request,
    /// so at most one of several racing reveals can claim a record.
    async fn take(
        &self,
        committer: &CommitterId,
        request_id: &RequestId,
    ) -> Result<Option<CommitmentRecord>, StoreError>;

    /// Unconditionally clears the committer's slot.
    async fn clear(&self, committer: &CommitterId)
        -> Result<Option<CommitmentRecord>, StoreError>;
}
