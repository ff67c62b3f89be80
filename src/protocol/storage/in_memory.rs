use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::protocol::record::{CommitmentRecord, RECORD_LEN};
use crate::protocol::types::{CommitterId, RequestId};

use super::{CommitmentStore, StoreError};

/// Keeps records in their fixed-width encoding, one slot per committer.
#[derive(Clone, Default)]
pub struct InMemoryCommitmentStore {
    inner: Arc<RwLock<HashMap<CommitterId, [u8; RECORD_LEN]>>>,
}

impl InMemoryCommitmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

fn decode(bytes: Option<[u8; RECORD_LEN]>) -> Result<Option<CommitmentRecord>, StoreError> {
    bytes
        .map(|raw| CommitmentRecord::from_bytes(&raw))
        .transpose()
        .map_err(StoreError::from)
}

#[async_trait]
impl CommitmentStore for InMemoryCommitmentStore {
    async fn load(
        &self,
        committer: &CommitterId,
    ) -> Result<Option<CommitmentRecord>, StoreError> {
        let slot = self.inner.read().get(committer).copied();
        decode(slot)
    }

    async fn save(
        &self,
        committer: &CommitterId,
        record: CommitmentRecord,
    ) -> Result<Option<CommitmentRecord>, StoreError> {
        let previous = self.inner.write().insert(*committer, record.to_bytes());
        decode(previous)
    }

    async fn insert_if_absent(
        &self,
        committer: &CommitterId,
        record: CommitmentRecord,
    ) -> Result<Option<CommitmentRecord>, StoreError> {
        let mut guard = self.inner.write();
        match guard.get(committer) {
            Some(raw) => Ok(Some(CommitmentRecord::from_bytes(raw)?)),
            None => {
                guard.insert(*committer, record.to_bytes());
                Ok(None)
            }
        }
    }

    async fn take(
        &self,
        committer: &CommitterId,
        request_id: &RequestId,
    ) -> Result<Option<CommitmentRecord>, StoreError> {
        let mut guard = self.inner.write();
        let Some(raw) = guard.get(committer) else {
            return Ok(None);
        };
        let record = CommitmentRecord::from_bytes(raw)?;
        if record.request_id != *request_id {
            return Ok(None);
        }
        guard.remove(committer);
        Ok(Some(record))
    }

    async fn clear(
        &self,
        committer: &CommitterId,
    ) -> Result<Option<CommitmentRecord>, StoreError> {
        let previous = self.inner.write().remove(committer);
        decode(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u8, round: u64) -> CommitmentRecord {
        CommitmentRecord {
            request_id: RequestId::new([id; 32]),
            target_round: round,
            participants: 10,
            winners: 3,
        }
    }

    #[tokio::test]
    async fn save_load_and_replace() {
        let store = InMemoryCommitmentStore::new();
        let alice = CommitterId::new([1; 32]);
        assert!(store.load(&alice).await.unwrap().is_none());

        assert!(store.save(&alice, record(1, 5)).await.unwrap().is_none());
        let replaced = store.save(&alice, record(2, 9)).await.unwrap();
        assert_eq!(replaced, Some(record(1, 5)));
        assert_eq!(store.load(&alice).await.unwrap(), Some(record(2, 9)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_the_occupant() {
        let store = InMemoryCommitmentStore::new();
        let alice = CommitterId::new([1; 32]);

        assert!(store
            .insert_if_absent(&alice, record(1, 5))
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            store.insert_if_absent(&alice, record(2, 9)).await.unwrap(),
            Some(record(1, 5))
        );
        assert_eq!(store.load(&alice).await.unwrap(), Some(record(1, 5)));
    }

    #[tokio::test]
    async fn take_requires_matching_request() {
        let store = InMemoryCommitmentStore::new();
        let alice = CommitterId::new([1; 32]);
        store.save(&alice, record(2, 9)).await.unwrap();

        let stale = RequestId::new([1; 32]);
        assert!(store.take(&alice, &stale).await.unwrap().is_none());
        assert!(!store.is_empty());

        let current = RequestId::new([2; 32]);
        assert_eq!(
            store.take(&alice, &current).await.unwrap(),
            Some(record(2, 9))
        );
        assert!(store.take(&alice, &current).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryCommitmentStore::new();
        let view = store.clone();
        let bob = CommitterId::new([9; 32]);
        store.save(&bob, record(4, 1)).await.unwrap();
        assert_eq!(view.clear(&bob).await.unwrap(), Some(record(4, 1)));
        assert!(store.is_empty());
    }
}
