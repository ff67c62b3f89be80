//! Commit-reveal fair shuffle.
//!
//! `commit` fixes the draw parameters and a future round; `reveal` fetches
//! that round's beacon output, expands it into the winners and destroys the
//! commitment so it cannot be replayed.

pub mod beacon;
pub mod budget;
pub mod error;
pub mod record;
pub mod service;
pub mod storage;
pub mod types;
pub mod validation;

pub use beacon::{BeaconError, HashChainBeacon, MockRandomnessBeacon, RandomnessBeacon};
pub use budget::{BudgetError, BudgetMeter, BudgetPhase, BudgetUsage, MeteredBudget, UnmeteredBudget};
pub use error::{ShuffleProtocolError, ValidationError};
pub use record::{CommitmentRecord, RecordError, RECORD_LEN};
pub use service::ShuffleProtocol;
pub use storage::{CommitmentStore, InMemoryCommitmentStore, StoreError};
pub use types::{CallContext, CommitterId, RequestId, RevealOutcome};
