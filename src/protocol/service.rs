use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::{ConfigError, ProtocolConfig, RecommitPolicy};
use crate::entropy::{ensure_within_safety_bound, Precision};
use crate::prng::Pcg128;
use crate::shuffle::draw_winners_with;

use super::beacon::RandomnessBeacon;
use super::budget::{BudgetMeter, BudgetPhase, UnmeteredBudget};
use super::error::ShuffleProtocolError;
use super::record::CommitmentRecord;
use super::storage::{CommitmentStore, InMemoryCommitmentStore};
use super::types::{CallContext, CommitterId, RevealOutcome};
use super::validation::{target_round, validate_delay, validate_selection};

const LOG_TARGET: &str = "verifiable_shuffle::protocol";

/// Commit-reveal orchestration over a store, a beacon and a budget hook.
///
/// Every failing call leaves the store exactly as it found it and hands any
/// reserved budget back.
#[derive(Clone)]
pub struct ShuffleProtocol {
    config: ProtocolConfig,
    store: Arc<dyn CommitmentStore>,
    beacon: Arc<dyn RandomnessBeacon>,
    budget: Arc<dyn BudgetMeter>,
}

impl ShuffleProtocol {
    pub fn new(
        config: ProtocolConfig,
        store: Arc<dyn CommitmentStore>,
        beacon: Arc<dyn RandomnessBeacon>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            beacon,
            budget: Arc::new(UnmeteredBudget),
        })
    }

    pub fn in_memory(
        config: ProtocolConfig,
        beacon: Arc<dyn RandomnessBeacon>,
    ) -> Result<Self, ConfigError> {
        let store = Arc::new(InMemoryCommitmentStore::new()) as Arc<dyn CommitmentStore>;
        Self::new(config, store, beacon)
    }

    pub fn with_budget(mut self, budget: Arc<dyn BudgetMeter>) -> Self {
        self.budget = budget;
        self
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn safety_round_gap(&self) -> u64 {
        self.config.safety_round_gap
    }

    pub fn precision(&self) -> Precision {
        self.config.precision
    }

    /// The committer's live record, if any.
    pub async fn pending(
        &self,
        committer: &CommitterId,
    ) -> Result<Option<CommitmentRecord>, ShuffleProtocolError> {
        Ok(self.store.load(committer).await?)
    }

    /// Fixes `(participants, winners)` for a reveal no earlier than
    /// `ctx.round + delay`.
    #[instrument(
        skip(self, ctx),
        level = "info",
        target = LOG_TARGET,
        fields(committer = %ctx.committer, round = ctx.round)
    )]
    pub async fn commit(
        &self,
        ctx: &CallContext,
        delay: u8,
        participants: u32,
        winners: u8,
    ) -> Result<CommitmentRecord, ShuffleProtocolError> {
        validate_delay(&self.config, delay)?;
        validate_selection(participants, winners)?;
        let target_round = target_round(ctx.round, delay)?;

        let calls = self.config.commit_top_up_calls(winners);
        self.budget.reserve(BudgetPhase::Commit, calls)?;
        let record = CommitmentRecord {
            request_id: ctx.request_id,
            target_round,
            participants,
            winners,
        };
        let stored = self.store_commitment(&ctx.committer, record).await;
        if stored.is_err() {
            self.budget.release(BudgetPhase::Commit, calls);
        }
        stored
    }

    async fn store_commitment(
        &self,
        committer: &CommitterId,
        record: CommitmentRecord,
    ) -> Result<CommitmentRecord, ShuffleProtocolError> {
        let bound =
            ensure_within_safety_bound(record.participants, record.winners, self.config.precision)?;

        match self.config.recommit_policy {
            RecommitPolicy::Overwrite => {
                if let Some(replaced) = self.store.save(committer, record).await? {
                    warn!(
                        target: LOG_TARGET,
                        replaced = %replaced.request_id,
                        "overwrote pending commitment"
                    );
                }
            }
            RecommitPolicy::Reject => {
                if let Some(pending) = self.store.insert_if_absent(committer, record).await? {
                    return Err(ShuffleProtocolError::CommitmentPending {
                        target_round: pending.target_round,
                    });
                }
            }
        }
        info!(
            target: LOG_TARGET,
            request_id = %record.request_id,
            target_round = record.target_round,
            entropy = bound.entropy,
            limit = bound.limit,
            "commitment stored"
        );
        Ok(record)
    }

    /// Draws the committed winners and destroys the commitment.
    #[instrument(
        skip(self, ctx),
        level = "info",
        target = LOG_TARGET,
        fields(committer = %ctx.committer, round = ctx.round)
    )]
    pub async fn reveal(&self, ctx: &CallContext) -> Result<RevealOutcome, ShuffleProtocolError> {
        let record = self
            .store
            .load(&ctx.committer)
            .await?
            .ok_or(ShuffleProtocolError::NoActiveCommitment(ctx.committer))?;

        if !record.is_revealable_at(ctx.round) {
            return Err(ShuffleProtocolError::RoundNotElapsed {
                current: ctx.round,
                target: record.target_round,
            });
        }

        let calls = self.config.reveal_top_up_calls(record.winners);
        self.budget.reserve(BudgetPhase::Reveal, calls)?;
        let outcome = self.draw_and_claim(&ctx.committer, record).await;
        if outcome.is_err() {
            self.budget.release(BudgetPhase::Reveal, calls);
        }
        outcome
    }

    async fn draw_and_claim(
        &self,
        committer: &CommitterId,
        record: CommitmentRecord,
    ) -> Result<RevealOutcome, ShuffleProtocolError> {
        let seed = self
            .beacon
            .must_get(record.target_round, record.request_id.as_bytes())
            .await
            .map_err(|err| {
                warn!(target: LOG_TARGET, error = %err, "beacon did not answer");
                err
            })?;

        let mut rng = Pcg128::from_seed(&seed);
        let winners = draw_winners_with(
            record.participants,
            record.winners,
            &mut rng,
            self.config.buckets,
        )?;

        // A concurrent reveal or re-commit may have claimed the slot meanwhile.
        self.store
            .take(committer, &record.request_id)
            .await?
            .ok_or(ShuffleProtocolError::NoActiveCommitment(*committer))?;

        info!(
            target: LOG_TARGET,
            request_id = %record.request_id,
            winners = ?winners,
            "commitment revealed"
        );
        Ok(RevealOutcome {
            request_id: record.request_id,
            winners,
        })
    }

    /// Drops a pending commitment without revealing it.
    pub async fn abandon(
        &self,
        committer: &CommitterId,
    ) -> Result<Option<CommitmentRecord>, ShuffleProtocolError> {
        let cleared = self.store.clear(committer).await?;
        if let Some(record) = &cleared {
            info!(
                target: LOG_TARGET,
                committer = %committer,
                request_id = %record.request_id,
                "commitment abandoned"
            );
        }
        Ok(cleared)
    }
}
