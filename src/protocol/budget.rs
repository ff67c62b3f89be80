use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

const LOG_TARGET: &str = "verifiable_shuffle::budget";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPhase {
    Commit,
    Reveal,
}

impl fmt::Display for BudgetPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetPhase::Commit => f.write_str("commit"),
            BudgetPhase::Reveal => f.write_str("reveal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BudgetError {
    #[error("{phase} needs {requested} top-up calls but only {remaining} remain")]
    Exhausted {
        phase: BudgetPhase,
        requested: u64,
        remaining: u64,
    },
}

/// Hook invoked before the expensive part of commit and reveal.
///
/// Environments that meter computation buy headroom here; everywhere else the
/// [`UnmeteredBudget`] no-op applies. A call that fails after reserving hands
/// its calls back through [`BudgetMeter::release`].
pub trait BudgetMeter: Send + Sync {
    fn reserve(&self, phase: BudgetPhase, calls: u64) -> Result<(), BudgetError>;

    fn release(&self, phase: BudgetPhase, calls: u64);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnmeteredBudget;

impl BudgetMeter for UnmeteredBudget {
    fn reserve(&self, _phase: BudgetPhase, _calls: u64) -> Result<(), BudgetError> {
        Ok(())
    }

    fn release(&self, _phase: BudgetPhase, _calls: u64) {}
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetUsage {
    pub commit_calls: u64,
    pub reveal_calls: u64,
}

impl BudgetUsage {
    pub fn total(&self) -> u64 {
        self.commit_calls.saturating_add(self.reveal_calls)
    }
}

/// Counts top-up calls and optionally refuses once a cap is reached.
#[derive(Debug, Default)]
pub struct MeteredBudget {
    cap: Option<u64>,
    usage: Mutex<BudgetUsage>,
}

impl MeteredBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn capped(cap: u64) -> Self {
        Self {
            cap: Some(cap),
            usage: Mutex::new(BudgetUsage::default()),
        }
    }

    pub fn usage(&self) -> BudgetUsage {
        *self.usage.lock()
    }
}

impl BudgetMeter for MeteredBudget {
    fn reserve(&self, phase: BudgetPhase, calls: u64) -> Result<(), BudgetError> {
        let mut usage = self.usage.lock();
        if let Some(cap) = self.cap {
            let remaining = cap.saturating_sub(usage.total());
            if calls > remaining {
                return Err(BudgetError::Exhausted {
                    phase,
                    requested: calls,
                    remaining,
                });
            }
        }
        match phase {
            BudgetPhase::Commit => usage.commit_calls = usage.commit_calls.saturating_add(calls),
            BudgetPhase::Reveal => usage.reveal_calls = usage.reveal_calls.saturating_add(calls),
        }
        debug!(target: LOG_TARGET, %phase, calls, total = usage.total(), "reserved op budget");
        Ok(())
    }

    fn release(&self, phase: BudgetPhase, calls: u64) {
        let mut usage = self.usage.lock();
        match phase {
            BudgetPhase::Commit => usage.commit_calls = usage.commit_calls.saturating_sub(calls),
            BudgetPhase::Reveal => usage.reveal_calls = usage.reveal_calls.saturating_sub(calls),
        }
        debug!(target: LOG_TARGET, %phase, calls, total = usage.total(), "released op budget");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmetered_always_succeeds() {
        assert!(UnmeteredBudget.reserve(BudgetPhase::Commit, u64::MAX).is_ok());
    }

    #[test]
    fn metered_tracks_each_phase() {
        let meter = MeteredBudget::unlimited();
        meter.reserve(BudgetPhase::Commit, 3).unwrap();
        meter.reserve(BudgetPhase::Reveal, 2).unwrap();
        meter.reserve(BudgetPhase::Reveal, 1).unwrap();
        assert_eq!(
            meter.usage(),
            BudgetUsage {
                commit_calls: 3,
                reveal_calls: 3
            }
        );
    }

    #[test]
    fn capped_meter_refuses_without_consuming() {
        let meter = MeteredBudget::capped(4);
        meter.reserve(BudgetPhase::Commit, 3).unwrap();
        assert_eq!(
            meter.reserve(BudgetPhase::Reveal, 2),
            Err(BudgetError::Exhausted {
                phase: BudgetPhase::Reveal,
                requested: 2,
                remaining: 1
            })
        );
        assert_eq!(meter.usage().total(), 3);
        meter.reserve(BudgetPhase::Reveal, 1).unwrap();
    }

    #[test]
    fn release_hands_calls_back_to_the_cap() {
        let meter = MeteredBudget::capped(4);
        meter.reserve(BudgetPhase::Commit, 4).unwrap();
        assert!(meter.reserve(BudgetPhase::Reveal, 1).is_err());

        meter.release(BudgetPhase::Commit, 4);
        assert_eq!(meter.usage(), BudgetUsage::default());
        meter.reserve(BudgetPhase::Reveal, 4).unwrap();

        meter.release(BudgetPhase::Reveal, 10);
        assert_eq!(meter.usage().reveal_calls, 0);
        UnmeteredBudget.release(BudgetPhase::Commit, 1);
    }
}
