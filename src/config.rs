use serde::{Deserialize, Serialize};

use crate::entropy::{Precision, MAX_SAFE_WINNERS};
use crate::shuffle::DEFAULT_BUCKETS;

/// Op-budget units one top-up call buys.
pub const OP_UNITS_PER_CALL: u64 = 700;

pub const DEFAULT_SAFETY_ROUND_GAP: u64 = 1;
pub const COMMIT_SINGLE_WINNER_OP_COST: u64 = 600;
pub const REVEAL_SINGLE_WINNER_OP_COST: u64 = 500;

/// What `commit` does when the committer already has a live record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommitPolicy {
    /// Replace the pending record.
    #[default]
    Overwrite,
    /// Refuse until the pending record is revealed or abandoned.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid protocol config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Minimum number of rounds between commit and the earliest reveal.
    pub safety_round_gap: u64,
    pub precision: Precision,
    pub buckets: usize,
    pub commit_single_winner_op_cost: u64,
    pub reveal_single_winner_op_cost: u64,
    pub recommit_policy: RecommitPolicy,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            safety_round_gap: DEFAULT_SAFETY_ROUND_GAP,
            precision: Precision::DEFAULT,
            buckets: DEFAULT_BUCKETS,
            commit_single_winner_op_cost: COMMIT_SINGLE_WINNER_OP_COST,
            reveal_single_winner_op_cost: REVEAL_SINGLE_WINNER_OP_COST,
            recommit_policy: RecommitPolicy::default(),
        }
    }
}

impl ProtocolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.safety_round_gap > u64::from(u8::MAX) {
            return Err(ConfigError::invalid(
                "safety_round_gap cannot exceed the largest expressible delay (255)",
            ));
        }
        if self.buckets == 0 {
            return Err(ConfigError::invalid("buckets must be greater than zero"));
        }
        if self.commit_single_winner_op_cost == 0 || self.reveal_single_winner_op_cost == 0 {
            return Err(ConfigError::invalid("op costs must be greater than zero"));
        }
        Ok(())
    }

    /// Top-up calls a commit for `winners` must buy before running.
    pub fn commit_top_up_calls(&self, winners: u8) -> u64 {
        top_up_calls(winners, self.commit_single_winner_op_cost)
    }

    pub fn reveal_top_up_calls(&self, winners: u8) -> u64 {
        top_up_calls(winners, self.reveal_single_winner_op_cost)
    }

    /// Upper bound on top-up calls any admissible request can need.
    pub fn max_top_up_calls(&self) -> u64 {
        let cost = self
            .commit_single_winner_op_cost
            .max(self.reveal_single_winner_op_cost);
        top_up_calls(MAX_SAFE_WINNERS, cost)
    }
}

fn top_up_calls(winners: u8, per_winner_cost: u64) -> u64 {
    u64::from(winners).saturating_mul(per_winner_cost) / OP_UNITS_PER_CALL + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::serde::assert_round_trip_eq;

    #[test]
    fn defaults_validate() {
        let cfg = ProtocolConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.precision.bits(), 16);
        assert_eq!(cfg.buckets, 11);
        assert_round_trip_eq(&cfg);
    }

    #[test]
    fn rejects_unusable_values() {
        let cfg = ProtocolConfig {
            buckets: 0,
            ..ProtocolConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ProtocolConfig {
            safety_round_gap: 256,
            ..ProtocolConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ProtocolConfig {
            reveal_single_winner_op_cost: 0,
            ..ProtocolConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn top_up_calls_scale_with_winners() {
        let cfg = ProtocolConfig::default();
        assert_eq!(cfg.commit_top_up_calls(1), 1);
        assert_eq!(cfg.commit_top_up_calls(2), 2);
        assert_eq!(cfg.commit_top_up_calls(34), 30);
        assert_eq!(cfg.reveal_top_up_calls(7), 6);
        assert_eq!(cfg.reveal_top_up_calls(34), 25);
        assert_eq!(cfg.max_top_up_calls(), 30);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: ProtocolConfig =
            serde_json::from_str(r#"{"safety_round_gap": 4, "recommit_policy": "reject"}"#)
                .unwrap();
        assert_eq!(cfg.safety_round_gap, 4);
        assert_eq!(cfg.recommit_policy, RecommitPolicy::Reject);
        assert_eq!(cfg.precision, Precision::DEFAULT);
    }
}
