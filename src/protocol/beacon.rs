use async_trait::async_trait;
use parking_lot::RwLock;
use sha3::{Digest, Sha3_256};
use tracing::debug;

use crate::prng::Seed;

const LOG_TARGET: &str = "verifiable_shuffle::beacon";

const DOMAIN_HASH_CHAIN: &[u8] = b"verifiable_shuffle/beacon/hash_chain/v1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BeaconError {
    #[error("round {requested} is not available yet (latest {latest})")]
    RoundNotAvailable { requested: u64, latest: u64 },
    #[error("beacon failure: {0}")]
    Failure(String),
}

/// Source of verifiable randomness keyed by round.
///
/// Implementations must be deterministic per `(round, nonce)` and must fail
/// rather than answer for a round they have not reached.
#[async_trait]
pub trait RandomnessBeacon: Send + Sync {
    async fn must_get(&self, round: u64, nonce: &[u8]) -> Result<Seed, BeaconError>;
}

/// Latest round a local beacon is willing to answer for.
#[derive(Debug)]
struct RoundGate {
    latest: RwLock<u64>,
}

impl RoundGate {
    fn new(latest: u64) -> Self {
        Self {
            latest: RwLock::new(latest),
        }
    }

    fn advance_to(&self, round: u64) {
        let mut latest = self.latest.write();
        if round > *latest {
            *latest = round;
        }
    }

    fn check(&self, requested: u64) -> Result<(), BeaconError> {
        let latest = *self.latest.read();
        if requested > latest {
            return Err(BeaconError::RoundNotAvailable { requested, latest });
        }
        Ok(())
    }
}

/// Returns the same output for every request, like a localnet stand-in.
#[derive(Debug)]
pub struct MockRandomnessBeacon {
    output: Seed,
    gate: RoundGate,
}

impl MockRandomnessBeacon {
    /// Answers for every round.
    pub fn new(output: Seed) -> Self {
        Self {
            output,
            gate: RoundGate::new(u64::MAX),
        }
    }

    /// Answers only up to `latest` until advanced.
    pub fn gated(output: Seed, latest: u64) -> Self {
        Self {
            output,
            gate: RoundGate::new(latest),
        }
    }

    pub fn advance_to(&self, round: u64) {
        self.gate.advance_to(round);
    }
}

#[async_trait]
impl RandomnessBeacon for MockRandomnessBeacon {
    async fn must_get(&self, round: u64, _nonce: &[u8]) -> Result<Seed, BeaconError> {
        self.gate.check(round)?;
        Ok(self.output)
    }
}

/// Derives each round's output from a secret by hashing.
///
/// Not verifiable by third parties; a deterministic local source for
/// simulations and tests.
#[derive(Debug)]
pub struct HashChainBeacon {
    secret: [u8; 32],
    gate: RoundGate,
}

impl HashChainBeacon {
    pub fn new(secret: [u8; 32], latest: u64) -> Self {
        Self {
            secret,
            gate: RoundGate::new(latest),
        }
    }

    pub fn from_passphrase(passphrase: &str, latest: u64) -> Self {
        Self::new(Seed::digest(passphrase.as_bytes()).into_bytes(), latest)
    }

    pub fn advance_to(&self, round: u64) {
        self.gate.advance_to(round);
    }

    pub fn output_for(&self, round: u64, nonce: &[u8]) -> Seed {
        let mut hasher = Sha3_256::new();
        hasher.update(DOMAIN_HASH_CHAIN);
        hasher.update(self.secret);
        hasher.update(round.to_be_bytes());
        hasher.update((nonce.len() as u64).to_be_bytes());
        hasher.update(nonce);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Seed::new(bytes)
    }
}

#[async_trait]
impl RandomnessBeacon for HashChainBeacon {
    async fn must_get(&self, round: u64, nonce: &[u8]) -> Result<Seed, BeaconError> {
        self.gate.check(round)?;
        let seed = self.output_for(round, nonce);
        debug!(target: LOG_TARGET, round, seed = %seed, "beacon output derived");
        Ok(seed)
    }
}
