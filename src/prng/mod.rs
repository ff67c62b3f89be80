//! Deterministic expansion of a 256-bit beacon output into bounded draws.

mod lane;
mod pcg128;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::hex32::{self, HexError};

pub use lane::{PCG_BASE_INCREMENT, PCG_MULTIPLIER};
pub use pcg128::{Pcg128, RangeError};

/// 32 bytes of verifiable randomness, as delivered by a beacon.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(#[serde(with = "crate::hex32")] [u8; 32]);

impl Seed {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// SHA3-256 of arbitrary input. Handy for fixtures and offline draws.
    pub fn digest(data: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha3_256::digest(data));
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl AsRef<[u8; 32]> for Seed {
    fn as_ref(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Seed {
    fn from(bytes: [u8; 32]) -> Self {
        Seed::new(bytes)
    }
}

impl From<Seed> for [u8; 32] {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}

impl FromStr for Seed {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex32::decode(s).map(Seed)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", hex32::encode(&self.0))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex32::encode(&self.0))
    }
}
