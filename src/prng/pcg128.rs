use rand::{RngCore, SeedableRng};

use super::lane::Pcg32Lane;
use super::Seed;

const LANES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("range [{lower}, {upper}) must hold at least two values")]
    TooNarrow { lower: u128, upper: u128 },
}

/// Four independent pcg32 lanes concatenated into 128-bit outputs.
///
/// Lane `g` is seeded from big-endian bytes `8g..8g + 8` of the seed and
/// supplies bits `96 - 32g..128 - 32g` of every output. The layout is part of
/// the reveal's reproducibility contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg128 {
    lanes: [Pcg32Lane; LANES],
}

impl Pcg128 {
    pub fn from_seed(seed: &Seed) -> Self {
        let bytes = seed.as_bytes();
        let lanes = std::array::from_fn(|g| {
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[g * 8..g * 8 + 8]);
            Pcg32Lane::seeded(u64::from_be_bytes(word), g as u64)
        });
        Self { lanes }
    }

    pub fn next_u128(&mut self) -> u128 {
        self.lanes
            .iter_mut()
            .fold(0u128, |acc, lane| (acc << 32) | u128::from(lane.next_u32()))
    }

    /// Uniform draw from `[lower, upper)`.
    ///
    /// Outputs below `2^128 mod width` are rejected so every residue is equally
    /// likely. The expected number of rejections is below one for any width.
    pub fn random_range(&mut self, lower: u128, upper: u128) -> Result<u128, RangeError> {
        let width = match upper.checked_sub(lower) {
            Some(width) if width >= 2 => width,
            _ => return Err(RangeError::TooNarrow { lower, upper }),
        };
        let threshold = width.wrapping_neg() % width;
        loop {
            let candidate = self.next_u128();
            if candidate >= threshold {
                return Ok(candidate % width + lower);
            }
        }
    }
}

impl RngCore for Pcg128 {
    fn next_u32(&mut self) -> u32 {
        (self.next_u128() >> 96) as u32
    }

    fn next_u64(&mut self) -> u64 {
        (self.next_u128() >> 64) as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(16) {
            let block = self.next_u128().to_be_bytes();
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Pcg128 {
    type Seed = [u8; 32];

    fn from_seed(seed: Self::Seed) -> Self {
        Pcg128::from_seed(&Seed::new(seed))
    }
}
