/// LCG multiplier shared by every lane.
pub const PCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;

/// Increment of lane zero; lane `g` adds `2g`, keeping every increment odd.
pub const PCG_BASE_INCREMENT: u64 = 1_442_695_040_888_963_407;

/// One PCG-XSH-RR 64/32 stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pcg32Lane {
    state: u64,
    increment: u64,
}

impl Pcg32Lane {
    /// Seeds the lane the way reference pcg32 does: step from zero, add the
    /// seed word, step again.
    pub(crate) fn seeded(word: u64, lane: u64) -> Self {
        let mut pcg = Self {
            state: 0,
            increment: PCG_BASE_INCREMENT.wrapping_add(lane.wrapping_mul(2)),
        };
        pcg.step();
        pcg.state = pcg.state.wrapping_add(word);
        pcg.step();
        pcg
    }

    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(PCG_MULTIPLIER)
            .wrapping_add(self.increment);
    }

    /// Output from the current state, then advance.
    pub(crate) fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rotation = (old >> 59) as u32;
        xorshifted.rotate_right(rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_use_distinct_odd_increments() {
        let increments: Vec<u64> = (0..4).map(|g| Pcg32Lane::seeded(0, g).increment).collect();
        for (g, inc) in increments.iter().enumerate() {
            assert_eq!(inc % 2, 1, "lane {g}");
        }
        assert_eq!(increments[3] - increments[0], 6);
    }

    #[test]
    fn same_word_same_stream() {
        let mut a = Pcg32Lane::seeded(42, 1);
        let mut b = Pcg32Lane::seeded(42, 1);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn matches_reference_pcg32_first_output() {
        // pcg32_srandom(42, 54) from the PCG reference distribution yields
        // 0xa15c02b7 first; its increment is (54 << 1) | 1.
        let mut lane = Pcg32Lane {
            state: 0,
            increment: (54u64 << 1) | 1,
        };
        lane.step();
        lane.state = lane.state.wrapping_add(42);
        lane.step();
        assert_eq!(lane.next_u32(), 0xa15c_02b7);
    }
}
