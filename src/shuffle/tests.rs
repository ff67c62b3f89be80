use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::*;
use crate::prng::{Pcg128, Seed};
use crate::test_utils::fixtures::{golden_seed, GOLDEN_DRAWS};

#[test]
fn golden_draws_are_bit_exact() {
    let seed = golden_seed();
    for (participants, winners, expected) in GOLDEN_DRAWS {
        let drawn = draw_winners(*participants, *winners, &seed).unwrap();
        assert_eq!(drawn.as_slice(), *expected, "({participants}, {winners})");
    }
}

#[test]
fn shorter_draws_are_prefixes_of_longer_ones() {
    let seed = golden_seed();
    let long = draw_winners(80, 20, &seed).unwrap();
    for k in 1..20u8 {
        let short = draw_winners(80, k, &seed).unwrap();
        assert_eq!(short.as_slice(), &long[..usize::from(k)]);
    }
}

#[test]
fn bucket_count_does_not_change_the_outcome() {
    let seed = golden_seed();
    let reference = draw_winners(255, 16, &seed).unwrap();
    for buckets in [1usize, 2, 7, 64, 1024] {
        let mut rng = Pcg128::from_seed(&seed);
        let drawn = draw_winners_with(255, 16, &mut rng, buckets).unwrap();
        assert_eq!(drawn, reference, "{buckets} buckets");
    }
}

#[test]
fn random_selections_are_distinct_and_in_range() {
    let mut rng = StdRng::seed_from_u64(0xfa11);
    for _ in 0..300 {
        let participants: u32 = if rng.gen_bool(0.5) {
            rng.gen_range(2..100)
        } else {
            rng.gen_range(2..=u32::MAX)
        };
        let max_winners = participants.min(34) as u8;
        let winners = rng.gen_range(1..=max_winners);
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);

        let drawn = draw_winners(participants, winners, &Seed::new(bytes)).unwrap();
        assert_eq!(drawn.len(), usize::from(winners));
        assert!(drawn.iter().all(|w| *w < participants));
        let unique: HashSet<_> = drawn.iter().collect();
        assert_eq!(unique.len(), drawn.len(), "duplicates for ({participants}, {winners})");
    }
}

#[test]
fn full_permutation_covers_every_index() {
    let mut rng = StdRng::seed_from_u64(11);
    for n in 2u8..=34 {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        let mut drawn = draw_winners(u32::from(n), n, &Seed::new(bytes)).unwrap();
        drawn.sort_unstable();
        assert_eq!(drawn, (0..u32::from(n)).collect::<Vec<_>>());
    }
}

#[test]
fn draws_are_deterministic() {
    let seed = Seed::digest(b"repeatable");
    let first = draw_winners(1_000_000, 12, &seed).unwrap();
    for _ in 0..5 {
        assert_eq!(draw_winners(1_000_000, 12, &seed).unwrap(), first);
    }
    let other = draw_winners(1_000_000, 12, &Seed::digest(b"different")).unwrap();
    assert_ne!(other, first);
}

#[test]
fn degenerate_and_invalid_selections() {
    let seed = golden_seed();
    assert_eq!(draw_winners(1, 1, &seed).unwrap(), vec![0]);
    assert!(draw_winners(5, 0, &seed).unwrap().is_empty());
    assert_eq!(
        draw_winners(3, 4, &seed),
        Err(ShuffleError::InvalidSelection {
            participants: 3,
            winners: 4
        })
    );
    assert!(draw_winners(0, 0, &seed).is_err());

    let mut rng = Pcg128::from_seed(&seed);
    assert_eq!(
        draw_winners_with(10, 3, &mut rng, 0),
        Err(ShuffleError::NoBuckets)
    );
}

#[test]
fn sparse_permutation_defaults_to_identity() {
    let mut permutation = SparsePermutation::new();
    assert_eq!(permutation.bucket_count(), DEFAULT_BUCKETS);
    assert!(permutation.is_empty());
    assert_eq!(permutation.get(12_345), 12_345);

    permutation.set(3, 9);
    permutation.set(14, 2);
    permutation.set(3, 4);
    assert_eq!(permutation.get(3), 4);
    assert_eq!(permutation.get(14), 2);
    assert_eq!(permutation.get(25), 25);
    assert_eq!(permutation.len(), 2);
}

#[test]
fn sparse_storage_grows_with_steps_not_participants() {
    let mut permutation = SparsePermutation::new();
    let mut rng = Pcg128::from_seed(&golden_seed());
    let n = u32::MAX - 1;
    for i in 0..30u32 {
        let j = rng.random_range(u128::from(i), u128::from(n)).unwrap() as u32;
        let at_i = permutation.get(i);
        permutation.set(j, at_i);
    }
    assert!(permutation.len() <= 30);
}
