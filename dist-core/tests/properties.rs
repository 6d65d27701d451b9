//! Randomized algorithmic invariants (symmetry, identity, bounds, the
//! triangle inequality, prefix/suffix invariance, SIMD–scalar equivalence),
//! checked with `proptest` rather than hand-written fixed cases.

use dist_core::{distance, distance_scalar_only};
use proptest::prelude::*;

fn bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

fn u32s() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(any::<u32>(), 0..64)
}

proptest! {
    #[test]
    fn symmetry(a in bytes(), b in bytes()) {
        prop_assert_eq!(distance(&a, &b), distance(&b, &a));
    }

    #[test]
    fn identity(a in bytes()) {
        prop_assert_eq!(distance(&a, &a), 0);
    }

    #[test]
    fn bounds(a in bytes(), b in bytes()) {
        let d = distance(&a, &b);
        let lo = (a.len() as i64 - b.len() as i64).unsigned_abs();
        let hi = a.len().max(b.len()) as u64;
        prop_assert!(d >= lo && d <= hi, "d={d} lo={lo} hi={hi}");
    }

    #[test]
    fn triangle_inequality(a in bytes(), b in bytes(), c in bytes()) {
        prop_assert!(distance(&a, &c) <= distance(&a, &b) + distance(&b, &c));
    }

    #[test]
    fn prefix_suffix_invariance(p in bytes(), a in bytes(), b in bytes(), s in bytes()) {
        let pa_s: Vec<u8> = p.iter().chain(&a).chain(&s).copied().collect();
        let pb_s: Vec<u8> = p.iter().chain(&b).chain(&s).copied().collect();
        prop_assert_eq!(distance(&pa_s, &pb_s), distance(&a, &b));
    }

    #[test]
    fn simd_matches_forced_scalar_u8(a in bytes(), b in bytes()) {
        prop_assert_eq!(distance(&a, &b), distance_scalar_only(&a, &b));
    }

    #[test]
    fn simd_matches_forced_scalar_u32(a in u32s(), b in u32s()) {
        prop_assert_eq!(distance(&a, &b), distance_scalar_only(&a, &b));
    }
}
