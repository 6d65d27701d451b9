//! The SSE block updater: computes 16 consecutive cells of an anti-diagonal
//! in one call.
//!
//! Grounded on the raw-intrinsics, runtime-feature-detected module shape used
//! elsewhere in the example pack for SIMD kernels operating directly on
//! `core::arch` types rather than `std::simd` lanes (this crate targets
//! stable Rust, so the portable-SIMD style the rest of this workspace uses
//! for bit-packed columns isn't available here).
//!
//! Only reachable for element widths of 1, 2 or 4 bytes where `PartialEq`
//! agrees with raw-byte equality (the dispatcher in [`crate::preprocess`]
//! is responsible for only calling in for such types — no floating point).

#![cfg(target_arch = "x86_64")]

use std::arch::x86_64::*;

/// True if this CPU can take the SIMD path at all (the `pshufb` baseline).
pub fn available() -> bool {
    is_x86_feature_detected!("ssse3")
}

/// True if the direct 32-bit packed min instructions are usable; otherwise
/// a 2-instruction compare/andnot/and/or emulation is used instead.
pub fn has_fast_min() -> bool {
    is_x86_feature_detected!("sse4.1")
}

#[target_feature(enable = "sse4.1")]
unsafe fn min_epi32_direct(a: __m128i, b: __m128i) -> __m128i {
    _mm_min_epi32(a, b)
}

/// `min(a, b)` for four packed 32-bit lanes. Distances are nonnegative and
/// bounded by `aLen + bLen < 2^32`, so signed and unsigned min coincide.
#[target_feature(enable = "ssse3")]
unsafe fn min_epi32(a: __m128i, b: __m128i, fast: bool) -> __m128i {
    if fast {
        min_epi32_direct(a, b)
    } else {
        let m = _mm_cmpgt_epi32(a, b);
        _mm_or_si128(_mm_andnot_si128(m, a), _mm_and_si128(m, b))
    }
}

/// Reverses the order of the four 32-bit lanes: `[a0,a1,a2,a3] -> [a3,a2,a1,a0]`.
#[target_feature(enable = "ssse3")]
unsafe fn reverse_dwords(a: __m128i) -> __m128i {
    _mm_shuffle_epi32::<0x1B>(a)
}

/// Reverses the order of the eight 16-bit lanes, each lane's two bytes kept
/// in place relative to each other.
#[target_feature(enable = "ssse3")]
unsafe fn reverse_words(a: __m128i) -> __m128i {
    let mask = _mm_setr_epi8(14, 15, 12, 13, 10, 11, 8, 9, 6, 7, 4, 5, 2, 3, 0, 1);
    _mm_shuffle_epi8(a, mask)
}

/// Reorders a 16-byte vector, whose lanes hold substitution costs for rows
/// `i-15..=i` in ascending-row order, into the four 4-lane groups the block
/// store expects: group `k` (`k` in `0..4`) holds rows `i-4k-3..=i-4k` in
/// ascending order.
const SUBST_GROUP_MASK: [i8; 16] = [
    12, 13, 14, 15, //
    8, 9, 10, 11, //
    4, 5, 6, 7, //
    0, 1, 2, 3,
];

/// Zero-extends byte group `k` of a 16-byte vector (already in group order)
/// to four 32-bit lanes.
#[target_feature(enable = "ssse3")]
unsafe fn zero_extend_group(bytes: __m128i, k: usize) -> __m128i {
    let base = (4 * k) as i8;
    let z = -128i8; // high bit set: pshufb zeroes this output byte
    let mask = _mm_setr_epi8(
        base,
        z,
        z,
        z,
        base + 1,
        z,
        z,
        z,
        base + 2,
        z,
        z,
        z,
        base + 3,
        z,
        z,
        z,
    );
    _mm_shuffle_epi8(bytes, mask)
}

/// Computes substitution costs for the 16 rows `i-15..=i` from 1-byte
/// elements, already reordered into the four 4-lane groups (c) expects.
#[target_feature(enable = "ssse3")]
unsafe fn subst_u8(a: &[u8], b: &[u8], i: usize, j: usize) -> [__m128i; 4] {
    let a_vec = _mm_loadu_si128(a.as_ptr().add(i - 16) as *const __m128i);
    let b_vec = _mm_loadu_si128(b.as_ptr().add(j - 1) as *const __m128i);
    let mask_a = _mm_setr_epi8(12, 13, 14, 15, 8, 9, 10, 11, 4, 5, 6, 7, 0, 1, 2, 3);
    let mask_b = _mm_setr_epi8(3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15, 14, 13, 12);
    let a_grouped = _mm_shuffle_epi8(a_vec, mask_a);
    let b_grouped = _mm_shuffle_epi8(b_vec, mask_b);
    let eq = _mm_cmpeq_epi8(a_grouped, b_grouped);
    let subst_bytes = _mm_add_epi8(eq, _mm_set1_epi8(1));
    [
        zero_extend_group(subst_bytes, 0),
        zero_extend_group(subst_bytes, 1),
        zero_extend_group(subst_bytes, 2),
        zero_extend_group(subst_bytes, 3),
    ]
}

/// Same, for 2-byte elements.
#[target_feature(enable = "ssse3")]
unsafe fn subst_u16(a: &[u16], b: &[u16], i: usize, j: usize) -> [__m128i; 4] {
    let a_lo = _mm_loadu_si128(a.as_ptr().add(i - 16) as *const __m128i);
    let a_hi = _mm_loadu_si128(a.as_ptr().add(i - 8) as *const __m128i);
    let b_lo = _mm_loadu_si128(b.as_ptr().add(j - 1) as *const __m128i);
    let b_hi = _mm_loadu_si128(b.as_ptr().add(j - 1 + 8) as *const __m128i);
    // b_lo/b_hi hold B in ascending index order; row order needs B descending,
    // so reverse each half and swap which half feeds which row range.
    let b_rev_lo = reverse_words(b_hi);
    let b_rev_hi = reverse_words(b_lo);
    let eq_lo = _mm_cmpeq_epi16(a_lo, b_rev_lo);
    let eq_hi = _mm_cmpeq_epi16(a_hi, b_rev_hi);
    let ones = _mm_set1_epi16(1);
    let subst_lo = _mm_add_epi16(eq_lo, ones);
    let subst_hi = _mm_add_epi16(eq_hi, ones);
    // Values are 0 or 1: saturating pack is lossless and yields one 16-byte
    // vector in ascending-row order, ready for the same group permutation
    // the 1-byte path uses.
    let natural = _mm_packus_epi16(subst_lo, subst_hi);
    let group_mask = _mm_loadu_si128(SUBST_GROUP_MASK.as_ptr() as *const __m128i);
    let grouped = _mm_shuffle_epi8(natural, group_mask);
    [
        zero_extend_group(grouped, 0),
        zero_extend_group(grouped, 1),
        zero_extend_group(grouped, 2),
        zero_extend_group(grouped, 3),
    ]
}

/// Same, for 4-byte elements. Already 32-bit wide, so no zero-extension step.
#[target_feature(enable = "ssse3")]
unsafe fn subst_u32(a: &[u32], b: &[u32], i: usize, j: usize) -> [__m128i; 4] {
    let a_blk = [
        _mm_loadu_si128(a.as_ptr().add(i - 16) as *const __m128i),
        _mm_loadu_si128(a.as_ptr().add(i - 12) as *const __m128i),
        _mm_loadu_si128(a.as_ptr().add(i - 8) as *const __m128i),
        _mm_loadu_si128(a.as_ptr().add(i - 4) as *const __m128i),
    ];
    let b_blk = [
        _mm_loadu_si128(b.as_ptr().add(j - 1) as *const __m128i),
        _mm_loadu_si128(b.as_ptr().add(j - 1 + 4) as *const __m128i),
        _mm_loadu_si128(b.as_ptr().add(j - 1 + 8) as *const __m128i),
        _mm_loadu_si128(b.as_ptr().add(j - 1 + 12) as *const __m128i),
    ];
    let ones = _mm_set1_epi32(1);
    let mut out = [_mm_setzero_si128(); 4];
    for k in 0..4 {
        let b_rev = reverse_dwords(b_blk[k]);
        let eq = _mm_cmpeq_epi32(a_blk[3 - k], b_rev);
        out[k] = _mm_add_epi32(eq, ones);
    }
    out
}

/// Steps (b)/(c)/(d) of the block updater, shared across element widths once
/// `subst[0..4)` has been produced.
///
/// # Safety
/// `diag` must have at least 19 valid elements ending at offset `i`
/// (i.e. `diag[i-19..=i]` in bounds), likewise `diag2`; both pointers must
/// be readable/writable for that whole span, which the padding described in
/// [`crate::buffer`] guarantees for any `i` the driver calls this with.
#[target_feature(enable = "ssse3")]
unsafe fn finish_block(diag: *mut u32, diag2: *const u32, i: usize, subst: [__m128i; 4], fast_min: bool) {
    let load = |p: *const u32, k: usize| -> __m128i {
        _mm_loadu_si128(p.add(i - 4 * k - 3) as *const __m128i)
    };
    let d2: [__m128i; 5] = [
        load(diag2, 0),
        load(diag2, 1),
        load(diag2, 2),
        load(diag2, 3),
        load(diag2, 4),
    ];
    let d: [__m128i; 5] = [
        load(diag as *const u32, 0),
        load(diag as *const u32, 1),
        load(diag as *const u32, 2),
        load(diag as *const u32, 3),
        load(diag as *const u32, 4),
    ];
    let ones = _mm_set1_epi32(1);
    for k in 0..4 {
        let shift1 = _mm_alignr_epi8::<12>(d2[k], d2[k + 1]);
        let shift2 = _mm_alignr_epi8::<12>(d[k], d[k + 1]);
        let r1 = _mm_add_epi32(shift1, ones);
        let r2 = _mm_add_epi32(d2[k], ones);
        let r3 = _mm_add_epi32(shift2, subst[k]);
        let out = min_epi32(min_epi32(r1, r2, fast_min), r3, fast_min);
        _mm_storeu_si128(diag.add(i - 4 * k - 3) as *mut __m128i, out);
    }
}

/// Computes `diag[i-15..=i]` from 1-byte elements and decrements `i` by 16.
///
/// # Safety
/// `i >= 16` and `b.len() - j >= 16` so the 20-cell read windows on both
/// inputs stay in bounds; `diag`/`diag2` must satisfy the padding
/// precondition of [`finish_block`].
#[target_feature(enable = "ssse3")]
pub unsafe fn block_update_u8(
    a: &[u8],
    b: &[u8],
    i: usize,
    j: usize,
    diag: *mut u32,
    diag2: *const u32,
    fast_min: bool,
) {
    let subst = subst_u8(a, b, i, j);
    finish_block(diag, diag2, i, subst, fast_min);
}

/// Same, for 2-byte elements.
///
/// # Safety
/// Same as [`block_update_u8`].
#[target_feature(enable = "ssse3")]
pub unsafe fn block_update_u16(
    a: &[u16],
    b: &[u16],
    i: usize,
    j: usize,
    diag: *mut u32,
    diag2: *const u32,
    fast_min: bool,
) {
    let subst = subst_u16(a, b, i, j);
    finish_block(diag, diag2, i, subst, fast_min);
}

/// Same, for 4-byte elements.
///
/// # Safety
/// Same as [`block_update_u8`].
#[target_feature(enable = "ssse3")]
pub unsafe fn block_update_u32(
    a: &[u32],
    b: &[u32],
    i: usize,
    j: usize,
    diag: *mut u32,
    diag2: *const u32,
    fast_min: bool,
) {
    let subst = subst_u32(a, b, i, j);
    finish_block(diag, diag2, i, subst, fast_min);
}
