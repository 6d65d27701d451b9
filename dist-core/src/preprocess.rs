//! Input narrowing: length ordering, common prefix/suffix trimming, trivial
//! cases, and accumulator-width selection, ahead of the wavefront driver.

use log::{debug, trace};

use crate::buffer::AlignedBuffer;
use crate::driver;

/// Threshold below which a 32-bit accumulator suffices: `aLen + bLen` must
/// fit in a `u32`. Beyond this the accumulator widens to a pointer-sized
/// integer.
const MAX_NARROW_TOTAL: usize = u32::MAX as usize;

/// Computes the edit distance between `a` and `b`, aborting the process on
/// allocation failure (the usual Rust convention — see [`try_distance`] for
/// a fallible variant).
///
/// `Copy + 'static` on `E` is stricter than plain equality comparison; it's
/// what lets this function recognize a SIMD-eligible element type at compile
/// time and safely reinterpret the input slices as raw lanes when it does.
/// Elements that can't satisfy it (non-`'static` borrows, non-`Copy` types)
/// should go through [`distance_scalar_only`] instead, which only ever
/// compares elements and has no such requirement.
pub fn distance<E: PartialEq + Copy + 'static>(a: &[E], b: &[E]) -> u64 {
    try_distance(a, b).unwrap_or_else(|e| {
        panic!("{e}");
    })
}

/// Same, surfacing [`AllocError`](crate::buffer::AllocError) instead of
/// aborting, for callers (e.g. the CLI harness) that want to handle
/// huge-input allocation failure gracefully.
pub fn try_distance<E: PartialEq + Copy + 'static>(
    a: &[E],
    b: &[E],
) -> Result<u64, crate::buffer::AllocError> {
    run(a, b, false)
}

/// Same as [`distance`], but bypasses the SIMD dispatch unconditionally —
/// the `--force-scalar` mode of the CLI harness, and the baseline the
/// SIMD–scalar equivalence property tests check against. Unlike [`distance`],
/// this never needs more of `E` than equality comparison: there is no width
/// dispatch or byte-reinterpretation anywhere on this path.
pub fn distance_scalar_only<E: PartialEq>(a: &[E], b: &[E]) -> u64 {
    try_distance_scalar_only(a, b).unwrap_or_else(|e| {
        panic!("{e}");
    })
}

/// Fallible counterpart of [`distance_scalar_only`].
pub fn try_distance_scalar_only<E: PartialEq>(
    a: &[E],
    b: &[E],
) -> Result<u64, crate::buffer::AllocError> {
    let (a_len_orig, b_len_orig, a, b) = narrow_inputs(a, b);
    if let Some(d) = trivial(a_len_orig, b_len_orig, a, b) {
        return Ok(d);
    }
    debug!(
        "distance: a_len={a_len_orig} b_len={b_len_orig} trimmed=({},{}) path=driver force_scalar=true",
        a.len(),
        b.len()
    );
    if a.len() + b.len() <= MAX_NARROW_TOTAL {
        Ok(drive_narrow_scalar(a, b)? as u64)
    } else {
        trace!("distance: width=wide (aLen+bLen > u32::MAX) simd_eligible=false");
        drive_wide(a, b)
    }
}

/// Orders `a`/`b` by length (the buffer is sized off the shorter side) and
/// trims their common prefix and suffix. Returns the original lengths
/// (for logging) alongside the trimmed views.
fn narrow_inputs<'a, E: PartialEq>(a: &'a [E], b: &'a [E]) -> (usize, usize, &'a [E], &'a [E]) {
    let (a_len_orig, b_len_orig) = (a.len(), b.len());
    let (a, b) = if a.len() > b.len() { (b, a) } else { (a, b) };

    let mut lo = 0usize;
    while lo < a.len() && a[lo] == b[lo] {
        lo += 1;
    }
    let mut a_hi = a.len();
    let mut b_hi = b.len();
    while a_hi > lo && b_hi > lo && a[a_hi - 1] == b[b_hi - 1] {
        a_hi -= 1;
        b_hi -= 1;
    }
    (a_len_orig, b_len_orig, &a[lo..a_hi], &b[lo..b_hi])
}

/// Resolves the empty-`a` and single-element-`a` folds directly, without
/// involving the driver at all.
fn trivial<E: PartialEq>(a_len_orig: usize, b_len_orig: usize, a: &[E], b: &[E]) -> Option<u64> {
    let (a_len, b_len) = (a.len(), b.len());
    if a_len == 0 {
        debug!(
            "distance: a_len={a_len_orig} b_len={b_len_orig} trimmed=({a_len},{b_len}) path=trivial-empty"
        );
        return Some(b_len as u64);
    }
    if a_len == 1 {
        debug!(
            "distance: a_len={a_len_orig} b_len={b_len_orig} trimmed=({a_len},{b_len}) path=trivial-single"
        );
        let hit = b.iter().any(|x| *x == a[0]);
        return Some(if hit { (b_len - 1) as u64 } else { b_len as u64 });
    }
    None
}

fn run<E: PartialEq + Copy + 'static>(
    a: &[E],
    b: &[E],
    force_scalar: bool,
) -> Result<u64, crate::buffer::AllocError> {
    let (a_len_orig, b_len_orig, a, b) = narrow_inputs(a, b);
    if let Some(d) = trivial(a_len_orig, b_len_orig, a, b) {
        return Ok(d);
    }

    let (a_len, b_len) = (a.len(), b.len());
    debug!(
        "distance: a_len={a_len_orig} b_len={b_len_orig} trimmed=({a_len},{b_len}) path=driver"
    );

    let total = a_len + b_len;
    if total <= MAX_NARROW_TOTAL {
        trace!(
            "distance: width=32 simd_eligible={} force_scalar={force_scalar}",
            simd_width::<E>().is_some()
        );
        Ok(drive_narrow(a, b, force_scalar)? as u64)
    } else {
        trace!("distance: width=wide (aLen+bLen > u32::MAX) simd_eligible=false");
        Ok(drive_wide(a, b)?)
    }
}

fn drive_narrow<E: PartialEq + Copy + 'static>(
    a: &[E],
    b: &[E],
    force_scalar: bool,
) -> Result<u32, crate::buffer::AllocError> {
    #[cfg(target_arch = "x86_64")]
    {
        if !force_scalar {
            if let Some(width) = simd_width::<E>() {
                if crate::simd::available() {
                    return drive_narrow_simd(a, b, width);
                }
            }
        }
    }
    #[cfg(not(target_arch = "x86_64"))]
    let _ = force_scalar;
    drive_narrow_scalar(a, b)
}

fn drive_narrow_scalar<E: PartialEq>(a: &[E], b: &[E]) -> Result<u32, crate::buffer::AllocError> {
    let mut diag = AlignedBuffer::<u32>::try_new(a.len() + 1)?;
    let mut diag2 = AlignedBuffer::<u32>::try_new(a.len() + 1)?;
    Ok(driver::drive_scalar(
        a,
        b,
        diag.as_mut_slice(),
        diag2.as_mut_slice(),
    ))
}

fn drive_wide<E: PartialEq>(a: &[E], b: &[E]) -> Result<u64, crate::buffer::AllocError> {
    let mut diag = AlignedBuffer::<u64>::try_new(a.len() + 1)?;
    let mut diag2 = AlignedBuffer::<u64>::try_new(a.len() + 1)?;
    Ok(driver::drive_scalar_wide(
        a,
        b,
        diag.as_mut_slice(),
        diag2.as_mut_slice(),
    ))
}

/// Element byte width eligible for the SIMD path (1, 2, or 4 bytes, and a
/// type whose `PartialEq` coincides with raw-byte equality — no floats).
/// Implemented via `TypeId` since stable Rust has no specialization to let
/// a single generic entry point dispatch to a width-specific kernel.
fn simd_width<E: 'static>() -> Option<usize> {
    use std::any::TypeId;
    let id = TypeId::of::<E>();
    if id == TypeId::of::<u8>() || id == TypeId::of::<i8>() {
        Some(1)
    } else if id == TypeId::of::<u16>() || id == TypeId::of::<i16>() {
        Some(2)
    } else if id == TypeId::of::<u32>()
        || id == TypeId::of::<i32>()
        || id == TypeId::of::<char>()
    {
        Some(4)
    } else {
        None
    }
}

#[cfg(target_arch = "x86_64")]
fn drive_narrow_simd<E: PartialEq + Copy + 'static>(
    a: &[E],
    b: &[E],
    width: usize,
) -> Result<u32, crate::buffer::AllocError> {
    let mut diag = AlignedBuffer::<u32>::try_new(a.len() + 1)?;
    let mut diag2 = AlignedBuffer::<u32>::try_new(a.len() + 1)?;
    let fast_min = crate::simd::has_fast_min();

    // SAFETY: `a`/`b` are exactly `width`-byte elements per `simd_width`,
    // `E` is `Copy` with no padding/niche for the integer types that match
    // (u8/i8/u16/i16/u32/i32/char), so reinterpreting the slice as the
    // matching unsigned type is a valid bit-for-bit view; and the buffers
    // are `AlignedBuffer`s, satisfying the SIMD block updaters' padding
    // requirement.
    unsafe {
        let result = match width {
            1 => {
                let a8 = reinterpret_slice::<E, u8>(a);
                let b8 = reinterpret_slice::<E, u8>(b);
                driver::drive_simd(
                    a8,
                    b8,
                    diag.as_mut_slice(),
                    diag2.as_mut_slice(),
                    crate::simd::block_update_u8,
                    fast_min,
                )
            }
            2 => {
                let a16 = reinterpret_slice::<E, u16>(a);
                let b16 = reinterpret_slice::<E, u16>(b);
                driver::drive_simd(
                    a16,
                    b16,
                    diag.as_mut_slice(),
                    diag2.as_mut_slice(),
                    crate::simd::block_update_u16,
                    fast_min,
                )
            }
            4 => {
                let a32 = reinterpret_slice::<E, u32>(a);
                let b32 = reinterpret_slice::<E, u32>(b);
                driver::drive_simd(
                    a32,
                    b32,
                    diag.as_mut_slice(),
                    diag2.as_mut_slice(),
                    crate::simd::block_update_u32,
                    fast_min,
                )
            }
            _ => unreachable!("simd_width only returns 1, 2 or 4"),
        };
        Ok(result)
    }
}

/// # Safety
/// `T` and `U` must be the same size and alignment, and every bit pattern of
/// `T` must be a valid `U` (true for the fixed-width integer/`char`
/// pairings [`simd_width`] recognizes).
#[cfg(target_arch = "x86_64")]
unsafe fn reinterpret_slice<T, U>(s: &[T]) -> &[U] {
    debug_assert_eq!(std::mem::size_of::<T>(), std::mem::size_of::<U>());
    std::slice::from_raw_parts(s.as_ptr() as *const U, s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook(a: &[u8], b: &[u8]) -> u64 {
        let (n, m) = (a.len(), b.len());
        let mut d = vec![vec![0u32; m + 1]; n + 1];
        for i in 0..=n {
            d[i][0] = i as u32;
        }
        for j in 0..=m {
            d[0][j] = j as u32;
        }
        for i in 1..=n {
            for j in 1..=m {
                let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
                d[i][j] = (d[i - 1][j] + 1)
                    .min(d[i][j - 1] + 1)
                    .min(d[i - 1][j - 1] + cost);
            }
        }
        d[n][m] as u64
    }

    #[test]
    fn trivial_empty() {
        assert_eq!(distance::<u8>(b"", b"abc"), 3);
        assert_eq!(distance::<u8>(b"abc", b""), 3);
        assert_eq!(distance::<u8>(b"", b""), 0);
    }

    #[test]
    fn trivial_single() {
        assert_eq!(distance(b"a", b"a"), 0);
        assert_eq!(distance(b"a", b"xyz"), 3);
        assert_eq!(distance(b"a", b"xaz"), 2);
    }

    #[test]
    fn equal_sequences_fold_to_zero() {
        assert_eq!(distance(b"identical", b"identical"), 0);
    }

    #[test]
    fn prefix_suffix_trimming_does_not_change_the_answer() {
        let cases: &[(&[u8], &[u8])] = &[
            (b"kitten", b"sitting"),
            (b"prefixABCsuffix", b"prefixXYZsuffix"),
            (b"gumbo", b"gambol"),
        ];
        for (a, b) in cases {
            assert_eq!(distance(*a, *b), textbook(a, b), "a={a:?} b={b:?}");
        }
    }

    #[test]
    fn generic_over_non_byte_elements() {
        let a = [1u32, 2, 3, 4];
        let b = [1u32, 2, 9, 4];
        assert_eq!(distance(&a, &b), 1);
    }

    #[test]
    fn works_for_str_via_partial_eq_char_slices() {
        let a: Vec<char> = "kitten".chars().collect();
        let b: Vec<char> = "sitting".chars().collect();
        assert_eq!(distance(&a, &b), 3);
    }

    #[test]
    fn scalar_only_accepts_non_static_borrowed_elements() {
        // `distance` couldn't take this: `&str` borrowed from a local
        // `String` isn't `'static`, and isn't eligible for the SIMD path
        // either way. `distance_scalar_only` only needs `PartialEq`.
        let owned_a = String::from("one two three");
        let owned_b = String::from("one two four");
        let a: Vec<&str> = owned_a.split(' ').collect();
        let b: Vec<&str> = owned_b.split(' ').collect();
        assert_eq!(distance_scalar_only(&a, &b), 1);
    }
}
