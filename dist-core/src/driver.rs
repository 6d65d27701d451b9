//! The wavefront driver: sweeps anti-diagonals `k = 1 ..= aLen + bLen`,
//! keeping two rolling diagonal buffers and delegating each cell (or, on the
//! SIMD path, each run of 16 cells) to a cell updater.

use crate::scalar::{update_cell, update_cell_wide};

#[inline]
fn start_row(k: usize, b_len: usize) -> usize {
    1.max(k.saturating_sub(b_len))
}

/// The largest row with both `i >= 1` and `j = k - i >= 1`; i.e. excludes
/// the `j = 0` boundary cell, which is assigned directly rather than run
/// through the recurrence. When this falls below `start_row`, no interior
/// cell exists on this anti-diagonal and the inner loop is a no-op.
#[inline]
fn end_row(k: usize, a_len: usize) -> usize {
    a_len.min(k.saturating_sub(1))
}

/// Runs the full sweep with the scalar cell updater and a 32-bit accumulator.
/// `diag`/`diag2` must each hold at least `a_len + 1` elements.
pub fn drive_scalar<E: PartialEq>(a: &[E], b: &[E], diag: &mut [u32], diag2: &mut [u32]) -> u32 {
    let a_len = a.len();
    let b_len = b.len();
    let mut diag = diag;
    let mut diag2 = diag2;
    let total = a_len + b_len;
    for k in 1..=total {
        let s = start_row(k, b_len);
        let e = end_row(k, a_len);
        for i in (s..=e).rev() {
            let j = k - i;
            update_cell(a, b, i, j, diag, diag2);
        }
        diag[0] = k as u32;
        if k <= a_len {
            diag[k] = k as u32;
        }
        if k == total {
            return diag[s];
        }
        std::mem::swap(&mut diag, &mut diag2);
    }
    unreachable!("k = aLen + bLen always returns above")
}

/// Same, with a pointer-sized accumulator for sequences whose combined
/// length no longer fits in `u32`.
pub fn drive_scalar_wide<E: PartialEq>(a: &[E], b: &[E], diag: &mut [u64], diag2: &mut [u64]) -> u64 {
    let a_len = a.len();
    let b_len = b.len();
    let mut diag = diag;
    let mut diag2 = diag2;
    let total = a_len + b_len;
    for k in 1..=total {
        let s = start_row(k, b_len);
        let e = end_row(k, a_len);
        for i in (s..=e).rev() {
            let j = k - i;
            update_cell_wide(a, b, i, j, diag, diag2);
        }
        diag[0] = k as u64;
        if k <= a_len {
            diag[k] = k as u64;
        }
        if k == total {
            return diag[s];
        }
        std::mem::swap(&mut diag, &mut diag2);
    }
    unreachable!("k = aLen + bLen always returns above")
}

/// Runs the sweep using the SIMD block updater for 16-row runs that fit
/// entirely inside the current anti-diagonal, falling back to the scalar
/// updater for the few rows at each end that don't.
///
/// `block` computes 16 consecutive cells the same way 16 calls to
/// [`update_cell`] would, reading/writing through raw `u32` pointers (see
/// [`crate::simd`]). `diag`/`diag2` must be backed by
/// [`crate::buffer::AlignedBuffer`] so the block updater's unaligned
/// loads/stores up to 3 lanes past either logical edge stay in bounds.
///
/// # Safety
/// `block` must satisfy the safety contract documented on the concrete
/// `dist_core::simd::block_update_*` function passed in.
#[cfg(target_arch = "x86_64")]
pub unsafe fn drive_simd<E: PartialEq + Copy>(
    a: &[E],
    b: &[E],
    diag: &mut [u32],
    diag2: &mut [u32],
    block: unsafe fn(&[E], &[E], usize, usize, *mut u32, *const u32, bool),
    fast_min: bool,
) -> u32 {
    let a_len = a.len();
    let b_len = b.len();
    let mut diag = diag;
    let mut diag2 = diag2;
    let total = a_len + b_len;
    for k in 1..=total {
        let s = start_row(k, b_len);
        let e = end_row(k, a_len);
        let mut i = e;
        while i >= s {
            let j = k - i;
            let block_fits = i >= 16 && b_len - j >= 16 && i - s + 1 >= 16;
            if block_fits {
                #[cfg(feature = "verify-simd")]
                let shadow = shadow_block::<E>(a, b, i, j, diag.as_ptr(), diag2.as_ptr());
                block(a, b, i, j, diag.as_mut_ptr(), diag2.as_ptr(), fast_min);
                #[cfg(feature = "verify-simd")]
                for (off, expected) in shadow.into_iter().enumerate() {
                    let actual = *diag.as_ptr().add(i - 15 + off);
                    assert_eq!(
                        actual, expected,
                        "verify-simd: SIMD block disagrees with scalar recurrence at row {}",
                        i - 15 + off
                    );
                }
                i -= 16;
            } else {
                update_cell(a, b, i, j, diag, diag2);
                // `i >= s >= 1` always holds here, so this never underflows.
                i -= 1;
            }
        }
        diag[0] = k as u32;
        if k <= a_len {
            diag[k] = k as u32;
        }
        if k == total {
            return diag[s];
        }
        std::mem::swap(&mut diag, &mut diag2);
    }
    unreachable!("k = aLen + bLen always returns above")
}

/// Runs the scalar recurrence over the 16 cells a SIMD block is about to
/// compute, reading from the same pre-block buffer state the block itself
/// will read from, so the two can be compared independently. Behind the
/// `verify-simd` feature only, as an opt-in verification mode — never on the
/// release hot path.
///
/// # Safety
/// Same precondition as the SIMD block updaters in [`crate::simd`]:
/// `diag[i-19..=i]`/`diag2[i-19..=i]` must be valid to read.
#[cfg(all(target_arch = "x86_64", feature = "verify-simd"))]
fn shadow_block<E: PartialEq + Copy>(
    a: &[E],
    b: &[E],
    i: usize,
    j: usize,
    diag: *const u32,
    diag2: *const u32,
) -> [u32; 16] {
    let base = i - 16;
    let mut window: [u32; 17] = std::array::from_fn(|o| unsafe { *diag.add(base + o) });
    let window2: [u32; 17] = std::array::from_fn(|o| unsafe { *diag2.add(base + o) });
    for row in (i - 15..=i).rev() {
        let off = row - base;
        let col = j + (i - row);
        let cost = if a[row - 1] == b[col - 1] { 0 } else { 1 };
        window[off] = (window2[off - 1] + 1)
            .min(window2[off] + 1)
            .min(window[off - 1] + cost);
    }
    let mut out = [0u32; 16];
    out.copy_from_slice(&window[1..=16]);
    out
}
