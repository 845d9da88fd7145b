//! Int8 dot-product micro-kernel with a NEON path and a scalar fallback.
//!
//! Both paths accumulate in 32 bits with two's-complement wrap, so they agree
//! bit-for-bit with the direct engine's truncation to `i32`.

// ── INT8 dot product: sum(a[a_off..] * b[b_off..]) ──
//
// Uses vmull_s8 (8xi8 -> 8xi16) + vpadalq_s16 (pairwise add-accumulate i16 -> i32).
// A single i8 x i8 product is at most 16384 in magnitude, so the i16 lanes never overflow.

#[cfg(all(target_arch = "aarch64", feature = "simd"))]
pub fn dot_i8(a: &[i8], a_off: usize, b: &[i8], b_off: usize, len: usize) -> i32 {
    use core::arch::aarch64::*;
    assert!(a_off + len <= a.len() && b_off + len <= b.len());
    let mut j = 0usize;
    // SAFETY: every load reads 8 or 16 lanes starting below `a_off + len` / `b_off + len`,
    // which the assertion above keeps in bounds.
    unsafe {
        let mut acc0 = vdupq_n_s32(0);
        let mut acc1 = vdupq_n_s32(0);

        while j + 16 <= len {
            let va = vld1q_s8(a.as_ptr().add(a_off + j));
            let vb = vld1q_s8(b.as_ptr().add(b_off + j));
            let prod_lo = vmull_s8(vget_low_s8(va), vget_low_s8(vb));
            let prod_hi = vmull_s8(vget_high_s8(va), vget_high_s8(vb));
            acc0 = vpadalq_s16(acc0, prod_lo);
            acc1 = vpadalq_s16(acc1, prod_hi);
            j += 16;
        }

        if j + 8 <= len {
            let va = vld1_s8(a.as_ptr().add(a_off + j));
            let vb = vld1_s8(b.as_ptr().add(b_off + j));
            let prod = vmull_s8(va, vb);
            acc0 = vpadalq_s16(acc0, prod);
            j += 8;
        }

        acc0 = vaddq_s32(acc0, acc1);
        let mut sum = vaddvq_s32(acc0);

        // scalar tail
        while j < len {
            sum = sum.wrapping_add(a[a_off + j] as i32 * b[b_off + j] as i32);
            j += 1;
        }
        sum
    }
}

#[cfg(not(all(target_arch = "aarch64", feature = "simd")))]
pub fn dot_i8(a: &[i8], a_off: usize, b: &[i8], b_off: usize, len: usize) -> i32 {
    let a = &a[a_off..a_off + len];
    let b = &b[b_off..b_off + len];
    a.iter()
        .zip(b)
        .fold(0i32, |sum, (&x, &y)| sum.wrapping_add(x as i32 * y as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_scalar_sum_for_odd_lengths() {
        let a: Vec<i8> = (0..37).map(|i| ((i * 13) % 256) as u8 as i8).collect();
        let b: Vec<i8> = (0..37).map(|i| ((i * 29 + 7) % 256) as u8 as i8).collect();
        for len in [0, 1, 7, 8, 15, 16, 17, 24, 31, 37] {
            let expected: i32 = (0..len).map(|j| a[j] as i32 * b[j] as i32).sum();
            assert_eq!(dot_i8(&a, 0, &b, 0, len), expected, "len {len}");
        }
    }

    #[test]
    fn honours_offsets() {
        let a = [1i8, 2, 3, 4];
        let b = [-1i8, -1, 10, 20];
        assert_eq!(dot_i8(&a, 2, &b, 2, 2), 3 * 10 + 4 * 20);
    }

    #[test]
    fn extremes() {
        let a = vec![-128i8; 64];
        assert_eq!(dot_i8(&a, 0, &a, 0, 64), 64 * 16384);
    }
}
