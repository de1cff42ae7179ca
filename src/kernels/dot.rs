//! Sum-product dot product, the inner reduction of matmul.
//!
//! All three versions reduce with wrapping `i32` arithmetic. Wrapping addition
//! is associative and commutative, so summing per-lane partials and folding
//! them at the end gives the same bits as a left-to-right scalar loop.

use super::lanes::{LANE, Lane, chunked, load};
use crate::semiring::{Semiring, SumProduct};

/// Plain left-to-right reduction. The reference every other path must match.
pub fn dot_scalar(a: &[i32], b: &[i32]) -> i32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).fold(SumProduct::ZERO, |acc, (&x, &y)| {
        SumProduct::reduce(acc, SumProduct::combine(x, y))
    })
}

/// Lane-shaped reduction over `[i32; 8]` arrays.
///
/// Used on CPUs without AVX2. LLVM turns the inner lane loop into whatever
/// vector width the target has.
pub fn dot_lanes(a: &[i32], b: &[i32]) -> i32 {
    debug_assert_eq!(a.len(), b.len());
    let mut acc: Lane = [SumProduct::ZERO; LANE];
    let mut tail = SumProduct::ZERO;

    chunked(
        a.len(),
        |off| {
            let x = load(a, off);
            let y = load(b, off);
            for l in 0..LANE {
                acc[l] = SumProduct::reduce(acc[l], SumProduct::combine(x[l], y[l]));
            }
        },
        |idx| tail = SumProduct::reduce(tail, SumProduct::combine(a[idx], b[idx])),
    );

    acc.iter().fold(tail, |s, &v| SumProduct::reduce(s, v))
}

/// AVX2 dot product: 8 `vpmulld` + `vpaddd` per step, scalar tail.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `a.len() == b.len()`
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn dot_avx2(a: &[i32], b: &[i32]) -> i32 {
    use std::arch::x86_64::*;

    debug_assert_eq!(a.len(), b.len());
    let pa = a.as_ptr();
    let pb = b.as_ptr();

    let mut acc = _mm256_setzero_si256();
    let mut tail = SumProduct::ZERO;

    chunked(
        a.len(),
        |off| unsafe {
            // Row starts are only 32-byte aligned when the row length is a
            // multiple of LANE, so use unaligned loads.
            let x = _mm256_loadu_si256(pa.add(off).cast::<__m256i>());
            let y = _mm256_loadu_si256(pb.add(off).cast::<__m256i>());
            acc = _mm256_add_epi32(acc, _mm256_mullo_epi32(x, y));
        },
        |idx| tail = SumProduct::reduce(tail, SumProduct::combine(a[idx], b[idx])),
    );

    let mut partial: Lane = [0; LANE];
    unsafe { _mm256_storeu_si256(partial.as_mut_ptr().cast::<__m256i>(), acc) };
    partial.iter().fold(tail, |s, &v| SumProduct::reduce(s, v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_vec(rng: &mut StdRng, len: usize) -> Vec<i32> {
        (0..len).map(|_| rng.r#gen::<i32>()).collect()
    }

    #[test]
    fn test_dot_lanes_matches_scalar() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [1, 5, 8, 9, 15, 16, 17, 999] {
            let a = random_vec(&mut rng, len);
            let b = random_vec(&mut rng, len);
            assert_eq!(dot_lanes(&a, &b), dot_scalar(&a, &b), "len {}", len);
        }
    }

    #[test]
    fn test_dot_wraps() {
        let a = vec![i32::MAX; 9];
        let b = vec![2; 9];
        let expected = (0..9).fold(0i32, |s, _| s.wrapping_add(i32::MAX.wrapping_mul(2)));
        assert_eq!(dot_scalar(&a, &b), expected);
        assert_eq!(dot_lanes(&a, &b), expected);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_dot_avx2_matches_scalar() {
        if !is_x86_feature_detected!("avx2") {
            println!("Skipping - AVX2 not available");
            return;
        }

        let mut rng = StdRng::seed_from_u64(11);
        for len in [1, 7, 8, 9, 23, 24, 25, 999] {
            let a = random_vec(&mut rng, len);
            let b = random_vec(&mut rng, len);
            let got = unsafe { dot_avx2(&a, &b) };
            assert_eq!(got, dot_scalar(&a, &b), "len {}", len);
        }
    }
}
