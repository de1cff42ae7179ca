//! Min-plus row relaxation, the inner loop of the shortest-path kernel.
//!
//! For a fixed pivot k and row i, with `via = R[i][k]`:
//!
//! ```text
//! for j in 0..n:
//!     R[i][j] = min(R[i][j], saturating_add(via, R[k][j]))
//! ```
//!
//! `via` is read once before the loop. With a non-negative diagonal the
//! relaxation of column k cannot change it, so this matches reading it per
//! element.

use super::lanes::{LANE, chunked, load, store};
use crate::semiring::{MinPlus, SENTINEL, Semiring, THRESHOLD};

pub fn relax_row_scalar(row: &mut [i32], pivot_row: &[i32], via: i32) {
    debug_assert_eq!(row.len(), pivot_row.len());
    for (r, &p) in row.iter_mut().zip(pivot_row) {
        *r = MinPlus::reduce(*r, MinPlus::combine(via, p));
    }
}

/// Portable lane version over `[i32; 8]` arrays.
pub fn relax_row_lanes(row: &mut [i32], pivot_row: &[i32], via: i32) {
    debug_assert_eq!(row.len(), pivot_row.len());
    let n = row.len();

    // The two closures both need the row; split it so each owns its part.
    let main = n - n % LANE;
    let (head, tail) = row.split_at_mut(main);

    chunked(
        n,
        |off| {
            let cur = load(head, off);
            let y = load(pivot_row, off);
            let mut out = cur;
            for l in 0..LANE {
                out[l] = MinPlus::reduce(cur[l], MinPlus::combine(via, y[l]));
            }
            store(head, off, &out);
        },
        |idx| {
            let r = &mut tail[idx - main];
            *r = MinPlus::reduce(*r, MinPlus::combine(via, pivot_row[idx]));
        },
    );
}

/// AVX2 relaxation with a lane-wise saturating add.
///
/// Per lane: `z = x + y` is kept only if `x`, `y` and the wrapped `z` are all
/// below [`THRESHOLD`]; otherwise the lane becomes [`SENTINEL`]. This is the
/// same decision [`crate::semiring::saturating_add`] makes, so the vector and
/// scalar paths agree bit for bit.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2
/// - `row.len() == pivot_row.len()`
/// - `row` and `pivot_row` do not overlap
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn relax_row_avx2(row: &mut [i32], pivot_row: &[i32], via: i32) {
    use std::arch::x86_64::*;

    debug_assert_eq!(row.len(), pivot_row.len());
    let n = row.len();
    let pr = row.as_mut_ptr();
    let pp = pivot_row.as_ptr();

    let thr = _mm256_set1_epi32(THRESHOLD);
    let sentinel = _mm256_set1_epi32(SENTINEL);
    let x = _mm256_set1_epi32(via);
    let x_ok = _mm256_cmpgt_epi32(thr, x);

    chunked(
        n,
        |off| unsafe {
            let y = _mm256_loadu_si256(pp.add(off).cast::<__m256i>());
            let cur = _mm256_loadu_si256(pr.add(off).cast::<__m256i>());

            let y_ok = _mm256_cmpgt_epi32(thr, y);
            let z = _mm256_add_epi32(x, y);
            let z_ok = _mm256_cmpgt_epi32(thr, z);
            let ok = _mm256_and_si256(_mm256_and_si256(x_ok, y_ok), z_ok);
            let z = _mm256_blendv_epi8(sentinel, z, ok);

            _mm256_storeu_si256(pr.add(off).cast::<__m256i>(), _mm256_min_epi32(cur, z));
        },
        |idx| unsafe {
            let r = pr.add(idx);
            *r = MinPlus::reduce(*r, MinPlus::combine(via, *pp.add(idx)));
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Mix of small weights, values near the threshold and the sentinel.
    fn random_distances(rng: &mut StdRng, len: usize) -> Vec<i32> {
        (0..len)
            .map(|_| match rng.gen_range(0..6) {
                0 => SENTINEL,
                1 => THRESHOLD - rng.gen_range(1..1000),
                2 => rng.gen_range(THRESHOLD..SENTINEL),
                _ => rng.gen_range(0..1000),
            })
            .collect()
    }

    #[test]
    fn test_lanes_match_scalar() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in [1, 7, 8, 9, 16, 17, 31, 1001] {
            let row = random_distances(&mut rng, n);
            let pivot = random_distances(&mut rng, n);
            for via in [0, 5, THRESHOLD - 1, THRESHOLD, SENTINEL] {
                let mut a = row.clone();
                let mut b = row.clone();
                relax_row_scalar(&mut a, &pivot, via);
                relax_row_lanes(&mut b, &pivot, via);
                assert_eq!(a, b, "n {} via {}", n, via);
            }
        }
    }

    #[test]
    fn test_sentinel_via_changes_nothing() {
        let row = vec![4, SENTINEL, 0, 9, 1, 2, 3, 4, 5];
        let pivot = vec![0; 9];
        let mut out = row.clone();
        relax_row_lanes(&mut out, &pivot, SENTINEL);
        assert_eq!(out, row);
    }

    #[test]
    fn test_no_wrap_to_negative() {
        // Without saturation SENTINEL + 1 would wrap to i32::MIN and win the min.
        let mut row = vec![SENTINEL; 11];
        let pivot = vec![SENTINEL; 11];
        relax_row_scalar(&mut row, &pivot, 1);
        assert!(row.iter().all(|&x| x == SENTINEL));
        relax_row_lanes(&mut row, &pivot, 1);
        assert!(row.iter().all(|&x| x == SENTINEL));
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_avx2_matches_scalar() {
        if !is_x86_feature_detected!("avx2") {
            println!("Skipping - AVX2 not available");
            return;
        }

        let mut rng = StdRng::seed_from_u64(5);
        for n in [1, 7, 8, 9, 23, 24, 25, 3001] {
            let row = random_distances(&mut rng, n);
            let pivot = random_distances(&mut rng, n);
            for via in [0, 17, THRESHOLD - 1, THRESHOLD, SENTINEL - 1, SENTINEL] {
                let mut a = row.clone();
                let mut b = row.clone();
                relax_row_scalar(&mut a, &pivot, via);
                unsafe { relax_row_avx2(&mut b, &pivot, via) };
                assert_eq!(a, b, "n {} via {}", n, via);
            }
        }
    }
}
