use crate::semiring::{MinPlus, Semiring, SumProduct};

/// Naive matrix multiplication using i-j-d loop order.
///
/// This is the textbook triple loop over wrapping `i32`. It's slow because
/// the innermost loop walks B with stride `k` (column-wise), but every cell
/// is a plain left-to-right sum, which makes it the correctness baseline for
/// the lane kernels.
///
/// Each cell is written, not accumulated into, so `res` may hold anything.
///
/// # Arguments
///
/// * `a` - Matrix A (m × n), row-major
/// * `b` - Matrix B (n × k), row-major
/// * `res` - Matrix Res (m × k), row-major, overwritten
/// * `m` - Rows of A and Res
/// * `n` - Columns of A, rows of B
/// * `k` - Columns of B and Res
pub fn matmul_naive_ijk(a: &[i32], b: &[i32], res: &mut [i32], m: usize, n: usize, k: usize) {
    for i in 0..m {
        for j in 0..k {
            let mut sum = SumProduct::ZERO;
            for d in 0..n {
                sum = SumProduct::reduce(sum, SumProduct::combine(a[i * n + d], b[d * k + j]));
            }
            res[i * k + j] = sum;
        }
    }
}

/// Textbook all-pairs shortest paths, single threaded, no lanes.
///
/// Copies `d` into `r`, then for each pivot `p` relaxes every `(i, j)`
/// through it, reading `r[i][p]` afresh for every element.
///
/// # Arguments
///
/// * `r` - Output distances (n × n), row-major, overwritten
/// * `d` - Input distances (n × n), row-major; `SENTINEL` means no edge
pub fn apsp_naive(r: &mut [i32], d: &[i32], n: usize) {
    r[..n * n].copy_from_slice(&d[..n * n]);
    for p in 0..n {
        for i in 0..n {
            for j in 0..n {
                let z = MinPlus::combine(r[i * n + p], r[p * n + j]);
                r[i * n + j] = MinPlus::reduce(r[i * n + j], z);
            }
        }
    }
}
