//! Multi-threaded i32 matmul over the sum-product semiring.

use crate::buffer::AlignedBuffer;
use crate::config::KernelConfig;
use crate::error::Result;
use crate::kernels::{self, SimdLevel};
use crate::matrix::transpose::transpose;
use crate::threaded::pool;
use rayon::prelude::*;
use std::time::Instant;

/// Computes `Res = A × B` with rows of Res spread across workers.
///
/// B is transposed once into aligned scratch so every output cell is a dot
/// product of two contiguous rows. Each worker owns a disjoint run of output
/// rows; the only synchronisation is the join at the end.
///
/// Inputs are not checked here; see [`crate::matmul_with`].
///
/// # Arguments
///
/// * `a` - Matrix A (m × n), row-major
/// * `b` - Matrix B (n × k), row-major
/// * `res` - Matrix Res (m × k), row-major, overwritten
#[allow(clippy::too_many_arguments)]
pub(crate) fn matmul_mt(
    a: &[i32],
    b: &[i32],
    res: &mut [i32],
    m: usize,
    n: usize,
    k: usize,
    config: &KernelConfig,
) -> Result<()> {
    let level = config.simd_level();
    let ops = 2.0 * m as f64 * n as f64 * k as f64;
    let threads = pool::threads_for(config, ops, m);

    log::debug!(
        "matmul {}x{}x{}: {} thread(s), {} inner loop",
        m,
        n,
        k,
        threads,
        level
    );

    let start = Instant::now();
    let mut bt = AlignedBuffer::zeroed(n * k)?;
    transpose(b, &mut bt, n, k);

    if threads == 1 {
        for (i, out_row) in res.chunks_mut(k).enumerate() {
            matmul_row(level, &a[i * n..(i + 1) * n], &bt, out_row, n);
        }
    } else {
        let pool = pool::build_pool(threads)?;
        pool.install(|| {
            res.par_chunks_mut(k)
                .enumerate()
                .for_each(|(i, out_row)| matmul_row(level, &a[i * n..(i + 1) * n], &bt, out_row, n));
        });
    }

    log::debug!("matmul finished in {:.2?}", start.elapsed());
    Ok(())
}

/// One output row: `out_row[j] = a_row · bt[j]`.
#[inline]
fn matmul_row(level: SimdLevel, a_row: &[i32], bt: &[i32], out_row: &mut [i32], n: usize) {
    for (j, cell) in out_row.iter_mut().enumerate() {
        *cell = kernels::dot(level, a_row, &bt[j * n..(j + 1) * n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::naive_ijk::matmul_naive_ijk;

    #[test]
    fn test_matmul_mt_correctness() {
        let (m, n, k) = (67, 45, 29);

        let a: Vec<i32> = (0..m * n).map(|i| (i % 13) as i32 - 6).collect();
        let b: Vec<i32> = (0..n * k).map(|i| (i % 10) as i32).collect();

        let mut c_naive = vec![0; m * k];
        matmul_naive_ijk(&a, &b, &mut c_naive, m, n, k);

        let config = KernelConfig::default().with_threads(4).with_adaptive(false);
        let mut c_mt = vec![-1; m * k];
        matmul_mt(&a, &b, &mut c_mt, m, n, k, &config).unwrap();

        assert_eq!(c_naive, c_mt);
    }

    #[test]
    fn test_matmul_mt_every_level() {
        let (m, n, k) = (9, 17, 11);
        let a: Vec<i32> = (0..m * n).map(|i| (i * 7919) as i32).collect();
        let b: Vec<i32> = (0..n * k).map(|i| (i * 104729) as i32).collect();

        let mut expected = vec![0; m * k];
        matmul_naive_ijk(&a, &b, &mut expected, m, n, k);

        for level in [SimdLevel::Scalar, SimdLevel::Lanes, SimdLevel::Avx2] {
            let config = KernelConfig::default().with_simd(level);
            let mut got = vec![0; m * k];
            matmul_mt(&a, &b, &mut got, m, n, k, &config).unwrap();
            assert_eq!(expected, got, "{}", level);
        }
    }
}
