//! Multi-threaded all-pairs shortest paths over the min-plus semiring.
//!
//! Pivots run strictly in order. Within a pivot every row is independent, so
//! rows are spread across workers; the next pivot starts only after every row
//! of the current one is done.

use crate::buffer::AlignedBuffer;
use crate::config::KernelConfig;
use crate::error::Result;
use crate::kernels::{self, SimdLevel};
use crate::semiring::THRESHOLD;
use crate::threaded::pool;
use rayon::prelude::*;
use std::time::Instant;

/// Drives the pivot generations of an in-place relaxation.
///
/// Generation `k` copies row `k` into an aligned snapshot, then hands every
/// row `i` to the relax callback as `(k, i, &mut row_i, &pivot_row)`. The
/// call to [`PivotPhases::step`] returns only when all rows have been
/// processed, which is the barrier between generations.
///
/// The snapshot lets workers own their rows mutably while all of them read
/// the pivot row. For non-negative distances `R[k][k] >= 0`, so relaxing row
/// `k` through itself leaves it unchanged and the snapshot stays exact for
/// the whole generation.
pub(crate) struct PivotPhases<'a> {
    dist: &'a mut [i32],
    n: usize,
    pivot_row: AlignedBuffer<i32>,
    generation: usize,
    parallel: bool,
}

impl<'a> PivotPhases<'a> {
    /// `parallel = false` processes rows on the calling thread. When true,
    /// rows go to the current rayon pool.
    pub fn new(dist: &'a mut [i32], n: usize, parallel: bool) -> Result<Self> {
        debug_assert_eq!(dist.len(), n * n);
        Ok(Self {
            dist,
            n,
            pivot_row: AlignedBuffer::zeroed(n)?,
            generation: 0,
            parallel,
        })
    }

    /// Pivots completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn is_done(&self) -> bool {
        self.generation == self.n
    }

    /// Runs one pivot over every row and waits for all of them.
    pub fn step<F>(&mut self, relax: &F)
    where
        F: Fn(usize, usize, &mut [i32], &[i32]) + Sync,
    {
        let n = self.n;
        let k = self.generation;
        debug_assert!(k < n);

        self.pivot_row.copy_from_slice(&self.dist[k * n..(k + 1) * n]);
        let pivot: &[i32] = &self.pivot_row;

        if self.parallel {
            self.dist
                .par_chunks_mut(n)
                .enumerate()
                .for_each(|(i, row)| relax(k, i, row, pivot));
        } else {
            for (i, row) in self.dist.chunks_mut(n).enumerate() {
                relax(k, i, row, pivot);
            }
        }

        self.generation += 1;
    }

    /// Runs every remaining pivot. Returns the number of generations run.
    pub fn run<F>(mut self, relax: F) -> usize
    where
        F: Fn(usize, usize, &mut [i32], &[i32]) + Sync,
    {
        while !self.is_done() {
            self.step(&relax);
        }
        self.generation()
    }
}

/// Relaxation of one row for pivot `k`.
#[inline]
fn relax_through_pivot(level: SimdLevel, k: usize, row: &mut [i32], pivot_row: &[i32]) {
    let via = row[k];
    // Anything routed through an unreachable pivot saturates to the sentinel,
    // which never wins the min.
    if via >= THRESHOLD {
        return;
    }
    kernels::relax_row(level, row, pivot_row, via);
}

/// Shortest paths over an `n × n` distance matrix.
///
/// With `d = Some(..)` the matrix is first copied into `r` (rows in
/// parallel); with `None`, `r` already holds the input and is relaxed in
/// place.
///
/// Inputs are not checked here; see [`crate::apsp_with`].
pub(crate) fn apsp_mt(
    r: &mut [i32],
    d: Option<&[i32]>,
    n: usize,
    config: &KernelConfig,
) -> Result<()> {
    let level = config.simd_level();
    let ops = 2.0 * (n as f64).powi(3);
    let threads = pool::threads_for(config, ops, n);

    log::debug!("apsp n={}: {} thread(s), {} inner loop", n, threads, level);

    let run = |r: &mut [i32], parallel: bool| -> Result<usize> {
        let start = Instant::now();
        if let Some(d) = d {
            if parallel {
                r.par_chunks_mut(n)
                    .zip(d.par_chunks(n))
                    .for_each(|(dst, src)| dst.copy_from_slice(src));
            } else {
                r.copy_from_slice(d);
            }
            log::debug!("apsp copy phase took {:.2?}", start.elapsed());
        }

        let phases = PivotPhases::new(r, n, parallel)?;
        let generations =
            phases.run(|k, _i, row, pivot_row| relax_through_pivot(level, k, row, pivot_row));
        log::debug!(
            "apsp relaxed {} pivots in {:.2?}",
            generations,
            start.elapsed()
        );
        Ok(generations)
    };

    let generations = if threads == 1 {
        run(r, false)?
    } else {
        let pool = pool::build_pool(threads)?;
        pool.install(|| run(r, true))?
    };

    debug_assert_eq!(generations, n);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::naive_ijk::apsp_naive;
    use crate::semiring::SENTINEL;
    use std::sync::Mutex;

    fn ring(n: usize) -> Vec<i32> {
        let mut d = vec![SENTINEL; n * n];
        for i in 0..n {
            let next = (i + 1) % n;
            if next != i {
                d[i * n + next] = (i % 5 + 1) as i32;
                d[next * n + i] = (i % 5 + 1) as i32;
            }
        }
        for i in 0..n {
            d[i * n + i] = 0;
        }
        d
    }

    #[test]
    fn test_pivots_are_barriered() {
        let n = 37;
        let mut dist = ring(n);
        let visits = Mutex::new(Vec::with_capacity(n * n));

        let pool = pool::build_pool(4).unwrap();
        let generations = pool.install(|| {
            let phases = PivotPhases::new(&mut dist, n, true).unwrap();
            phases.run(|k, i, _row, _pivot| visits.lock().unwrap().push((k, i)))
        });
        assert_eq!(generations, n);

        let visits = visits.into_inner().unwrap();
        assert_eq!(visits.len(), n * n);
        // Entries appear in completion order. Pivot k must be fully logged
        // before pivot k + 1 begins.
        for (pos, &(k, _)) in visits.iter().enumerate() {
            assert_eq!(k, pos / n, "pivot {} ran out of order at {}", k, pos);
        }
        for k in 0..n {
            let mut rows: Vec<usize> = visits[k * n..(k + 1) * n].iter().map(|&(_, i)| i).collect();
            rows.sort_unstable();
            assert_eq!(rows, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_step_by_step_generation() {
        let n = 5;
        let mut dist = ring(n);
        let mut phases = PivotPhases::new(&mut dist, n, false).unwrap();
        assert_eq!(phases.generation(), 0);
        phases.step(&|_, _, _: &mut [i32], _: &[i32]| {});
        phases.step(&|_, _, _: &mut [i32], _: &[i32]| {});
        assert_eq!(phases.generation(), 2);
        assert!(!phases.is_done());
    }

    #[test]
    fn test_apsp_mt_matches_naive() {
        for n in [1, 2, 9, 33, 70] {
            let d = ring(n);
            let mut expected = vec![0; n * n];
            apsp_naive(&mut expected, &d, n);

            let config = KernelConfig::default().with_threads(4).with_adaptive(false);
            let mut r = vec![-7; n * n];
            apsp_mt(&mut r, Some(&d), n, &config).unwrap();
            assert_eq!(expected, r, "n {}", n);
        }
    }

    #[test]
    fn test_apsp_mt_in_place() {
        let n = 19;
        let d = ring(n);
        let mut expected = vec![0; n * n];
        apsp_naive(&mut expected, &d, n);

        let mut r = d.clone();
        apsp_mt(&mut r, None, n, &KernelConfig::default()).unwrap();
        assert_eq!(expected, r);
    }
}
