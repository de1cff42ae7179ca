//! Worker-count selection and pool construction.

use crate::config::KernelConfig;
use crate::error::Result;
use rayon::{ThreadPool, ThreadPoolBuilder};

const SINGLE_THREAD_THRESHOLD: f64 = 100_000_000.0;
const TWO_THREAD_THRESHOLD: f64 = 300_000_000.0;

/// Fewest rows worth handing to one worker.
const MIN_ROWS_PER_THREAD: usize = 16;

/// Picks how many workers a call should use.
///
/// Thread count adapts to problem size:
/// - < 100M operations: 1 thread
/// - < 300M operations: 2 threads
/// - Otherwise: up to `max_threads`
///
/// and never more than one worker per [`MIN_ROWS_PER_THREAD`] rows.
pub fn choose_thread_count(ops: f64, rows: usize, max_threads: usize) -> usize {
    let optimal_threads = if ops < SINGLE_THREAD_THRESHOLD {
        1
    } else if ops < TWO_THREAD_THRESHOLD {
        2
    } else {
        max_threads
    };

    let threads_by_rows = (rows / MIN_ROWS_PER_THREAD).max(1);

    optimal_threads.min(threads_by_rows).min(max_threads).max(1)
}

/// Worker count for a call, honouring `config.adaptive`.
pub fn threads_for(config: &KernelConfig, ops: f64, rows: usize) -> usize {
    if config.adaptive {
        choose_thread_count(ops, rows, config.num_threads)
    } else {
        config.num_threads.max(1)
    }
}

/// Builds a dedicated pool for one kernel call.
pub fn build_pool(threads: usize) -> Result<ThreadPool> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|idx| format!("semiring-worker-{}", idx))
        .build()?;
    Ok(pool)
}
