//! Dense `i32` semiring kernels: matrix multiply and all-pairs shortest paths.
//!
//! Both kernels share one execution model. Inner loops run 8 lanes of `i32`
//! at a time (AVX2 where available) with a scalar tail, and rows are spread
//! across a rayon pool. Matmul rows are fully independent. Shortest-path rows
//! are independent only within a pivot, so pivots are separated by a barrier.
//!
//! ## Usage
//!
//! ```
//! use semiring_kernels::{AlignedBuffer, matmul};
//!
//! let a = AlignedBuffer::from_slice(&[1, 2, 3, 4]).unwrap();
//! let b = AlignedBuffer::from_slice(&[5, 6, 7, 8]).unwrap();
//! let mut res = AlignedBuffer::zeroed(4).unwrap();
//!
//! matmul(&a, &b, &mut res, 2, 2, 2).unwrap();
//! assert_eq!(&res[..], &[19, 22, 43, 50]);
//! ```
//!
//! Shortest paths, with [`SENTINEL`] for a missing edge:
//!
//! ```
//! use semiring_kernels::{AlignedBuffer, SENTINEL, apsp};
//!
//! let s = SENTINEL;
//! let d = AlignedBuffer::from_slice(&[0, 3, s, 3, 0, 1, s, 1, 0]).unwrap();
//! let mut r = AlignedBuffer::zeroed(9).unwrap();
//!
//! apsp(&mut r, &d, 3).unwrap();
//! assert_eq!(&r[..], &[0, 3, 4, 3, 0, 1, 4, 1, 0]);
//! ```
//!
//! ## What's inside
//!
//! - 32-byte aligned buffers; misaligned slices are rejected at entry
//! - AVX2 lane kernels with a portable lane fallback and a scalar path
//! - Saturating min-plus combine, so "no edge" never wraps
//! - Adaptive multi-threading (scales down for small problems)

pub mod buffer;
pub mod config;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod semiring;
pub mod threaded;
pub mod validate;

pub use buffer::{ALIGN, AlignedBuffer};
pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use matrix::DenseMatrix;
pub use matrix::naive_ijk::{apsp_naive, matmul_naive_ijk};
pub use semiring::{SENTINEL, THRESHOLD, saturating_add};

/// Matrix multiply: Res = A × B over wrapping `i32`.
///
/// Matrices are row-major: A is m×n, B is n×k, Res is m×k. Every cell of Res
/// is overwritten, so it need not be zeroed.
///
/// # Errors
///
/// Fails if a dimension is zero, a slice length doesn't match its
/// dimensions, or a slice isn't 32-byte aligned.
pub fn matmul(a: &[i32], b: &[i32], res: &mut [i32], m: usize, n: usize, k: usize) -> Result<()> {
    matmul_with(a, b, res, m, n, k, &KernelConfig::default())
}

/// Same as [`matmul`] with explicit thread and SIMD settings.
pub fn matmul_with(
    a: &[i32],
    b: &[i32],
    res: &mut [i32],
    m: usize,
    n: usize,
    k: usize,
    config: &KernelConfig,
) -> Result<()> {
    validate::check_matmul(a, b, res, m, n, k)?;
    threaded::matmul_mt::matmul_mt(a, b, res, m, n, k, config)
}

/// All-pairs shortest paths: copies `d` into `r`, then relaxes `r` in place.
///
/// Both are row-major n×n. Distances must be non-negative and either below
/// [`THRESHOLD`] or exactly [`SENTINEL`].
///
/// # Errors
///
/// Fails on a zero or mismatched dimension, a misaligned slice, or a
/// distance outside the accepted range.
pub fn apsp(r: &mut [i32], d: &[i32], n: usize) -> Result<()> {
    apsp_with(r, d, n, &KernelConfig::default())
}

/// Same as [`apsp`] with explicit thread and SIMD settings.
pub fn apsp_with(r: &mut [i32], d: &[i32], n: usize, config: &KernelConfig) -> Result<()> {
    validate::check_apsp(r, d, n)?;
    threaded::apsp_mt::apsp_mt(r, Some(d), n, config)
}

/// All-pairs shortest paths where the output is the input.
pub fn apsp_in_place(r: &mut [i32], n: usize) -> Result<()> {
    apsp_in_place_with(r, n, &KernelConfig::default())
}

/// Same as [`apsp_in_place`] with explicit thread and SIMD settings.
pub fn apsp_in_place_with(r: &mut [i32], n: usize, config: &KernelConfig) -> Result<()> {
    validate::check_buffer("R", r, n, n)?;
    validate::check_distances(r, n)?;
    threaded::apsp_mt::apsp_mt(r, None, n, config)
}
