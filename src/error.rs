//! Errors reported at kernel entry and at allocation.
//!
//! Nothing inside the hot loops can fail. Everything here is detected before
//! the first lane is touched.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KernelError {
    /// The global allocator could not provide the aligned block. Fatal.
    #[error("failed to allocate {bytes} bytes at {align}-byte alignment")]
    Allocation { bytes: usize, align: usize },

    #[error("refusing to allocate an empty buffer")]
    EmptyBuffer,

    #[error("dimension {name} must be positive")]
    ZeroDimension { name: &'static str },

    #[error("dimensions {rows}x{cols} overflow the address space")]
    DimensionOverflow { rows: usize, cols: usize },

    #[error("{name}: expected {rows}x{cols}={expected} elements, got {actual}")]
    LengthMismatch {
        name: &'static str,
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{op}: incompatible shapes {left_rows}x{left_cols} and {right_rows}x{right_cols}")]
    ShapeMismatch {
        op: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("{name}: base address {addr:#x} is not {align}-byte aligned")]
    Misaligned {
        name: &'static str,
        addr: usize,
        align: usize,
    },

    #[error("distance ({row}, {col}) = {value} is negative")]
    NegativeWeight { row: usize, col: usize, value: i32 },

    #[error(
        "distance ({row}, {col}) = {value} is neither below {threshold} nor the sentinel"
    )]
    WeightOutOfRange {
        row: usize,
        col: usize,
        value: i32,
        threshold: i32,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T, E = KernelError> = std::result::Result<T, E>;
