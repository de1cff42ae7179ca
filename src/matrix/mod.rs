//! Matrix storage and scalar baselines.
//!
//! The naive implementations here are the correctness references the lane
//! kernels are tested against; `dense` is the owning, aligned matrix type.

pub mod dense;
pub mod naive_ijk;
pub mod transpose;

pub use dense::DenseMatrix;
