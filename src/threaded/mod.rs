//! Multi-threaded drivers for both kernels.
//!
//! These spread rows across a rayon pool sized per call. Thread count adapts
//! to problem size - small problems run on the calling thread.
//!
//! Available implementations:
//! - `matmul_mt`: sum-product matmul, rows fully independent
//! - `apsp_mt`: min-plus shortest paths, rows independent within a pivot,
//!   pivots barriered
//! - `pool`: thread count selection and pool construction

pub mod apsp_mt;
pub mod matmul_mt;
pub mod pool;
