//! Lane-level inner loops for both kernels.
//!
//! Each inner loop comes in three versions:
//! - `*_avx2`: 256-bit intrinsics, 8 `i32` per instruction
//! - `*_lanes`: the same lane/tail shape over `[i32; 8]` arrays, for CPUs
//!   without AVX2
//! - `*_scalar`: one element at a time, the correctness baseline
//!
//! Available modules:
//! - `lanes`: lane/tail splitting shared by everything below
//! - `dot`: sum-product dot product (matmul)
//! - `relax`: min-plus row relaxation (shortest paths)

pub mod dot;
pub mod lanes;
pub mod relax;

use std::fmt;

/// Which inner-loop implementation to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimdLevel {
    Scalar,
    Lanes,
    Avx2,
}

impl SimdLevel {
    /// Best level this CPU supports.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx2") {
                return SimdLevel::Avx2;
            }
        }
        SimdLevel::Lanes
    }

    /// Downgrades `self` to something the CPU can actually run.
    pub fn supported(self) -> Self {
        match self {
            SimdLevel::Avx2 if Self::detect() != SimdLevel::Avx2 => SimdLevel::Lanes,
            level => level,
        }
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimdLevel::Scalar => "scalar",
            SimdLevel::Lanes => "portable lanes",
            SimdLevel::Avx2 => "AVX2",
        };
        f.write_str(name)
    }
}

/// Dot product of two equal-length rows at the requested level.
///
/// A level the CPU can't run is downgraded first.
///
/// # Panics
///
/// Panics if `a` and `b` differ in length.
#[inline]
pub fn dot(level: SimdLevel, a: &[i32], b: &[i32]) -> i32 {
    assert_eq!(a.len(), b.len(), "dot operands differ in length");
    match level.supported() {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 => unsafe { dot::dot_avx2(a, b) },
        SimdLevel::Scalar => dot::dot_scalar(a, b),
        _ => dot::dot_lanes(a, b),
    }
}

/// Relaxes `row` through a pivot whose row is `pivot_row`, with
/// `via = row[k]` captured by the caller.
///
/// # Panics
///
/// Panics if `row` and `pivot_row` differ in length.
#[inline]
pub fn relax_row(level: SimdLevel, row: &mut [i32], pivot_row: &[i32], via: i32) {
    assert_eq!(row.len(), pivot_row.len(), "row and pivot row differ in length");
    match level.supported() {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 => unsafe { relax::relax_row_avx2(row, pivot_row, via) },
        SimdLevel::Scalar => relax::relax_row_scalar(row, pivot_row, via),
        _ => relax::relax_row_lanes(row, pivot_row, via),
    }
}
