//! Semiring tags for the two kernels.
//!
//! | Tag | ⊗ (combine) | ⊕ (reduce) | Zero |
//! |-----|-------------|------------|------|
//! | [`SumProduct`] | wrapping `*` | wrapping `+` | 0 |
//! | [`MinPlus`] | [`saturating_add`] | `min` | [`SENTINEL`] |
//!
//! The tags are zero-sized and fixed per kernel. The scalar tail of every
//! lane loop calls these functions directly, and the portable lane path maps
//! them over each lane, so both paths share one definition of the algebra.

/// "No path" in a distance matrix.
pub const SENTINEL: i32 = i32::MAX;

/// Operands at or above this value are treated as unreachable.
///
/// Two finite operands are each below `SENTINEL / 2`, so their sum never
/// wraps. A sum that reaches the threshold is clamped to [`SENTINEL`], which
/// keeps every stored distance either finite and below the threshold or
/// exactly the sentinel.
pub const THRESHOLD: i32 = SENTINEL / 2;

/// Adds two distances, clamping to [`SENTINEL`] instead of wrapping.
///
/// Bit-identical to the AVX2 lane version for every pair of inputs:
/// both operands are range-checked, the sum wraps, and the wrapped sum is
/// range-checked again.
#[inline(always)]
pub fn saturating_add(x: i32, y: i32) -> i32 {
    if x >= THRESHOLD || y >= THRESHOLD {
        return SENTINEL;
    }
    let z = x.wrapping_add(y);
    if z >= THRESHOLD { SENTINEL } else { z }
}

pub trait Semiring: Copy + Send + Sync + 'static {
    /// Identity of [`Semiring::reduce`].
    const ZERO: i32;

    fn combine(a: i32, b: i32) -> i32;

    fn reduce(acc: i32, x: i32) -> i32;
}

/// (×, +) over wrapping `i32`. Used by matmul.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SumProduct;

impl Semiring for SumProduct {
    const ZERO: i32 = 0;

    #[inline(always)]
    fn combine(a: i32, b: i32) -> i32 {
        a.wrapping_mul(b)
    }

    #[inline(always)]
    fn reduce(acc: i32, x: i32) -> i32 {
        acc.wrapping_add(x)
    }
}

/// (saturating +, min). Used by the shortest-path relaxation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinPlus;

impl Semiring for MinPlus {
    const ZERO: i32 = SENTINEL;

    #[inline(always)]
    fn combine(a: i32, b: i32) -> i32 {
        saturating_add(a, b)
    }

    #[inline(always)]
    fn reduce(acc: i32, x: i32) -> i32 {
        acc.min(x)
    }
}
