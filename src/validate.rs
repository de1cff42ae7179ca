//! Entry checks. Everything a kernel assumes is verified here, once, before
//! any worker starts.

use crate::buffer::{ALIGN, is_aligned};
use crate::error::{KernelError, Result};
use crate::semiring::{SENTINEL, THRESHOLD};

/// `rows * cols`, rejecting zero extents and overflow.
pub fn element_count(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 {
        return Err(KernelError::ZeroDimension { name: "rows" });
    }
    if cols == 0 {
        return Err(KernelError::ZeroDimension { name: "cols" });
    }
    rows.checked_mul(cols)
        .filter(|&len| len <= isize::MAX as usize / size_of::<i32>())
        .ok_or(KernelError::DimensionOverflow { rows, cols })
}

/// Checks that `buf` holds exactly `rows × cols` elements at a 32-byte
/// aligned base address.
pub fn check_buffer(name: &'static str, buf: &[i32], rows: usize, cols: usize) -> Result<()> {
    let expected = element_count(rows, cols)?;
    if buf.len() != expected {
        return Err(KernelError::LengthMismatch {
            name,
            rows,
            cols,
            expected,
            actual: buf.len(),
        });
    }
    if !is_aligned(buf.as_ptr()) {
        return Err(KernelError::Misaligned {
            name,
            addr: buf.as_ptr() as usize,
            align: ALIGN,
        });
    }
    Ok(())
}

/// Checks that every distance is either a non-negative finite weight below
/// [`THRESHOLD`] or exactly [`SENTINEL`].
pub fn check_distances(d: &[i32], n: usize) -> Result<()> {
    for (idx, &value) in d.iter().enumerate() {
        let (row, col) = (idx / n, idx % n);
        if value < 0 {
            return Err(KernelError::NegativeWeight { row, col, value });
        }
        if value >= THRESHOLD && value != SENTINEL {
            return Err(KernelError::WeightOutOfRange {
                row,
                col,
                value,
                threshold: THRESHOLD,
            });
        }
    }
    Ok(())
}

pub fn check_matmul(a: &[i32], b: &[i32], res: &[i32], m: usize, n: usize, k: usize) -> Result<()> {
    check_buffer("A", a, m, n)?;
    check_buffer("B", b, n, k)?;
    check_buffer("Res", res, m, k)
}

pub fn check_apsp(r: &[i32], d: &[i32], n: usize) -> Result<()> {
    check_buffer("R", r, n, n)?;
    check_buffer("D", d, n, n)?;
    check_distances(d, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::AlignedBuffer;

    #[test]
    fn test_zero_dimension() {
        assert!(matches!(
            element_count(0, 4),
            Err(KernelError::ZeroDimension { name: "rows" })
        ));
        assert!(matches!(
            element_count(4, 0),
            Err(KernelError::ZeroDimension { name: "cols" })
        ));
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            element_count(usize::MAX, 2),
            Err(KernelError::DimensionOverflow { .. })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let buf = AlignedBuffer::<i32>::zeroed(6).unwrap();
        let err = check_buffer("A", &buf, 2, 4).unwrap_err();
        assert!(matches!(
            err,
            KernelError::LengthMismatch { expected: 8, actual: 6, .. }
        ));
        assert!(check_buffer("A", &buf, 2, 3).is_ok());
    }

    #[test]
    fn test_misaligned_view_rejected() {
        let buf = AlignedBuffer::<i32>::zeroed(9).unwrap();
        // One element in is 4 bytes past a 32-byte boundary.
        let err = check_buffer("A", &buf[1..], 2, 4).unwrap_err();
        assert!(matches!(err, KernelError::Misaligned { align: 32, .. }));
    }

    #[test]
    fn test_distance_ranges() {
        assert!(check_distances(&[0, 5, SENTINEL, THRESHOLD - 1], 2).is_ok());
        assert!(matches!(
            check_distances(&[0, -1, 1, 0], 2),
            Err(KernelError::NegativeWeight { row: 0, col: 1, value: -1 })
        ));
        assert!(matches!(
            check_distances(&[0, 1, THRESHOLD, 0], 2),
            Err(KernelError::WeightOutOfRange { row: 1, col: 0, .. })
        ));
    }
}
