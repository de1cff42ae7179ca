//! Owning row-major `i32` matrix on aligned storage.

use crate::buffer::AlignedBuffer;
use crate::config::KernelConfig;
use crate::error::{KernelError, Result};
use crate::validate::element_count;

/// A dense `rows × cols` matrix whose data always starts on a 32-byte
/// boundary, so it can be handed to either kernel directly.
///
/// ```
/// use semiring_kernels::{DenseMatrix, KernelConfig};
///
/// let a = DenseMatrix::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
/// let b = DenseMatrix::from_rows(&[vec![5, 6], vec![7, 8]]).unwrap();
///
/// let c = a.matmul(&b, &KernelConfig::default()).unwrap();
/// assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: AlignedBuffer<i32>,
}

impl DenseMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        let len = element_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: AlignedBuffer::zeroed(len)?,
        })
    }

    pub fn filled(rows: usize, cols: usize, value: i32) -> Result<Self> {
        let len = element_count(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: AlignedBuffer::filled(len, value)?,
        })
    }

    /// Copies row-major `data` into aligned storage.
    pub fn from_slice(rows: usize, cols: usize, data: &[i32]) -> Result<Self> {
        let expected = element_count(rows, cols)?;
        if data.len() != expected {
            return Err(KernelError::LengthMismatch {
                name: "matrix",
                rows,
                cols,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            data: AlignedBuffer::from_slice(data)?,
        })
    }

    /// Builds a matrix from equal-length rows.
    pub fn from_rows(rows: &[Vec<i32>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut m = Self::zeros(rows.len(), cols)?;
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(KernelError::LengthMismatch {
                    name: "row",
                    rows: 1,
                    cols,
                    expected: cols,
                    actual: row.len(),
                });
            }
            m.row_mut(i).copy_from_slice(row);
        }
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        self.data[i * self.cols + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: i32) {
        self.data[i * self.cols + j] = value;
    }

    pub fn row(&self, i: usize) -> &[i32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [i32] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.data
    }

    /// `self × rhs` over wrapping `i32`.
    pub fn matmul(&self, rhs: &DenseMatrix, config: &KernelConfig) -> Result<DenseMatrix> {
        if self.cols != rhs.rows {
            return Err(KernelError::ShapeMismatch {
                op: "matmul",
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: rhs.rows,
                right_cols: rhs.cols,
            });
        }
        let mut out = DenseMatrix::zeros(self.rows, rhs.cols)?;
        crate::matmul_with(
            self.as_slice(),
            rhs.as_slice(),
            out.as_mut_slice(),
            self.rows,
            self.cols,
            rhs.cols,
            config,
        )?;
        Ok(out)
    }

    /// All-pairs shortest distances, treating `self` as an adjacency matrix
    /// with [`crate::SENTINEL`] for missing edges.
    pub fn shortest_paths(&self, config: &KernelConfig) -> Result<DenseMatrix> {
        if !self.is_square() {
            return Err(KernelError::ShapeMismatch {
                op: "shortest_paths",
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: self.cols,
                right_cols: self.rows,
            });
        }
        let mut out = DenseMatrix::zeros(self.rows, self.cols)?;
        crate::apsp_with(out.as_mut_slice(), self.as_slice(), self.rows, config)?;
        Ok(out)
    }
}
