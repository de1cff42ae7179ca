/// Transpose a matrix: dst = src^T
///
/// Converts from row-major (rows × cols) to row-major (cols × rows).
/// After transpose, what was column j of src becomes row j of dst. Matmul
/// uses this so a column of B becomes one contiguous lane-loadable row.
///
/// # Arguments
///
/// * `src` - Source matrix (rows × cols), row-major
/// * `dst` - Destination matrix (cols × rows), row-major
/// * `rows` - Number of rows in src
/// * `cols` - Number of columns in src
///
/// # Example
///
/// ```
/// use semiring_kernels::matrix::transpose::transpose;
///
/// let src = vec![1, 2, 3,   // 2×3 matrix
///                4, 5, 6];
/// let mut dst = vec![0; 6]; // will be 3×2
///
/// transpose(&src, &mut dst, 2, 3);
///
/// assert_eq!(dst, vec![1, 4,   // 3×2 matrix
///                      2, 5,
///                      3, 6]);
/// ```
pub fn transpose<T: Copy>(src: &[T], dst: &mut [T], rows: usize, cols: usize) {
    // Walk src in 8×8 tiles so neither side strides across the whole matrix.
    const TILE: usize = 8;
    for ii in (0..rows).step_by(TILE) {
        for jj in (0..cols).step_by(TILE) {
            for i in ii..(ii + TILE).min(rows) {
                for j in jj..(jj + TILE).min(cols) {
                    dst[j * rows + i] = src[i * cols + j];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_odd_shape() {
        let (rows, cols) = (11, 19);
        let src: Vec<i32> = (0..(rows * cols) as i32).collect();
        let mut dst = vec![0; rows * cols];
        transpose(&src, &mut dst, rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                assert_eq!(dst[j * rows + i], src[i * cols + j]);
            }
        }
    }
}
