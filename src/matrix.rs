//! Dense two-dimensional matrices stored in a single flat buffer.
//!
//! Storage is column-major: entry `(row, col)` lives at offset
//! `col * rows + row`. Every operation in this module uses that mapping, so a
//! column is always a contiguous slice.

use std::ops::{AddAssign, Index, IndexMut};

use num::{Num, One, Zero};

use crate::array::{compensated_indices, DynamicArray};
use crate::errors::ContainerError;
use crate::vector::Vector;

/// A dense `rows x cols` matrix.
///
/// The default value is a `0x0` matrix, useful only as an assignment target.
///
/// # Examples
/// ```
/// use beamx::Matrix;
///
/// let a = Matrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// let b = Matrix::from_row_slice(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
/// let mut c = Matrix::default();
/// c.mult_ab(&a, &b).unwrap();
/// assert_eq!(c.shape(), (2, 2));
/// assert_eq!(c[(0, 0)], 58.0);
/// assert_eq!(c[(0, 1)], 64.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matrix<T> {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Column-major backing buffer of length `rows * cols`.
    array: DynamicArray<T>,
}

impl<T: Copy + Zero> Matrix<T> {
    /// Allocate a zeroed `rows x cols` matrix.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            array: DynamicArray::new(rows * cols),
        }
    }

    /// Allocate a zeroed square matrix.
    #[must_use]
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Build a matrix from values listed row by row.
    ///
    /// # Panics
    ///
    /// Panics when `values.len() != rows * cols`.
    #[must_use]
    pub fn from_row_slice(rows: usize, cols: usize, values: &[T]) -> Self {
        assert_eq!(values.len(), rows * cols, "row slice does not match shape");
        let mut matrix = Self::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                matrix.array[col * rows + row] = values[row * cols + col];
            }
        }
        matrix
    }

    /// Build a matrix from values listed column by column.
    ///
    /// # Panics
    ///
    /// Panics when `values.len() != rows * cols`.
    #[must_use]
    pub fn from_column_slice(rows: usize, cols: usize, values: &[T]) -> Self {
        assert_eq!(values.len(), rows * cols, "column slice does not match shape");
        Self {
            rows,
            cols,
            array: DynamicArray::from_slice(values),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Size of the backing buffer, always `rows * cols`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Whether the matrix holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Resize to `rows x cols`, discarding the previous contents.
    pub fn dimension(&mut self, rows: usize, cols: usize) {
        self.array.dimension(rows * cols);
        self.rows = rows;
        self.cols = cols;
    }

    /// Resize to a square `size x size` matrix, discarding the previous contents.
    pub fn dimension_square(&mut self, size: usize) {
        self.dimension(size, size);
    }

    /// Broadcast `value` to every entry.
    pub fn fill(&mut self, value: T) {
        self.array.fill(value);
    }

    /// Deep-copy `other` into this matrix, adopting its shape.
    pub fn assign(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// Column-major backing buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.array.as_slice()
    }

    /// Linear offset of `(row, col)` after a bounds check.
    fn offset(&self, row: usize, col: usize) -> Result<usize, ContainerError> {
        if row < self.rows && col < self.cols {
            Ok(col * self.rows + row)
        } else {
            Err(ContainerError::PositionOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Bounds-checked read of `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::PositionOutOfRange`] outside the matrix.
    pub fn at(&self, row: usize, col: usize) -> Result<T, ContainerError> {
        let offset = self.offset(row, col)?;
        Ok(self.array[offset])
    }

    /// Bounds-checked write of `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::PositionOutOfRange`] outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), ContainerError> {
        let offset = self.offset(row, col)?;
        self.array[offset] = value;
        Ok(())
    }

    /// Borrow a whole column as a contiguous slice.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `col >= cols`.
    pub fn column(&self, col: usize) -> Result<&[T], ContainerError> {
        if col >= self.cols {
            return Err(ContainerError::IndexOutOfRange {
                index: col,
                len: self.cols,
            });
        }
        let start = col * self.rows;
        Ok(&self.array.as_slice()[start..start + self.rows])
    }

    /// Mutably borrow a whole column as a contiguous slice.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `col >= cols`.
    pub fn column_mut(&mut self, col: usize) -> Result<&mut [T], ContainerError> {
        if col >= self.cols {
            return Err(ContainerError::IndexOutOfRange {
                index: col,
                len: self.cols,
            });
        }
        let start = col * self.rows;
        let rows = self.rows;
        Ok(&mut self.array.as_mut_slice()[start..start + rows])
    }

    /// Copy out a row.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `row >= rows`.
    pub fn row(&self, row: usize) -> Result<Vec<T>, ContainerError> {
        if row >= self.rows {
            return Err(ContainerError::IndexOutOfRange {
                index: row,
                len: self.rows,
            });
        }
        Ok((0..self.cols)
            .map(|col| self.array[col * self.rows + row])
            .collect())
    }

    /// Transpose in place, physically relocating every entry.
    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    /// Return the transpose as a new matrix.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut result = Self::new(self.cols, self.rows);
        for col in 0..self.cols {
            for row in 0..self.rows {
                result.array[row * self.cols + col] = self.array[col * self.rows + row];
            }
        }
        result
    }

    /// Delete a row, compacting the storage.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `row >= rows`.
    pub fn remove_row(&mut self, row: usize) -> Result<(), ContainerError> {
        if row >= self.rows {
            return Err(ContainerError::IndexOutOfRange {
                index: row,
                len: self.rows,
            });
        }
        let rows = self.rows;
        let data = self
            .array
            .iter()
            .enumerate()
            .filter(|(offset, _)| offset % rows != row)
            .map(|(_, &value)| value)
            .collect();
        self.array = DynamicArray::from_vec(data);
        self.rows -= 1;
        Ok(())
    }

    /// Delete a column, compacting the storage.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] when `col >= cols`.
    pub fn remove_col(&mut self, col: usize) -> Result<(), ContainerError> {
        if col >= self.cols {
            return Err(ContainerError::IndexOutOfRange {
                index: col,
                len: self.cols,
            });
        }
        let start = col * self.rows;
        let mut data = self.array.as_slice().to_vec();
        data.drain(start..start + self.rows);
        self.array = DynamicArray::from_vec(data);
        self.cols -= 1;
        Ok(())
    }

    /// Delete several rows identified by their original indices.
    ///
    /// All indices are validated first; on error the matrix is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] or
    /// [`ContainerError::DuplicateIndex`].
    pub fn remove_rows(&mut self, rows: &[usize]) -> Result<(), ContainerError> {
        let len = self.rows;
        let positions = compensated_indices(rows, len, |index| {
            ContainerError::IndexOutOfRange { index, len }
        })?;
        for position in positions {
            self.remove_row(position)?;
        }
        Ok(())
    }

    /// Delete several columns identified by their original indices.
    ///
    /// All indices are validated first; on error the matrix is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] or
    /// [`ContainerError::DuplicateIndex`].
    pub fn remove_cols(&mut self, cols: &[usize]) -> Result<(), ContainerError> {
        let len = self.cols;
        let positions = compensated_indices(cols, len, |index| {
            ContainerError::IndexOutOfRange { index, len }
        })?;
        for position in positions {
            self.remove_col(position)?;
        }
        Ok(())
    }
}

impl<T: Copy + Zero + One> Matrix<T> {
    /// Square identity matrix.
    #[must_use]
    pub fn identity(size: usize) -> Self {
        let mut matrix = Self::square(size);
        for i in 0..size {
            matrix.array[i * size + i] = T::one();
        }
        matrix
    }
}

impl<T: Copy + Num + AddAssign> Matrix<T> {
    /// Dense product `self * other` as a new matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::DimensionMismatch`] unless `self.cols == other.rows`.
    pub fn mul(&self, other: &Self) -> Result<Self, ContainerError> {
        if self.cols != other.rows {
            return Err(ContainerError::DimensionMismatch {
                operation: "matrix product",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut product = Self::new(self.rows, other.cols);
        for j in 0..other.cols {
            for k in 0..self.cols {
                let factor = other.array[j * other.rows + k];
                if factor.is_zero() {
                    continue;
                }
                for i in 0..self.rows {
                    product.array[j * self.rows + i] += self.array[k * self.rows + i] * factor;
                }
            }
        }
        Ok(product)
    }

    /// Replace this matrix with the product `a * b`.
    ///
    /// The receiver cannot alias `a` or `b`; the borrow rules reject such a call.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::DimensionMismatch`] unless `a.cols == b.rows`;
    /// the receiver is unchanged on error.
    pub fn mult_ab(&mut self, a: &Self, b: &Self) -> Result<(), ContainerError> {
        *self = a.mul(b)?;
        Ok(())
    }

    /// Matrix-vector product `self * vector`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::DimensionMismatch`] unless `vector.len() == cols`.
    pub fn mul_vector(&self, vector: &Vector<T>) -> Result<Vector<T>, ContainerError> {
        if vector.len() != self.cols {
            return Err(ContainerError::DimensionMismatch {
                operation: "matrix-vector product",
                left: self.shape(),
                right: (vector.len(), 1),
            });
        }
        let mut product = Vector::new(self.rows);
        for col in 0..self.cols {
            let factor = vector[col];
            for row in 0..self.rows {
                product[row] += self.array[col * self.rows + row] * factor;
            }
        }
        Ok(product)
    }
}

impl Matrix<f64> {
    /// Whether the matrix is square and symmetric within `tolerance`,
    /// measured relative to the largest absolute entry.
    #[must_use]
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        if self.rows != self.cols {
            return false;
        }
        let scale = self
            .array
            .iter()
            .fold(0.0_f64, |max, value| max.max(value.abs()))
            .max(f64::MIN_POSITIVE);
        for col in 0..self.cols {
            for row in (col + 1)..self.rows {
                let upper = self.array[col * self.rows + row];
                let lower = self.array[row * self.rows + col];
                if (upper - lower).abs() > tolerance * scale {
                    return false;
                }
            }
        }
        true
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "position ({row}, {col}) out of range for a {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.array[col * self.rows + row]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.rows && col < self.cols,
            "position ({row}, {col}) out of range for a {}x{} matrix",
            self.rows,
            self.cols
        );
        &mut self.array[col * self.rows + row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix<f64> {
        Matrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
    }

    #[test]
    fn constructor_sets_shape_and_storage() {
        for (rows, cols) in [(0, 0), (1, 4), (2, 3), (5, 5)] {
            let matrix = Matrix::<f64>::new(rows, cols);
            assert_eq!(matrix.rows(), rows);
            assert_eq!(matrix.cols(), cols);
            assert_eq!(matrix.len(), rows * cols);
        }
        assert_eq!(Matrix::<f64>::default().shape(), (0, 0));
    }

    #[test]
    fn storage_is_column_major() {
        let matrix = sample();
        assert_eq!(matrix.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(matrix.column(1), Ok(&[2.0, 5.0][..]));
        assert_eq!(matrix.row(1), Ok(vec![4.0, 5.0, 6.0]));
    }

    #[test]
    fn access_outside_the_matrix_is_rejected() {
        let mut matrix = sample();
        assert_eq!(
            matrix.at(2, 0),
            Err(ContainerError::PositionOutOfRange {
                row: 2,
                col: 0,
                rows: 2,
                cols: 3
            })
        );
        assert!(matrix.set(0, 3, 1.0).is_err());
        assert!(matrix.column(3).is_err());
        matrix.set(1, 2, 9.0).expect("in range");
        assert_eq!(matrix[(1, 2)], 9.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn indexing_past_a_row_panics_even_if_offset_fits() {
        let matrix = sample();
        let _value = matrix[(2, 0)];
    }

    #[test]
    fn column_view_writes_through() {
        let mut matrix = sample();
        matrix
            .column_mut(2)
            .expect("column exists")
            .copy_from_slice(&[0.0, -1.0]);
        assert_eq!(matrix[(0, 2)], 0.0);
        assert_eq!(matrix[(1, 2)], -1.0);
    }

    #[test]
    fn fill_assign_and_dimension() {
        let mut matrix = sample();
        matrix.fill(3.0);
        assert!(matrix.as_slice().iter().all(|&value| value == 3.0));

        let mut target = Matrix::default();
        target.assign(&sample());
        assert_eq!(target, sample());

        target.dimension_square(4);
        assert_eq!(target.shape(), (4, 4));
        assert!(target.as_slice().iter().all(|&value| value == 0.0));
    }

    #[test]
    fn transpose_relocates_entries() {
        let mut matrix = sample();
        matrix.transpose();
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix[(2, 1)], 6.0);
        assert_eq!(matrix[(0, 1)], 4.0);
    }

    #[test]
    fn transpose_is_involutive() {
        let original = Matrix::from_row_slice(3, 4, &(0..12).map(f64::from).collect::<Vec<_>>());
        let mut matrix = original.clone();
        matrix.transpose();
        matrix.transpose();
        assert_eq!(matrix, original);
    }

    #[test]
    fn remove_single_row_and_column() {
        let mut matrix = Matrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        matrix.remove_row(1).expect("row exists");
        assert_eq!(matrix, Matrix::from_row_slice(2, 2, &[1.0, 2.0, 5.0, 6.0]));

        let mut matrix = sample();
        matrix.remove_col(1).expect("column exists");
        assert_eq!(matrix.cols(), 2);
        assert_eq!(matrix[(0, 1)], 3.0);
        assert_eq!(matrix[(1, 1)], 6.0);
    }

    #[test]
    fn remove_multiple_rows_and_columns() {
        let mut matrix =
            Matrix::from_row_slice(4, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        matrix.remove_rows(&[2, 0]).expect("rows exist");
        assert_eq!(matrix, Matrix::from_row_slice(2, 2, &[3.0, 4.0, 7.0, 8.0]));

        let mut matrix =
            Matrix::from_row_slice(2, 4, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        matrix.remove_cols(&[0, 2]).expect("columns exist");
        assert_eq!(matrix, Matrix::from_row_slice(2, 2, &[2.0, 4.0, 6.0, 8.0]));
    }

    #[test]
    fn invalid_batch_removal_is_all_or_nothing() {
        let mut matrix = sample();
        assert_eq!(
            matrix.remove_cols(&[0, 3]),
            Err(ContainerError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            matrix.remove_rows(&[1, 1]),
            Err(ContainerError::DuplicateIndex(1))
        );
        assert_eq!(matrix, sample());
    }

    #[test]
    fn product_follows_dimension_law() {
        let a = sample();
        let b = Matrix::from_row_slice(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let mut c = Matrix::default();
        c.mult_ab(&a, &b).expect("compatible shapes");
        assert_eq!(c, Matrix::from_row_slice(2, 2, &[58.0, 64.0, 139.0, 154.0]));

        let error = c.mult_ab(&a, &a).expect_err("incompatible shapes");
        assert_eq!(
            error,
            ContainerError::DimensionMismatch {
                operation: "matrix product",
                left: (2, 3),
                right: (2, 3)
            }
        );
        assert_eq!(c.shape(), (2, 2));
    }

    #[test]
    fn identity_is_neutral() {
        let a = sample();
        assert_eq!(a.mul(&Matrix::identity(3)), Ok(a.clone()));
        assert_eq!(Matrix::identity(2).mul(&a), Ok(a));
    }

    #[test]
    fn matrix_vector_product() {
        let product = sample()
            .mul_vector(&Vector::from_slice(&[1.0, 0.0, -1.0]))
            .expect("compatible");
        assert_eq!(product.as_slice(), &[-2.0, -2.0]);
        assert!(sample().mul_vector(&Vector::new(2)).is_err());
    }

    #[test]
    fn symmetry_check() {
        let symmetric = Matrix::from_row_slice(2, 2, &[2.0, -1.0, -1.0, 2.0]);
        assert!(symmetric.is_symmetric(1.0e-12));
        assert!(!sample().is_symmetric(1.0e-12));
        assert!(!Matrix::from_row_slice(2, 2, &[2.0, -1.0, 1.0, 2.0]).is_symmetric(1.0e-12));
    }

    #[test]
    fn integer_matrices_are_supported() {
        let mut connectivity = Matrix::<usize>::new(2, 3);
        connectivity[(1, 2)] = 3;
        assert_eq!(connectivity.column(2), Ok(&[0, 3][..]));
    }
}
