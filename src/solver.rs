//! Dense linear solvers for the reduced stiffness system.

use log::warn;
use nalgebra::{DMatrix, DVector};

use crate::errors::SolveError;
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Solves `K u = F` for a dense square `K`.
///
/// Implementations must not modify their inputs and must report a singular
/// matrix as [`SolveError::Singular`] rather than returning non-finite values.
pub trait DenseSolver {
    /// Solve `matrix * u = rhs` for `u`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::IllegalArgument`] when `matrix` is not square or
    /// `rhs` has the wrong length, and [`SolveError::Singular`] when no unique
    /// solution exists.
    fn solve(&self, matrix: &Matrix<f64>, rhs: &Vector<f64>) -> Result<Vector<f64>, SolveError>;
}

/// LU decomposition with partial pivoting, backed by `nalgebra`.
///
/// A pivot no larger than a relative tolerance times the largest pivot is
/// treated as zero. By default the tolerance is `n * f64::EPSILON` for an
/// `n x n` system, which only rejects pivots lost to rounding; a coarser
/// tolerance can be chosen with [`LuSolver::with_tolerance`].
///
/// # Examples
/// ```
/// use beamx::{DenseSolver, LuSolver, Matrix, Vector};
///
/// let k = Matrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0]);
/// let f = Vector::from_slice(&[2.0, 2.0]);
/// let u = LuSolver::default().solve(&k, &f).unwrap();
/// assert_eq!(u.as_slice(), &[1.0, 0.5]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LuSolver {
    /// Relative pivot tolerance, or `None` for machine precision.
    tolerance: Option<f64>,
}

impl LuSolver {
    /// Solver with a custom relative pivot tolerance.
    #[must_use]
    pub const fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: Some(tolerance),
        }
    }

    /// Relative pivot tolerance used for a `size x size` system.
    #[must_use]
    pub fn tolerance(&self, size: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let machine = size as f64 * f64::EPSILON;
        self.tolerance.unwrap_or(machine)
    }
}

impl DenseSolver for LuSolver {
    fn solve(&self, matrix: &Matrix<f64>, rhs: &Vector<f64>) -> Result<Vector<f64>, SolveError> {
        let (rows, cols) = matrix.shape();
        if rows != cols || rhs.len() != rows {
            return Err(SolveError::IllegalArgument {
                rows,
                cols,
                rhs: rhs.len(),
            });
        }
        if rows == 0 {
            return Ok(Vector::new(0));
        }

        // Both layouts are column-major.
        let lu = DMatrix::from_column_slice(rows, cols, matrix.as_slice()).lu();
        let pivots = lu.u().diagonal();
        let largest = pivots.amax();
        let threshold = self.tolerance(rows) * largest;
        if !(largest.is_finite() && largest > 0.0)
            || pivots.iter().any(|pivot| pivot.abs() <= threshold)
        {
            warn!(
                "singular {rows}x{cols} system (smallest pivot {:e}, largest {largest:e})",
                pivots.amin()
            );
            return Err(SolveError::Singular);
        }

        let solution = lu
            .solve(&DVector::from_column_slice(rhs.as_slice()))
            .ok_or(SolveError::Singular)?;
        if solution.iter().any(|value| !value.is_finite()) {
            return Err(SolveError::Singular);
        }
        Ok(Vector::from_slice(solution.as_slice()))
    }
}
