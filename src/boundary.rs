//! Displacement boundary conditions: pinning rows in place or eliminating them.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::assembly::GlobalSystem;
use crate::errors::BoundaryError;
use crate::matrix::Matrix;
use crate::vector::Vector;

/// A prescribed value for one global degree of freedom.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Global degree of freedom.
    pub dof: usize,
    /// Prescribed displacement or rotation.
    #[serde(default)]
    pub value: f64,
}

impl Constraint {
    /// Fix `dof` at zero.
    #[must_use]
    pub const fn fixed(dof: usize) -> Self {
        Self { dof, value: 0.0 }
    }

    /// Prescribe `value` at `dof`.
    #[must_use]
    pub const fn prescribed(dof: usize, value: f64) -> Self {
        Self { dof, value }
    }
}

/// Fix every degree of freedom of `node` at zero.
///
/// # Examples
/// ```
/// use beamx::{clamp_node, Constraint};
///
/// assert_eq!(
///     clamp_node(1, 3),
///     vec![Constraint::fixed(3), Constraint::fixed(4), Constraint::fixed(5)]
/// );
/// ```
#[must_use]
pub fn clamp_node(node: usize, dofs_per_node: usize) -> Vec<Constraint> {
    (0..dofs_per_node)
        .map(|offset| Constraint::fixed(node * dofs_per_node + offset))
        .collect()
}

/// How constraints are imposed on the assembled system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryStrategy {
    /// Remove constrained rows and columns, solving a smaller system.
    #[default]
    Elimination,
    /// Replace each constrained equation with `u = value`, keeping the size.
    Pinning,
}

/// Check that every constraint is in range and targets a distinct DOF.
pub(crate) fn validate(constraints: &[Constraint], size: usize) -> Result<(), BoundaryError> {
    let mut seen = vec![false; size];
    for constraint in constraints {
        let slot = seen
            .get_mut(constraint.dof)
            .ok_or(BoundaryError::DofOutOfRange {
                dof: constraint.dof,
                size,
            })?;
        if *slot {
            return Err(BoundaryError::DuplicateConstraint(constraint.dof));
        }
        *slot = true;
    }
    Ok(())
}

/// Pin constrained DOFs in place.
///
/// Each constrained row of the stiffness matrix is zeroed and its equation
/// replaced by `d * u = d * value`, where `d` is the largest diagonal magnitude
/// of the assembled matrix (one if there is none). The system keeps its size.
///
/// # Errors
///
/// Returns [`BoundaryError`] for out-of-range or repeated DOFs; nothing is
/// modified in that case.
pub fn pin(system: &mut GlobalSystem, constraints: &[Constraint]) -> Result<(), BoundaryError> {
    let size = system.size();
    validate(constraints, size)?;
    let (stiffness, force) = system.parts_mut();
    let scale = pinning_scale(stiffness);
    for constraint in constraints {
        for col in 0..size {
            stiffness[(constraint.dof, col)] = 0.0;
        }
        stiffness[(constraint.dof, constraint.dof)] = scale;
        force[constraint.dof] = scale * constraint.value;
    }
    debug!(
        "pinned {} DOFs of a {size}-DOF system with diagonal {scale:e}",
        constraints.len()
    );
    Ok(())
}

/// Largest finite diagonal magnitude of `stiffness`, or one when none is positive.
fn pinning_scale(stiffness: &Matrix<f64>) -> f64 {
    let (rows, cols) = stiffness.shape();
    let largest = (0..rows.min(cols))
        .map(|i| stiffness[(i, i)].abs())
        .filter(|value| value.is_finite())
        .fold(0.0, f64::max);
    if largest > 0.0 {
        largest
    } else {
        1.0
    }
}

/// Eliminate constrained DOFs, producing a strictly smaller system.
///
/// Non-zero prescribed values are moved to the right-hand side before the
/// rows and columns are removed.
///
/// # Errors
///
/// Returns [`BoundaryError`] for out-of-range or repeated DOFs.
pub fn eliminate(
    system: GlobalSystem,
    constraints: &[Constraint],
) -> Result<ReducedSystem, BoundaryError> {
    let size = system.size();
    validate(constraints, size)?;
    let (mut stiffness, mut force) = system.into_parts();

    for constraint in constraints.iter().filter(|c| c.value != 0.0) {
        for row in 0..size {
            force[row] -= stiffness[(row, constraint.dof)] * constraint.value;
        }
    }

    let dofs: Vec<usize> = constraints.iter().map(|c| c.dof).collect();
    stiffness.remove_rows(&dofs)?;
    stiffness.remove_cols(&dofs)?;
    force.remove_many(&dofs)?;

    let free_dofs: Vec<usize> = (0..size).filter(|dof| !dofs.contains(dof)).collect();
    debug!(
        "eliminated {} DOFs, reduced system has {} unknowns",
        dofs.len(),
        free_dofs.len()
    );
    Ok(ReducedSystem {
        size,
        stiffness,
        force,
        free_dofs,
        constraints: constraints.to_vec(),
    })
}

/// The system left after eliminating constrained DOFs.
#[derive(Clone, Debug, PartialEq)]
pub struct ReducedSystem {
    /// Size of the original system.
    size: usize,
    /// Reduced stiffness.
    stiffness: Matrix<f64>,
    /// Reduced right-hand side.
    force: Vector<f64>,
    /// Original index of each remaining unknown, ascending.
    free_dofs: Vec<usize>,
    /// Eliminated constraints.
    constraints: Vec<Constraint>,
}

impl ReducedSystem {
    /// Reduced stiffness matrix.
    #[must_use]
    pub fn stiffness(&self) -> &Matrix<f64> {
        &self.stiffness
    }

    /// Reduced right-hand side.
    #[must_use]
    pub fn force(&self) -> &Vector<f64> {
        &self.force
    }

    /// Original DOF index of each reduced unknown.
    #[must_use]
    pub fn free_dofs(&self) -> &[usize] {
        &self.free_dofs
    }

    /// Size of the system before elimination.
    #[must_use]
    pub fn full_size(&self) -> usize {
        self.size
    }

    /// Scatter a reduced solution back to full length, placing each value at
    /// its original DOF and every constrained DOF at its prescribed value.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::SolutionSize`] when `solution` does not match the
    /// reduced system.
    pub fn expand(&self, solution: &Vector<f64>) -> Result<Vector<f64>, BoundaryError> {
        if solution.len() != self.free_dofs.len() {
            return Err(BoundaryError::SolutionSize {
                expected: self.free_dofs.len(),
                found: solution.len(),
            });
        }
        let mut full = Vector::new(self.size);
        for (&dof, &value) in self.free_dofs.iter().zip(solution.iter()) {
            full[dof] = value;
        }
        for constraint in &self.constraints {
            full[constraint.dof] = constraint.value;
        }
        Ok(full)
    }
}
