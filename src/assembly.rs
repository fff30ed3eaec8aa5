//! Scatter-add assembly of element contributions into the global system.

use log::trace;

use crate::errors::AssemblyError;
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Global degrees of freedom of an element, in local order.
///
/// Node `n` owns DOFs `dofs_per_node * n + offset` for
/// `offset in 0..dofs_per_node`.
///
/// # Examples
/// ```
/// use beamx::element_dofs;
///
/// assert_eq!(element_dofs(&[1, 2], 3), vec![3, 4, 5, 6, 7, 8]);
/// ```
#[must_use]
pub fn element_dofs(nodes: &[usize], dofs_per_node: usize) -> Vec<usize> {
    nodes
        .iter()
        .flat_map(|&node| (0..dofs_per_node).map(move |offset| dofs_per_node * node + offset))
        .collect()
}

/// The assembled stiffness matrix and force vector of one analysis run.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalSystem {
    /// Degrees of freedom per node.
    dofs_per_node: usize,
    /// `size x size` stiffness.
    stiffness: Matrix<f64>,
    /// `size` force vector.
    force: Vector<f64>,
    /// Whether each element has already been scattered.
    assembled: Vec<bool>,
}

impl GlobalSystem {
    /// Create an empty system for `num_nodes` nodes and `num_elements` elements.
    #[must_use]
    pub fn new(num_nodes: usize, dofs_per_node: usize, num_elements: usize) -> Self {
        let size = num_nodes * dofs_per_node;
        Self {
            dofs_per_node,
            stiffness: Matrix::square(size),
            force: Vector::new(size),
            assembled: vec![false; num_elements],
        }
    }

    /// Number of global degrees of freedom.
    #[must_use]
    pub fn size(&self) -> usize {
        self.force.len()
    }

    /// Degrees of freedom per node.
    #[must_use]
    pub fn dofs_per_node(&self) -> usize {
        self.dofs_per_node
    }

    /// Global stiffness matrix.
    #[must_use]
    pub fn stiffness(&self) -> &Matrix<f64> {
        &self.stiffness
    }

    /// Global force vector.
    #[must_use]
    pub fn force(&self) -> &Vector<f64> {
        &self.force
    }

    /// Split the system into its stiffness matrix and force vector.
    #[must_use]
    pub fn into_parts(self) -> (Matrix<f64>, Vector<f64>) {
        (self.stiffness, self.force)
    }

    /// Mutable access used by the boundary-condition step.
    pub(crate) fn parts_mut(&mut self) -> (&mut Matrix<f64>, &mut Vector<f64>) {
        (&mut self.stiffness, &mut self.force)
    }

    /// Scatter-add element `element`'s stiffness and optional force into the system.
    ///
    /// `nodes` are the element's global node indices in local slot order. Each
    /// element may be assembled only once.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::DuplicateElement`] on a second call for the same
    /// element, [`AssemblyError::SizeMismatch`] when the contributions do not
    /// match the element's DOF count and [`AssemblyError::DofOutOfRange`] when a
    /// node lies outside the system. Nothing is modified on error.
    pub fn scatter(
        &mut self,
        element: usize,
        nodes: &[usize],
        stiffness: &Matrix<f64>,
        force: Option<&Vector<f64>>,
    ) -> Result<(), AssemblyError> {
        let size = self.size();
        let dofs = element_dofs(nodes, self.dofs_per_node);

        match self.assembled.get(element) {
            Some(true) => return Err(AssemblyError::DuplicateElement(element)),
            Some(false) => (),
            None => {
                return Err(AssemblyError::UnknownElement {
                    element,
                    count: self.assembled.len(),
                })
            }
        }
        if stiffness.shape() != (dofs.len(), dofs.len()) {
            return Err(AssemblyError::SizeMismatch {
                element,
                expected: dofs.len(),
                found: stiffness.rows(),
            });
        }
        if let Some(force) = force {
            if force.len() != dofs.len() {
                return Err(AssemblyError::SizeMismatch {
                    element,
                    expected: dofs.len(),
                    found: force.len(),
                });
            }
        }
        if let Some(&dof) = dofs.iter().find(|&&dof| dof >= size) {
            return Err(AssemblyError::DofOutOfRange { dof, size });
        }

        for (j, &row) in dofs.iter().enumerate() {
            if let Some(force) = force {
                self.force[row] += force[j];
            }
            for (k, &col) in dofs.iter().enumerate() {
                self.stiffness[(row, col)] += stiffness[(j, k)];
            }
        }
        self.assembled[element] = true;
        trace!("assembled element {element} into DOFs {dofs:?}");
        Ok(())
    }

    /// Add a load block to the contiguous DOFs of `node`.
    ///
    /// # Errors
    ///
    /// Returns a container error when the block runs past the end of the system.
    pub fn add_nodal_load(&mut self, node: usize, load: &Vector<f64>) -> Result<(), AssemblyError> {
        self.force.add_at(load, node * self.dofs_per_node)?;
        Ok(())
    }

    /// Whether every element has been scattered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.assembled.iter().all(|&done| done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ContainerError;

    fn spring(k: f64) -> Matrix<f64> {
        Matrix::from_row_slice(2, 2, &[k, -k, -k, k])
    }

    #[test]
    fn shared_nodes_accumulate() {
        let mut system = GlobalSystem::new(3, 1, 2);
        system
            .scatter(0, &[0, 1], &spring(2.0), Some(&Vector::from_slice(&[1.0, 1.0])))
            .expect("first element");
        system
            .scatter(1, &[1, 2], &spring(3.0), Some(&Vector::from_slice(&[1.0, 1.0])))
            .expect("second element");

        let expected = Matrix::from_row_slice(
            3,
            3,
            &[2.0, -2.0, 0.0, -2.0, 5.0, -3.0, 0.0, -3.0, 3.0],
        );
        assert_eq!(system.stiffness(), &expected);
        assert_eq!(system.force().as_slice(), &[1.0, 2.0, 1.0]);
        assert!(system.is_complete());
        assert!(system.stiffness().is_symmetric(0.0));
    }

    #[test]
    fn assembly_order_does_not_matter() {
        let mut forward = GlobalSystem::new(3, 1, 2);
        forward.scatter(0, &[0, 1], &spring(2.0), None).expect("ok");
        forward.scatter(1, &[1, 2], &spring(3.0), None).expect("ok");

        let mut backward = GlobalSystem::new(3, 1, 2);
        backward.scatter(1, &[1, 2], &spring(3.0), None).expect("ok");
        backward.scatter(0, &[0, 1], &spring(2.0), None).expect("ok");

        assert_eq!(forward, backward);
    }

    #[test]
    fn elements_are_assembled_once() {
        let mut system = GlobalSystem::new(2, 1, 1);
        system.scatter(0, &[0, 1], &spring(1.0), None).expect("ok");
        let before = system.clone();
        assert_eq!(
            system.scatter(0, &[0, 1], &spring(1.0), None),
            Err(AssemblyError::DuplicateElement(0))
        );
        assert_eq!(system, before);
    }

    #[test]
    fn malformed_contributions_are_rejected() {
        let mut system = GlobalSystem::new(2, 1, 1);
        assert_eq!(
            system.scatter(0, &[0, 2], &spring(1.0), None),
            Err(AssemblyError::DofOutOfRange { dof: 2, size: 2 })
        );
        assert_eq!(
            system.scatter(0, &[0, 1], &Matrix::square(3), None),
            Err(AssemblyError::SizeMismatch {
                element: 0,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            system.scatter(1, &[0, 1], &spring(1.0), None),
            Err(AssemblyError::UnknownElement {
                element: 1,
                count: 1
            })
        );
        assert!(!system.is_complete());
    }

    #[test]
    fn frame_dofs_are_interleaved_per_node() {
        let mut system = GlobalSystem::new(2, 3, 1);
        let identity = Matrix::identity(6);
        system.scatter(0, &[1, 0], &identity, None).expect("ok");
        assert_eq!(system.stiffness(), &Matrix::identity(6));

        system
            .add_nodal_load(1, &Vector::from_slice(&[0.0, -1.0, 0.5]))
            .expect("fits");
        assert_eq!(system.force().as_slice(), &[0.0, 0.0, 0.0, 0.0, -1.0, 0.5]);
        assert_eq!(
            system.add_nodal_load(2, &Vector::from_slice(&[1.0, 0.0, 0.0])),
            Err(AssemblyError::Container(ContainerError::RangeOutOfBounds {
                offset: 6,
                end: 9,
                len: 6
            }))
        );
    }
}
