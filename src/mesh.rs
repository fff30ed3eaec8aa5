//! Uniform 1D meshes of linear or quadratic line elements.

use serde::{Deserialize, Serialize};

use crate::errors::{ContainerError, MeshError};
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Interpolation order of a line element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementOrder {
    /// Two nodes per element: `O-----O`.
    Linear,
    /// Three nodes per element: `O--O--O`.
    Quadratic,
}

impl ElementOrder {
    /// Map a node count onto an element order.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::UnsupportedNodesPerElement`] for counts other than 2 or 3.
    pub fn from_nodes_per_element(nodes: usize) -> Result<Self, MeshError> {
        match nodes {
            2 => Ok(Self::Linear),
            3 => Ok(Self::Quadratic),
            other => Err(MeshError::UnsupportedNodesPerElement(other)),
        }
    }

    /// Number of nodes per element.
    #[must_use]
    pub fn nodes_per_element(self) -> usize {
        match self {
            Self::Linear => 2,
            Self::Quadratic => 3,
        }
    }
}

/// Evenly spaced nodal coordinates and element connectivity along a beam.
///
/// Connectivity is a `nodes_per_element x num_elements` matrix; column `e`
/// lists the global node indices of element `e` from left to right.
///
/// # Examples
/// ```
/// use beamx::Mesh;
///
/// let mesh = Mesh::new(10.0, 2, 2).unwrap();
/// assert_eq!(mesh.coordinates().as_slice(), &[0.0, 5.0, 10.0]);
/// assert_eq!(mesh.element_nodes(1).unwrap(), &[1, 2]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    /// Total beam length.
    length: f64,
    /// Element interpolation order.
    order: ElementOrder,
    /// Nodal x coordinates.
    coordinates: Vector<f64>,
    /// Node slot to global node mapping, one column per element.
    connectivity: Matrix<usize>,
}

impl Mesh {
    /// Generate a mesh of `num_elements` elements with `nodes_per_element` nodes each.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError`] when the length is not positive, there are no
    /// elements, `nodes_per_element` is not 2 or 3, or the node count does not
    /// fit in `usize`.
    pub fn new(
        length: f64,
        num_elements: usize,
        nodes_per_element: usize,
    ) -> Result<Self, MeshError> {
        let order = ElementOrder::from_nodes_per_element(nodes_per_element)?;
        if num_elements == 0 {
            return Err(MeshError::NoElements);
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(MeshError::InvalidLength(length));
        }

        let slots = nodes_per_element
            .checked_mul(num_elements)
            .ok_or(MeshError::TooManyElements(num_elements))?;
        // Neighbouring elements share one node.
        let num_nodes = slots - num_elements + 1;
        let mut coordinates = Vector::new(num_nodes);
        for node in 0..num_nodes {
            coordinates[node] = length * node as f64 / (num_nodes - 1) as f64;
        }

        let mut connectivity = Matrix::new(nodes_per_element, num_elements);
        for element in 0..num_elements {
            let first = (nodes_per_element - 1) * element;
            for slot in 0..nodes_per_element {
                connectivity[(slot, element)] = first + slot;
            }
        }

        Ok(Self {
            length,
            order,
            coordinates,
            connectivity,
        })
    }

    /// Generate a mesh of linear two-node elements.
    ///
    /// # Errors
    ///
    /// See [`Mesh::new`].
    pub fn linear(length: f64, num_elements: usize) -> Result<Self, MeshError> {
        Self::new(length, num_elements, 2)
    }

    /// Total beam length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Element interpolation order.
    #[must_use]
    pub fn order(&self) -> ElementOrder {
        self.order
    }

    /// Nodes per element.
    #[must_use]
    pub fn nodes_per_element(&self) -> usize {
        self.order.nodes_per_element()
    }

    /// Number of elements.
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.connectivity.cols()
    }

    /// Number of nodes.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.coordinates.len()
    }

    /// Nodal x coordinates.
    #[must_use]
    pub fn coordinates(&self) -> &Vector<f64> {
        &self.coordinates
    }

    /// Connectivity matrix.
    #[must_use]
    pub fn connectivity(&self) -> &Matrix<usize> {
        &self.connectivity
    }

    /// Global node indices of `element`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] for an unknown element.
    pub fn element_nodes(&self, element: usize) -> Result<&[usize], ContainerError> {
        self.connectivity.column(element)
    }

    /// Coordinates of the nodes of `element`, in slot order.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IndexOutOfRange`] for an unknown element.
    pub fn element_coordinates(&self, element: usize) -> Result<Vec<f64>, ContainerError> {
        self.element_nodes(element)?
            .iter()
            .map(|&node| self.coordinates.at(node))
            .collect()
    }

    /// Pairs of consecutive nodes, element by element.
    ///
    /// A linear mesh yields one edge per element and a quadratic mesh two.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        // Column-major: each chunk is one element's nodes in slot order.
        self.connectivity
            .as_slice()
            .chunks(self.nodes_per_element())
            .flat_map(|nodes| nodes.windows(2).map(|pair| (pair[0], pair[1])))
    }
}
