//! Error types produced while building or analysing a beam model.

use thiserror::Error;

/// Error returned by the numeric containers when a shape or index contract is broken.
///
/// # Examples
///
/// ```
/// use beamx::{ContainerError, Vector};
///
/// let mut values = Vector::from_slice(&[0.0, 1.0, 2.0]);
/// let error = values.remove(3).expect_err("index past the end is rejected");
/// assert_eq!(error, ContainerError::IndexOutOfRange { index: 3, len: 3 });
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    /// Returned when two one-dimensional containers must have equal length.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Length of the receiving container.
        expected: usize,
        /// Length of the supplied container.
        found: usize,
    },
    /// Returned when a sub-range does not fit inside the receiving container.
    #[error("range {offset}..{end} does not fit in length {len}")]
    RangeOutOfBounds {
        /// First index written.
        offset: usize,
        /// One past the last index written.
        end: usize,
        /// Length of the receiving container.
        len: usize,
    },
    /// Returned when two matrices have incompatible shapes for `operation`.
    #[error("{operation}: incompatible shapes {left:?} and {right:?}")]
    DimensionMismatch {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Shape `(rows, cols)` of the left operand.
        left: (usize, usize),
        /// Shape `(rows, cols)` of the right operand.
        right: (usize, usize),
    },
    /// Returned when a one-dimensional index is past the end.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Rejected index.
        index: usize,
        /// Length of the container.
        len: usize,
    },
    /// Returned when a matrix position is outside the matrix.
    #[error("position ({row}, {col}) out of range for a {rows}x{cols} matrix")]
    PositionOutOfRange {
        /// Rejected row.
        row: usize,
        /// Rejected column.
        col: usize,
        /// Row count of the matrix.
        rows: usize,
        /// Column count of the matrix.
        cols: usize,
    },
    /// Returned when a batch removal lists the same index twice.
    #[error("index {0} is listed more than once")]
    DuplicateIndex(usize),
}

/// Error returned when mesh parameters cannot describe a valid mesh.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MeshError {
    /// Returned when the mesh would contain no elements.
    #[error("a mesh needs at least one element")]
    NoElements,
    /// Returned for element orders other than linear (2) and quadratic (3).
    #[error("unsupported number of nodes per element: {0} (expected 2 or 3)")]
    UnsupportedNodesPerElement(usize),
    /// Returned when the beam length is zero, negative or not finite.
    #[error("beam length must be positive and finite (received {0})")]
    InvalidLength(f64),
    /// Returned when the node or connectivity count of the mesh overflows `usize`.
    #[error("{0} elements are more than a mesh can index")]
    TooManyElements(usize),
}

/// Error returned when material properties are not physically meaningful.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MaterialError {
    /// Returned when the elastic modulus is zero, negative or not finite.
    #[error("elastic modulus must be positive (received {0})")]
    NonPositiveElasticModulus(f64),
    /// Returned when the cross-sectional area is zero, negative or not finite.
    #[error("area must be positive (received {0})")]
    NonPositiveArea(f64),
    /// Returned when the second moment of area is negative or not finite.
    #[error("moment of inertia must be non-negative (received {0})")]
    NegativeMomentOfInertia(f64),
}

/// Error returned while forming an element.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ElementError {
    /// Returned when both end nodes occupy the same position.
    #[error("element has zero length")]
    ZeroLength,
    /// Returned when the element geometry maps to a non-positive Jacobian.
    #[error("element Jacobian {0} is not positive; check node ordering")]
    InvalidJacobian(f64),
    /// Returned when the number of nodal coordinates does not match a supported order.
    #[error("unsupported number of element nodes: {0}")]
    UnsupportedNodeCount(usize),
    /// Returned when a quadrature rule cannot be constructed.
    #[error("quadrature rule of order {0} is unavailable")]
    Quadrature(usize),
    /// Returned when an underlying container operation fails.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// Error returned while scattering element contributions into the global system.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    /// Returned when the same element is scattered twice.
    #[error("element {0} has already been assembled")]
    DuplicateElement(usize),
    /// Returned when an element index is outside the system's element count.
    #[error("element {element} is outside a system of {count} elements")]
    UnknownElement {
        /// Rejected element index.
        element: usize,
        /// Number of elements the system was created for.
        count: usize,
    },
    /// Returned when an element references a degree of freedom outside the system.
    #[error("degree of freedom {dof} is outside a system of size {size}")]
    DofOutOfRange {
        /// Rejected global degree of freedom.
        dof: usize,
        /// Number of degrees of freedom in the system.
        size: usize,
    },
    /// Returned when local contributions do not match the element's DOF count.
    #[error("element {element} supplies a {found}-entry contribution for {expected} DOFs")]
    SizeMismatch {
        /// Offending element.
        element: usize,
        /// Number of element DOFs.
        expected: usize,
        /// Size of the supplied contribution.
        found: usize,
    },
    /// Returned when an underlying container operation fails.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// Error returned while applying displacement boundary conditions.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BoundaryError {
    /// Returned when a constraint targets a DOF outside the system.
    #[error("constrained degree of freedom {dof} is outside a system of size {size}")]
    DofOutOfRange {
        /// Rejected degree of freedom.
        dof: usize,
        /// Number of degrees of freedom in the system.
        size: usize,
    },
    /// Returned when two constraints target the same DOF.
    #[error("degree of freedom {0} is constrained more than once")]
    DuplicateConstraint(usize),
    /// Returned when a solution does not match the reduced system it should expand.
    #[error("solution has {found} entries but the reduced system has {expected}")]
    SolutionSize {
        /// Size of the reduced system.
        expected: usize,
        /// Size of the supplied solution.
        found: usize,
    },
    /// Returned when an underlying container operation fails.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// Failure reported by a dense linear solver.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SolveError {
    /// Returned when the matrix has no unique solution.
    #[error("stiffness matrix is singular; check supports and connectivity")]
    Singular,
    /// Returned when the matrix is not square or the right-hand side does not match.
    #[error("illegal solver input: {rows}x{cols} matrix with a right-hand side of length {rhs}")]
    IllegalArgument {
        /// Row count of the supplied matrix.
        rows: usize,
        /// Column count of the supplied matrix.
        cols: usize,
        /// Length of the supplied right-hand side.
        rhs: usize,
    },
}

/// Error returned when a beam analysis fails.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when the configuration cannot be parsed or is inconsistent.
    #[error("invalid configuration at line {line}, column {column}: {message}")]
    Config {
        /// Parser or validation message.
        message: String,
        /// One-based line of the offending input, zero when unknown.
        line: usize,
        /// One-based column of the offending input, zero when unknown.
        column: usize,
    },
    /// Returned when the mesh parameters are invalid.
    #[error(transparent)]
    Mesh(#[from] MeshError),
    /// Returned when the material properties are invalid.
    #[error(transparent)]
    Material(#[from] MaterialError),
    /// Returned when an element cannot be formed.
    #[error("element {element} could not be formed: {source}")]
    Element {
        /// Index of the offending element.
        element: usize,
        /// Reason the element was rejected.
        #[source]
        source: ElementError,
    },
    /// Returned when global assembly fails.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    /// Returned when boundary conditions cannot be applied.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
    /// Returned when the reduced system cannot be solved.
    #[error(transparent)]
    Solve(#[from] SolveError),
    /// Returned when post-processing hits a container error.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

impl From<serde_json::Error> for AnalysisError {
    fn from(value: serde_json::Error) -> Self {
        let (line, column) = (value.line(), value.column());
        let full = value.to_string();
        let location = format!(" at line {line} column {column}");
        let message = full.strip_suffix(&location).unwrap_or(&full).to_owned();
        Self::Config {
            message,
            line,
            column,
        }
    }
}
