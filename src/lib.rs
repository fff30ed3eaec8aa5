#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod analysis;
pub mod array;
pub mod assembly;
pub mod boundary;
pub mod element;
pub mod errors;
pub mod geometry;
pub mod material;
pub mod matrix;
pub mod mesh;
pub mod quadrature;
pub mod solver;
pub mod vector;

pub use analysis::{
    run_analysis, run_analysis_with, AnalysisConfig, AnalysisResult, EndLoad, Formulation,
};
pub use array::DynamicArray;
pub use assembly::{element_dofs, GlobalSystem};
pub use boundary::{clamp_node, eliminate, pin, BoundaryStrategy, Constraint, ReducedSystem};
pub use element::{BarElement, BeamElement, FRAME_DOFS_PER_NODE};
pub use errors::{
    AnalysisError, AssemblyError, BoundaryError, ContainerError, ElementError, MaterialError,
    MeshError, SolveError,
};
pub use geometry::{point, Displacement, Point};
pub use material::Material;
pub use matrix::Matrix;
pub use mesh::{ElementOrder, Mesh};
pub use quadrature::Quadrature;
pub use solver::{DenseSolver, LuSolver};
pub use vector::Vector;
