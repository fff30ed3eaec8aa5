//! End-to-end analysis of a straight beam: mesh, assemble, constrain, solve.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::assembly::GlobalSystem;
use crate::boundary::{self, clamp_node, eliminate, pin, BoundaryStrategy, Constraint};
use crate::element::{BarElement, BeamElement, FRAME_DOFS_PER_NODE};
use crate::errors::{AnalysisError, ContainerError};
use crate::geometry::{point, Displacement};
use crate::material::Material;
use crate::matrix::Matrix;
use crate::mesh::Mesh;
use crate::solver::{DenseSolver, LuSolver};
use crate::vector::Vector;

/// Which element family discretises the beam.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formulation {
    /// Euler-Bernoulli frame elements with axial, transverse and rotational DOFs.
    #[default]
    Frame,
    /// Axial bar elements with one DOF per node, integrated at Gauss points.
    Axial,
}

impl Formulation {
    /// Degrees of freedom carried by each node.
    #[must_use]
    pub const fn dofs_per_node(self) -> usize {
        match self {
            Self::Frame => FRAME_DOFS_PER_NODE,
            Self::Axial => 1,
        }
    }
}

/// Point loads applied at the free end, `x = L`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndLoad {
    /// Force along the beam axis.
    pub traction: f64,
    /// Force across the beam axis.
    pub transverse: f64,
    /// Bending moment.
    pub moment: f64,
}

/// Inputs of one analysis run.
///
/// Every field has a default, so a JSON document only needs the values that
/// differ.
///
/// # Examples
/// ```
/// use beamx::{AnalysisConfig, Formulation};
///
/// let config = AnalysisConfig::from_json(r#"{ "num_elements": 4, "formulation": "Axial" }"#)
///     .unwrap();
/// assert_eq!(config.num_elements, 4);
/// assert_eq!(config.formulation, Formulation::Axial);
/// assert_eq!(config.beam_length, 10.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Beam length in metres.
    pub beam_length: f64,
    /// Number of mesh elements.
    pub num_elements: usize,
    /// Nodes per mesh element, 2 or 3.
    pub nodes_per_element: usize,
    /// Section properties shared by every element.
    pub material: Material,
    /// Element family.
    pub formulation: Formulation,
    /// Uniform axial load per unit length.
    pub body_force: f64,
    /// Uniform transverse load per unit length. Ignored by [`Formulation::Axial`].
    pub distributed_load: f64,
    /// Loads at the free end.
    pub end_load: EndLoad,
    /// Prescribed DOFs. `None` clamps every DOF of node 0.
    pub constraints: Option<Vec<Constraint>>,
    /// How the constraints are imposed.
    pub strategy: BoundaryStrategy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            beam_length: 10.0,
            num_elements: 2,
            nodes_per_element: 2,
            material: Material::default(),
            formulation: Formulation::default(),
            body_force: 0.0,
            distributed_load: 0.0,
            end_load: EndLoad::default(),
            constraints: None,
            strategy: BoundaryStrategy::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] for malformed JSON or invalid material
    /// properties.
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Generate the mesh described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Mesh`] for invalid mesh parameters.
    pub fn mesh(&self) -> Result<Mesh, AnalysisError> {
        Ok(Mesh::new(
            self.beam_length,
            self.num_elements,
            self.nodes_per_element,
        )?)
    }

    /// The constraints that will be applied to a mesh of `num_nodes` nodes,
    /// checked for range and duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Boundary`] for a DOF outside the system or
    /// constrained twice.
    pub fn resolved_constraints(&self, num_nodes: usize) -> Result<Vec<Constraint>, AnalysisError> {
        let dofs_per_node = self.formulation.dofs_per_node();
        let constraints = self
            .constraints
            .clone()
            .unwrap_or_else(|| clamp_node(0, dofs_per_node));
        boundary::validate(&constraints, num_nodes * dofs_per_node)?;
        Ok(constraints)
    }
}

/// Run an analysis with the default LU solver.
///
/// # Errors
///
/// See [`run_analysis_with`].
///
/// # Examples
/// ```
/// use beamx::{run_analysis, AnalysisConfig, EndLoad};
///
/// let config = AnalysisConfig {
///     end_load: EndLoad { transverse: -1.0, ..EndLoad::default() },
///     ..AnalysisConfig::default()
/// };
/// let result = run_analysis(&config).unwrap();
/// let tip = result.node_displacement(2).unwrap();
/// assert!(tip.transverse < 0.0);
/// ```
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisResult, AnalysisError> {
    run_analysis_with(config, &LuSolver::default())
}

/// Run an analysis, solving the constrained system with `solver`.
///
/// The configuration is validated completely before any element is formed.
///
/// # Errors
///
/// Returns [`AnalysisError`] for an invalid configuration, a degenerate element
/// or a system the solver rejects.
pub fn run_analysis_with<S>(
    config: &AnalysisConfig,
    solver: &S,
) -> Result<AnalysisResult, AnalysisError>
where
    S: DenseSolver + ?Sized,
{
    let mesh = config.mesh()?;
    let constraints = config.resolved_constraints(mesh.num_nodes())?;
    debug!(
        "mesh has {} nodes and {} elements; {} constraints",
        mesh.num_nodes(),
        mesh.num_elements(),
        constraints.len()
    );

    let system = match config.formulation {
        Formulation::Frame => assemble_frame(config, &mesh)?,
        Formulation::Axial => assemble_axial(config, &mesh)?,
    };
    debug!("assembled {} global DOFs", system.size());
    let (stiffness, force) = system.clone().into_parts();

    let (displacements, residual_norm) = match config.strategy {
        BoundaryStrategy::Elimination => {
            let reduced = eliminate(system, &constraints)?;
            let solution = solver.solve(reduced.stiffness(), reduced.force())?;
            let residual = residual(reduced.stiffness(), &solution, reduced.force())?;
            (reduced.expand(&solution)?, residual)
        }
        BoundaryStrategy::Pinning => {
            let mut system = system;
            pin(&mut system, &constraints)?;
            let solution = solver.solve(system.stiffness(), system.force())?;
            let residual = residual(system.stiffness(), &solution, system.force())?;
            (solution, residual)
        }
    };

    let internal = stiffness.mul_vector(&displacements)?;
    let reactions = constraints
        .iter()
        .map(|c| (c.dof, internal[c.dof] - force[c.dof]))
        .collect();

    info!(
        "solved {} DOFs ({} constrained, {:?}); residual norm {residual_norm:e}",
        displacements.len(),
        constraints.len(),
        config.strategy
    );
    Ok(AnalysisResult {
        mesh,
        formulation: config.formulation,
        stiffness,
        force,
        displacements,
        reactions,
        residual_norm,
    })
}

/// Assemble one [`BeamElement`] per mesh edge, with consistent distributed loads.
fn assemble_frame(config: &AnalysisConfig, mesh: &Mesh) -> Result<GlobalSystem, AnalysisError> {
    let edges: Vec<(usize, usize)> = mesh.edges().collect();
    let coordinates = mesh.coordinates();
    let mut system = GlobalSystem::new(mesh.num_nodes(), FRAME_DOFS_PER_NODE, edges.len());

    for (index, &(first, second)) in edges.iter().enumerate() {
        let element = BeamElement::new(
            point(coordinates[first], 0.0),
            point(coordinates[second], 0.0),
            config.material,
        )
        .and_then(|element| {
            let loads = element.equivalent_nodal_loads(config.body_force, config.distributed_load)?;
            Ok((element, loads))
        });
        let (element, loads) = element.map_err(|source| AnalysisError::Element {
            element: index,
            source,
        })?;
        system.scatter(index, &[first, second], element.stiffness(), Some(&loads))?;
    }

    let end = config.end_load;
    system.add_nodal_load(
        mesh.num_nodes() - 1,
        &Vector::from_slice(&[end.traction, end.transverse, end.moment]),
    )?;
    Ok(system)
}

/// Assemble one [`BarElement`] per mesh element.
fn assemble_axial(config: &AnalysisConfig, mesh: &Mesh) -> Result<GlobalSystem, AnalysisError> {
    let end = config.end_load;
    if config.distributed_load != 0.0 || end.transverse != 0.0 || end.moment != 0.0 {
        warn!("axial formulation ignores transverse loads and moments");
    }

    let mut system = GlobalSystem::new(mesh.num_nodes(), 1, mesh.num_elements());
    for element in 0..mesh.num_elements() {
        let coordinates = mesh.element_coordinates(element)?;
        let bar = BarElement::new(
            &coordinates,
            config.material.axial_rigidity(),
            config.body_force,
        )
        .map_err(|source| AnalysisError::Element { element, source })?;
        let nodes = mesh.element_nodes(element)?;
        system.scatter(element, nodes, bar.stiffness(), Some(bar.force()))?;
    }

    system.add_nodal_load(mesh.num_nodes() - 1, &Vector::from_slice(&[end.traction]))?;
    Ok(system)
}

/// `‖K u − F‖`.
fn residual(
    stiffness: &Matrix<f64>,
    solution: &Vector<f64>,
    force: &Vector<f64>,
) -> Result<f64, ContainerError> {
    let mut residual = stiffness.mul_vector(solution)?;
    let mut negated = force.clone();
    negated.scale(-1.0);
    residual.add(&negated)?;
    Ok(residual.norm())
}

/// Outcome of a successful analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisResult {
    /// Mesh the model was built on.
    mesh: Mesh,
    /// Element family used.
    formulation: Formulation,
    /// Assembled stiffness, before constraints.
    stiffness: Matrix<f64>,
    /// Assembled force, before constraints.
    force: Vector<f64>,
    /// Full-length nodal displacements.
    displacements: Vector<f64>,
    /// `(dof, reaction)` for each constrained DOF.
    reactions: Vec<(usize, f64)>,
    /// Residual of the solved system.
    residual_norm: f64,
}

impl AnalysisResult {
    /// Displacement of every global DOF.
    #[must_use]
    pub fn displacements(&self) -> &Vector<f64> {
        &self.displacements
    }

    /// Displacement of `node`, or `None` past the last node.
    ///
    /// The axial formulation only fills [`Displacement::axial`].
    #[must_use]
    pub fn node_displacement(&self, node: usize) -> Option<Displacement> {
        if node >= self.mesh.num_nodes() {
            return None;
        }
        let u = &self.displacements;
        Some(match self.formulation {
            Formulation::Frame => {
                let base = node * FRAME_DOFS_PER_NODE;
                Displacement::new(u[base], u[base + 1], u[base + 2])
            }
            Formulation::Axial => Displacement::new(u[node], 0.0, 0.0),
        })
    }

    /// Assembled stiffness matrix, before boundary conditions.
    #[must_use]
    pub fn global_stiffness(&self) -> &Matrix<f64> {
        &self.stiffness
    }

    /// Assembled force vector, before boundary conditions.
    #[must_use]
    pub fn global_force(&self) -> &Vector<f64> {
        &self.force
    }

    /// Support reactions `K u − F` at each constrained DOF.
    #[must_use]
    pub fn reactions(&self) -> &[(usize, f64)] {
        &self.reactions
    }

    /// Norm of the residual of the system handed to the solver.
    #[must_use]
    pub fn residual_norm(&self) -> f64 {
        self.residual_norm
    }

    /// Mesh the model was built on.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Element family used.
    #[must_use]
    pub fn formulation(&self) -> Formulation {
        self.formulation
    }

    /// Degrees of freedom per node.
    #[must_use]
    pub fn dofs_per_node(&self) -> usize {
        self.formulation.dofs_per_node()
    }
}
