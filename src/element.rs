//! Element-level stiffness and load formation.
//!
//! [`BeamElement`] is the two-node Euler-Bernoulli frame element with three
//! degrees of freedom per node (axial, transverse, rotation). [`BarElement`] is
//! the one-dimensional axial element with one degree of freedom per node whose
//! stiffness is integrated numerically, so it supports quadratic interpolation.

use crate::errors::ElementError;
use crate::geometry::Point;
use crate::material::Material;
use crate::matrix::Matrix;
use crate::mesh::ElementOrder;
use crate::quadrature::Quadrature;
use crate::vector::Vector;

/// Degrees of freedom carried by each frame node.
pub const FRAME_DOFS_PER_NODE: usize = 3;

/// A two-node plane frame element.
///
/// The stiffness matrix is formed once, in global coordinates, when the element
/// is created.
///
/// # Examples
/// ```
/// use beamx::{point, BeamElement, Material};
///
/// let material = Material::new(200.0e9, 0.01, 1.0e-4).unwrap();
/// let element = BeamElement::new(point(0.0, 0.0), point(2.0, 0.0), material).unwrap();
/// let k = element.stiffness();
/// assert_eq!(k.shape(), (6, 6));
/// assert_eq!(k[(0, 0)], 200.0e9 * 0.01 / 2.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BeamElement {
    /// First end node.
    start: Point,
    /// Second end node.
    end: Point,
    /// Section properties.
    material: Material,
    /// Distance between the end nodes.
    length: f64,
    /// Angle from the global X axis to the element axis, in radians.
    inclination: f64,
    /// 6x6 stiffness in global coordinates.
    stiffness: Matrix<f64>,
}

impl BeamElement {
    /// Form the element between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::ZeroLength`] when the nodes coincide.
    pub fn new(start: Point, end: Point, material: Material) -> Result<Self, ElementError> {
        let length = start.distance_to(end);
        if !(length.is_finite() && length > 0.0) {
            return Err(ElementError::ZeroLength);
        }
        let inclination = (end.y - start.y).atan2(end.x - start.x);
        let local = local_stiffness(&material, length);

        let stiffness = if inclination == 0.0 {
            local
        } else {
            let transformation = transformation(inclination);
            let mut rotated = Matrix::default();
            rotated.mult_ab(&local, &transformation)?;
            let mut stiffness = Matrix::default();
            stiffness.mult_ab(&transformation.transposed(), &rotated)?;
            stiffness
        };

        Ok(Self {
            start,
            end,
            material,
            length,
            inclination,
            stiffness,
        })
    }

    /// First end node.
    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Second end node.
    #[must_use]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Section properties.
    #[must_use]
    pub fn material(&self) -> Material {
        self.material
    }

    /// Element length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Inclination of the element axis in radians.
    #[must_use]
    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    /// Stiffness in global coordinates.
    #[must_use]
    pub fn stiffness(&self) -> &Matrix<f64> {
        &self.stiffness
    }

    /// Stiffness in the element's own axes.
    #[must_use]
    pub fn local_stiffness(&self) -> Matrix<f64> {
        local_stiffness(&self.material, self.length)
    }

    /// Global-to-local rotation for this element.
    #[must_use]
    pub fn transformation(&self) -> Matrix<f64> {
        transformation(self.inclination)
    }

    /// Consistent nodal loads, in global axes, for uniform loads per unit
    /// length along (`axial`) and across (`transverse`) the element axis.
    ///
    /// # Errors
    ///
    /// Propagates container errors from the rotation.
    pub fn equivalent_nodal_loads(
        &self,
        axial: f64,
        transverse: f64,
    ) -> Result<Vector<f64>, ElementError> {
        let l = self.length;
        let local = Vector::from_slice(&[
            axial * l / 2.0,
            transverse * l / 2.0,
            transverse * l * l / 12.0,
            axial * l / 2.0,
            transverse * l / 2.0,
            -transverse * l * l / 12.0,
        ]);
        if self.inclination == 0.0 {
            return Ok(local);
        }
        Ok(self.transformation().transposed().mul_vector(&local)?)
    }

    /// End forces in the element's own axes produced by `displacements`, the
    /// six global nodal displacements of this element.
    ///
    /// # Errors
    ///
    /// Returns a container error unless six displacements are supplied.
    pub fn end_forces(&self, displacements: &Vector<f64>) -> Result<Vector<f64>, ElementError> {
        let local_displacements = self.transformation().mul_vector(displacements)?;
        Ok(self.local_stiffness().mul_vector(&local_displacements)?)
    }
}

/// Euler-Bernoulli stiffness in element axes.
///
/// Rows and columns: axial-1, transverse-1, rotation-1, axial-2, transverse-2,
/// rotation-2.
fn local_stiffness(material: &Material, length: f64) -> Matrix<f64> {
    let l = length;
    let c1 = material.axial_rigidity() / l;
    let c2 = material.flexural_rigidity() / l.powi(3);
    #[rustfmt::skip]
    let values = [
         c1,  0.0,            0.0,             -c1,  0.0,            0.0,
         0.0, 12.0 * c2,      6.0 * c2 * l,     0.0, -12.0 * c2,     6.0 * c2 * l,
         0.0, 6.0 * c2 * l,   4.0 * c2 * l * l, 0.0, -6.0 * c2 * l,  2.0 * c2 * l * l,
        -c1,  0.0,            0.0,              c1,  0.0,            0.0,
         0.0, -12.0 * c2,    -6.0 * c2 * l,     0.0, 12.0 * c2,     -6.0 * c2 * l,
         0.0, 6.0 * c2 * l,   2.0 * c2 * l * l, 0.0, -6.0 * c2 * l,  4.0 * c2 * l * l,
    ];
    Matrix::from_row_slice(6, 6, &values)
}

/// Block-diagonal rotation from global to element axes.
fn transformation(inclination: f64) -> Matrix<f64> {
    let (s, c) = inclination.sin_cos();
    let mut t = Matrix::identity(6);
    for base in [0, FRAME_DOFS_PER_NODE] {
        t[(base, base)] = c;
        t[(base, base + 1)] = s;
        t[(base + 1, base)] = -s;
        t[(base + 1, base + 1)] = c;
    }
    t
}

/// A one-dimensional axial element integrated at Gauss points.
///
/// Nodes are given in connectivity slot order: left to right for linear
/// elements and left, middle, right for quadratic ones.
#[derive(Clone, Debug, PartialEq)]
pub struct BarElement {
    /// Interpolation order.
    order: ElementOrder,
    /// Nodal x coordinates.
    coordinates: Vec<f64>,
    /// N x N stiffness.
    stiffness: Matrix<f64>,
    /// N-entry consistent body force.
    force: Vector<f64>,
}

impl BarElement {
    /// Integrate the element over `coordinates` with axial rigidity `E·A` and a
    /// uniform body force per unit length.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::UnsupportedNodeCount`] for anything but two or
    /// three nodes and [`ElementError::InvalidJacobian`] when the nodes are not
    /// strictly increasing.
    pub fn new(
        coordinates: &[f64],
        axial_rigidity: f64,
        body_force: f64,
    ) -> Result<Self, ElementError> {
        let order = ElementOrder::from_nodes_per_element(coordinates.len())
            .map_err(|_| ElementError::UnsupportedNodeCount(coordinates.len()))?;
        let nodes = coordinates.len();
        let rule = Quadrature::gauss(nodes)?;

        let mut stiffness = Matrix::square(nodes);
        let mut force = Vector::new(nodes);
        for (xi, weight) in rule.iter() {
            let (shape, gradient) = shape_functions(order, xi);
            let dx_dxi: f64 = gradient
                .iter()
                .zip(coordinates)
                .map(|(dn, x)| dn * x)
                .sum();
            if !(dx_dxi > 0.0) {
                return Err(ElementError::InvalidJacobian(dx_dxi));
            }
            for a in 0..nodes {
                force[a] += weight * body_force * dx_dxi * shape[a];
                for b in 0..nodes {
                    stiffness[(a, b)] +=
                        axial_rigidity * weight * gradient[a] * gradient[b] / dx_dxi;
                }
            }
        }

        Ok(Self {
            order,
            coordinates: coordinates.to_vec(),
            stiffness,
            force,
        })
    }

    /// Interpolation order.
    #[must_use]
    pub fn order(&self) -> ElementOrder {
        self.order
    }

    /// Nodal coordinates.
    #[must_use]
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    /// N x N stiffness.
    #[must_use]
    pub fn stiffness(&self) -> &Matrix<f64> {
        &self.stiffness
    }

    /// Consistent nodal body force.
    #[must_use]
    pub fn force(&self) -> &Vector<f64> {
        &self.force
    }
}

/// Shape functions and their `xi` derivatives at `xi`.
fn shape_functions(order: ElementOrder, xi: f64) -> (Vec<f64>, Vec<f64>) {
    match order {
        ElementOrder::Linear => (vec![0.5 * (1.0 - xi), 0.5 * (1.0 + xi)], vec![-0.5, 0.5]),
        ElementOrder::Quadratic => (
            vec![0.5 * xi * (xi - 1.0), 1.0 - xi * xi, 0.5 * xi * (xi + 1.0)],
            vec![xi - 0.5, -2.0 * xi, xi + 0.5],
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::point;

    fn steel() -> Material {
        Material::new(210.0e9, 0.01, 1.0e-4).expect("valid material")
    }

    #[test]
    fn horizontal_element_keeps_local_layout() {
        let element = BeamElement::new(point(0.0, 0.0), point(5.0, 0.0), steel())
            .expect("valid element");
        let k = element.stiffness();
        let ea_over_l = 210.0e9 * 0.01 / 5.0;
        let c2 = 210.0e9 * 1.0e-4 / 125.0;

        assert_eq!(element.inclination(), 0.0);
        assert!(k.is_symmetric(1.0e-14));
        assert_relative_eq!(k[(0, 0)], ea_over_l);
        assert_relative_eq!(k[(3, 3)], ea_over_l);
        assert_relative_eq!(k[(0, 3)], -ea_over_l);
        assert_relative_eq!(k[(1, 1)], 12.0 * c2, max_relative = 1.0e-12);
        assert_relative_eq!(k[(1, 2)], 6.0 * c2 * 5.0, max_relative = 1.0e-12);
        assert_relative_eq!(k[(2, 2)], 4.0 * c2 * 25.0, max_relative = 1.0e-12);
        assert_relative_eq!(k[(2, 5)], 2.0 * c2 * 25.0, max_relative = 1.0e-12);
        assert_relative_eq!(k[(4, 5)], -6.0 * c2 * 5.0, max_relative = 1.0e-12);
        assert_eq!(k[(0, 1)], 0.0);
    }

    #[test]
    fn coincident_nodes_are_rejected() {
        let error = BeamElement::new(point(1.0, 1.0), point(1.0, 1.0), steel())
            .expect_err("zero length detected");
        assert_eq!(error, ElementError::ZeroLength);
    }

    #[test]
    fn vertical_element_swaps_axial_and_transverse_terms() {
        let element = BeamElement::new(point(0.0, 0.0), point(0.0, 4.0), steel())
            .expect("valid element");
        let k = element.stiffness();
        let ea_over_l = 210.0e9 * 0.01 / 4.0;
        let c2 = 210.0e9 * 1.0e-4 / 64.0;

        assert_relative_eq!(element.inclination(), FRAC_PI_2);
        assert!(k.is_symmetric(1.0e-12));
        assert_relative_eq!(k[(1, 1)], ea_over_l, max_relative = 1.0e-12);
        assert_relative_eq!(k[(0, 0)], 12.0 * c2, max_relative = 1.0e-9);
        assert_relative_eq!(k[(2, 2)], 4.0 * c2 * 16.0, max_relative = 1.0e-12);
    }

    #[test]
    fn rotation_preserves_rigid_body_translation() {
        let element = BeamElement::new(point(0.0, 0.0), point(3.0, 4.0), steel())
            .expect("valid element");
        let translation = Vector::from_slice(&[0.6, 0.8, 0.0, 0.6, 0.8, 0.0]);
        let forces = element
            .stiffness()
            .mul_vector(&translation)
            .expect("6x6 times 6");
        let scale = element.stiffness()[(0, 0)].abs().max(1.0);
        for force in forces.iter() {
            assert!(force.abs() / scale < 1.0e-12);
        }
    }

    #[test]
    fn uniform_transverse_load_is_lumped_consistently() {
        let element = BeamElement::new(point(0.0, 0.0), point(2.0, 0.0), steel())
            .expect("valid element");
        let loads = element
            .equivalent_nodal_loads(0.0, -6.0)
            .expect("six loads");
        assert_eq!(loads.as_slice(), &[0.0, -6.0, -2.0, 0.0, -6.0, 2.0]);
    }

    #[test]
    fn axial_end_forces_follow_hookes_law() {
        let element = BeamElement::new(point(0.0, 0.0), point(1.0, 0.0), steel())
            .expect("valid element");
        let stretch = Vector::from_slice(&[0.0, 0.0, 0.0, 1.0e-6, 0.0, 0.0]);
        let forces = element.end_forces(&stretch).expect("six displacements");
        let axial = 210.0e9 * 0.01 * 1.0e-6;
        assert_relative_eq!(forces[0], -axial, max_relative = 1.0e-12);
        assert_relative_eq!(forces[3], axial, max_relative = 1.0e-12);
    }

    #[test]
    fn linear_bar_matches_closed_form() {
        let bar = BarElement::new(&[1.0, 3.0], 10.0, 4.0).expect("valid bar");
        let k = bar.stiffness();
        assert_relative_eq!(k[(0, 0)], 5.0, epsilon = 1.0e-12);
        assert_relative_eq!(k[(0, 1)], -5.0, epsilon = 1.0e-12);
        assert_relative_eq!(k[(1, 1)], 5.0, epsilon = 1.0e-12);
        assert_relative_eq!(bar.force()[0], 4.0, epsilon = 1.0e-12);
        assert_relative_eq!(bar.force()[1], 4.0, epsilon = 1.0e-12);
    }

    #[test]
    fn quadratic_bar_matches_closed_form() {
        let bar = BarElement::new(&[0.0, 1.0, 2.0], 3.0, 6.0).expect("valid bar");
        let expected = [7.0, -8.0, 1.0, -8.0, 16.0, -8.0, 1.0, -8.0, 7.0];
        for row in 0..3 {
            for col in 0..3 {
                // EA / 3L = 0.5
                assert_relative_eq!(
                    bar.stiffness()[(row, col)],
                    0.5 * expected[row * 3 + col],
                    epsilon = 1.0e-12
                );
            }
        }
        // b L [1/6, 2/3, 1/6]
        assert_relative_eq!(bar.force()[0], 2.0, epsilon = 1.0e-12);
        assert_relative_eq!(bar.force()[1], 8.0, epsilon = 1.0e-12);
        assert_relative_eq!(bar.force()[2], 2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn bar_rejects_bad_geometry() {
        assert_eq!(
            BarElement::new(&[1.0, 1.0], 1.0, 0.0),
            Err(ElementError::InvalidJacobian(0.0))
        );
        assert_eq!(
            BarElement::new(&[0.0], 1.0, 0.0),
            Err(ElementError::UnsupportedNodeCount(1))
        );
    }
}
