//! Gauss-Legendre integration rules on the reference interval `[-1, 1]`.

use gauss_quad::GaussLegendre;

use crate::errors::ElementError;

/// Integration points and matching weights.
#[derive(Clone, Debug, PartialEq)]
pub struct Quadrature {
    /// Points in the reference coordinate `xi`.
    pub points: Vec<f64>,
    /// Weight of each point.
    pub weights: Vec<f64>,
}

impl Quadrature {
    /// Gauss-Legendre rule with `order` points, ordered by ascending `xi`.
    ///
    /// An `order`-point rule integrates polynomials up to degree `2 * order - 1`
    /// exactly.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::Quadrature`] when the rule cannot be built.
    pub fn gauss(order: usize) -> Result<Self, ElementError> {
        let rule = GaussLegendre::new(order).map_err(|_| ElementError::Quadrature(order))?;
        let mut pairs = rule.into_node_weight_pairs();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (points, weights) = pairs.into_iter().unzip();
        Ok(Self { points, weights })
    }

    /// Number of integration points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the rule has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate over `(point, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied().zip(self.weights.iter().copied())
    }
}
