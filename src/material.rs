//! Section and material properties shared by every element.

use serde::{Deserialize, Serialize};

use crate::errors::MaterialError;

/// Immutable elastic properties of a beam section.
///
/// # Examples
/// ```
/// use beamx::Material;
///
/// let steel = Material::new(210.0e9, 0.01, 1.0e-4).unwrap();
/// assert_eq!(steel.area(), 0.01);
/// assert!(Material::new(210.0e9, 0.0, 1.0e-4).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMaterial")]
pub struct Material {
    /// Young's modulus in pascals.
    elastic_modulus: f64,
    /// Cross-sectional area in square metres.
    area: f64,
    /// Second moment of area in metres to the fourth.
    moment_of_inertia: f64,
}

impl Material {
    /// Validate and create a material.
    ///
    /// # Errors
    ///
    /// Returns [`MaterialError`] when the modulus or area is not strictly
    /// positive or the moment of inertia is negative.
    pub fn new(
        elastic_modulus: f64,
        area: f64,
        moment_of_inertia: f64,
    ) -> Result<Self, MaterialError> {
        if !(elastic_modulus.is_finite() && elastic_modulus > 0.0) {
            return Err(MaterialError::NonPositiveElasticModulus(elastic_modulus));
        }
        if !(area.is_finite() && area > 0.0) {
            return Err(MaterialError::NonPositiveArea(area));
        }
        if !(moment_of_inertia.is_finite() && moment_of_inertia >= 0.0) {
            return Err(MaterialError::NegativeMomentOfInertia(moment_of_inertia));
        }
        Ok(Self {
            elastic_modulus,
            area,
            moment_of_inertia,
        })
    }

    /// Young's modulus `E`.
    #[must_use]
    pub fn elastic_modulus(&self) -> f64 {
        self.elastic_modulus
    }

    /// Cross-sectional area `A`.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Second moment of area `I`.
    #[must_use]
    pub fn moment_of_inertia(&self) -> f64 {
        self.moment_of_inertia
    }

    /// Axial rigidity `E·A`.
    #[must_use]
    pub fn axial_rigidity(&self) -> f64 {
        self.elastic_modulus * self.area
    }

    /// Flexural rigidity `E·I`.
    #[must_use]
    pub fn flexural_rigidity(&self) -> f64 {
        self.elastic_modulus * self.moment_of_inertia
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            elastic_modulus: 210.0e9,
            area: 0.01,
            moment_of_inertia: 1.0e-4,
        }
    }
}

/// Unvalidated wire form of [`Material`].
#[derive(Deserialize, Serialize)]
struct RawMaterial {
    /// Young's modulus in pascals.
    elastic_modulus: f64,
    /// Cross-sectional area in square metres.
    area: f64,
    /// Second moment of area.
    moment_of_inertia: f64,
}

impl TryFrom<RawMaterial> for Material {
    type Error = MaterialError;

    fn try_from(raw: RawMaterial) -> Result<Self, Self::Error> {
        Self::new(raw.elastic_modulus, raw.area, raw.moment_of_inertia)
    }
}
