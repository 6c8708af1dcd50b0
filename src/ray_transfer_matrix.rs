#![warn(missing_docs)]
//! Ray-transfer (ABCD) matrices for paraxial optics.
//!
//! A [`RayTransferMatrix`] maps the state `(x, θ)` of a [`ParaxialRay`] in front of an optical element to the state behind it.
//! All matrix elements are stored in SI base units (the `B` element in meter, the `C` element in 1/meter).
use std::{fmt::Display, ops::Mul};

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use uom::{num_traits::Zero, si::f64::Length};

use crate::{
    error::{BeamPathError, BpResult},
    ray::ParaxialRay,
};

/// Check that a free-space distance is finite and not negative.
///
/// # Errors
///
/// This function returns an [`BeamPathError::Element`] if the distance is negative or not finite.
pub fn check_distance(distance: Length) -> BpResult<()> {
    if !distance.is_finite() || distance.value < 0.0 {
        return Err(BeamPathError::Element(format!(
            "distance must be >= 0.0 and finite (got {} m)",
            distance.value
        )));
    }
    Ok(())
}
/// Check that a focal length is finite and not zero.
///
/// The optical power `1/f` must be finite as well. This excludes subnormal focal lengths.
///
/// # Errors
///
/// This function returns an [`BeamPathError::Element`] if the focal length is zero or not finite or its inverse
/// is not finite.
pub fn check_focal_length(focal_length: Length) -> BpResult<()> {
    if focal_length.is_zero() || !focal_length.is_finite() {
        return Err(BeamPathError::Element(format!(
            "focal length must be != 0.0 & finite (got {} m)",
            focal_length.value
        )));
    }
    if !focal_length.value.recip().is_finite() {
        return Err(BeamPathError::Element(format!(
            "optical power of focal length {} m is not finite",
            focal_length.value
        )));
    }
    Ok(())
}

/// A 2x2 ray-transfer matrix `[[A, B], [C, D]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayTransferMatrix {
    matrix: Matrix2<f64>,
}
impl Default for RayTransferMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
impl RayTransferMatrix {
    /// Create the identity matrix (an element which does not modify a ray).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix2::identity(),
        }
    }
    /// Create the matrix of a free-space propagation over the given `distance`: `[[1, d], [0, 1]]`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the distance is negative or not finite.
    pub fn free_space(distance: Length) -> BpResult<Self> {
        check_distance(distance)?;
        Ok(Self {
            matrix: Matrix2::new(1.0, distance.value, 0.0, 1.0),
        })
    }
    /// Create the matrix of an ideal thin lens with the given `focal_length`: `[[1, 0], [-1/f, 1]]`.
    ///
    /// A positive focal length corresponds to a converging lens, a negative one to a diverging lens.
    ///
    /// # Errors
    ///
    /// This function will return an error if the focal length is zero or not finite.
    pub fn thin_lens(focal_length: Length) -> BpResult<Self> {
        check_focal_length(focal_length)?;
        Ok(Self {
            matrix: Matrix2::new(1.0, 0.0, -1.0 / focal_length.value, 1.0),
        })
    }
    /// Returns the `A` element (spatial magnification).
    #[must_use]
    pub fn a(&self) -> f64 {
        self.matrix[(0, 0)]
    }
    /// Returns the `B` element in meter.
    #[must_use]
    pub fn b(&self) -> f64 {
        self.matrix[(0, 1)]
    }
    /// Returns the `C` element in 1/meter (negative optical power).
    #[must_use]
    pub fn c(&self) -> f64 {
        self.matrix[(1, 0)]
    }
    /// Returns the `D` element (angular magnification).
    #[must_use]
    pub fn d(&self) -> f64 {
        self.matrix[(1, 1)]
    }
    /// Returns the determinant of this matrix.
    ///
    /// For free-space propagation and thin lenses (and all their products) this is 1.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.matrix.determinant()
    }
    /// Apply this matrix to the given [`ParaxialRay`] and return the transformed ray.
    #[must_use]
    pub fn apply(&self, ray: &ParaxialRay) -> ParaxialRay {
        let out = self.matrix * Vector2::new(ray.position().value, ray.angle());
        ParaxialRay::from_si(out.x, out.y)
    }
}
impl Mul for RayTransferMatrix {
    type Output = Self;

    /// Compose two matrices. `second * first` describes passing `first` and then `second`.
    fn mul(self, rhs: Self) -> Self {
        Self {
            matrix: self.matrix * rhs.matrix,
        }
    }
}
impl Display for RayTransferMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[[{}, {} m], [{} 1/m, {}]]",
            self.a(),
            self.b(),
            self.c(),
            self.d()
        )
    }
}
