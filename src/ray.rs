#![warn(missing_docs)]
//! Module for handling paraxial rays
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uom::{
    fmt::DisplayStyle::Abbreviation,
    si::{
        f64::Length,
        length::{meter, millimeter},
    },
};

use crate::{
    error::{BeamPathError, BpResult},
    ray_transfer_matrix::RayTransferMatrix,
};

/// A ray in the paraxial approximation.
///
/// The ray state consists of the transverse distance `x` from the optical axis and the propagation angle `θ`
/// with respect to the optical axis. Since only small angles are considered, `θ` behaves like a slope
/// (`dx/dz`) rather than a literal angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParaxialRay {
    /// transverse position
    x: Length,
    /// propagation angle (slope)
    theta: f64,
}
impl ParaxialRay {
    /// Creates a new [`ParaxialRay`] with the given transverse position and angle.
    ///
    /// # Errors
    ///
    /// This function will return an error if the position or the angle is not finite.
    pub fn new(position: Length, angle: f64) -> BpResult<Self> {
        if !position.is_finite() {
            return Err(BeamPathError::Trace(
                "initial ray position must be finite".into(),
            ));
        }
        if !angle.is_finite() {
            return Err(BeamPathError::Trace(
                "initial ray angle must be finite".into(),
            ));
        }
        Ok(Self { x: position, theta: angle })
    }
    /// Create a ray from the position (in meter) and angle without further checks.
    pub(crate) fn from_si(x: f64, theta: f64) -> Self {
        Self {
            x: Length::new::<meter>(x),
            theta,
        }
    }
    /// Returns the transverse position of this [`ParaxialRay`].
    #[must_use]
    pub const fn position(&self) -> Length {
        self.x
    }
    /// Returns the propagation angle (slope) of this [`ParaxialRay`].
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.theta
    }
    /// Propagate the ray freely over the given distance along the optical axis.
    ///
    /// # Errors
    ///
    /// This function will return an error if the distance is negative or not finite.
    pub fn propagate(&mut self, distance: Length) -> BpResult<()> {
        *self = RayTransferMatrix::free_space(distance)?.apply(self);
        Ok(())
    }
    /// Refract the ray on an ideal thin lens of the given focal length.
    ///
    /// Only the angle changes (`θ' = θ - x/f`), the position stays the same.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given focal length is zero or not finite.
    pub fn refract_paraxial(&mut self, focal_length: Length) -> BpResult<()> {
        *self = RayTransferMatrix::thin_lens(focal_length)?.apply(self);
        Ok(())
    }
    /// Returns the ray after passing an element described by the given [`RayTransferMatrix`].
    #[must_use]
    pub fn transformed(&self, matrix: &RayTransferMatrix) -> Self {
        matrix.apply(self)
    }
}
impl Display for ParaxialRay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_length = Length::format_args(millimeter, Abbreviation);
        write!(
            f,
            "x: {:.3}, theta: {:.6}",
            fmt_length.with(self.x),
            self.theta
        )
    }
}
