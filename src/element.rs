#![warn(missing_docs)]
//! The optical elements a paraxial beam may traverse.
//!
//! Only two kinds of elements exist: free-space gaps and ideal thin lenses. Both are described by a single
//! length and are checked for physical validity on construction.
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uom::{
    fmt::DisplayStyle::Abbreviation,
    num_traits::Zero,
    si::{f64::Length, length::millimeter},
};

use crate::{
    error::BpResult,
    ray::ParaxialRay,
    ray_transfer_matrix::{check_distance, check_focal_length, RayTransferMatrix},
};

/// An element of an [`OpticalSystem`](crate::system::OpticalSystem).
///
/// ## Invariants
///   - the `distance` of [`OpticalElement::FreeSpace`] is finite and >= 0.0. A zero distance represents coincident planes.
///   - the `focal_length` of [`OpticalElement::ThinLens`] is finite and != 0.0. A positive focal length corresponds to a
///     converging lens while a negative focal length represents a diverging lens.
///
/// Use the constructors [`OpticalElement::free_space`] and [`OpticalElement::thin_lens`], which enforce these invariants.
/// Elements created directly (or deserialized from a file) can be checked with [`OpticalElement::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OpticalElement {
    /// free-space propagation over the given distance along the optical axis
    FreeSpace {
        /// propagation distance
        distance: Length,
    },
    /// refraction at an ideal (infinitesimally thin, aberration free) lens
    ThinLens {
        /// focal length of the lens
        focal_length: Length,
    },
}
impl OpticalElement {
    /// Create a new free-space element of the given `distance`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the distance is negative or not finite.
    pub fn free_space(distance: Length) -> BpResult<Self> {
        check_distance(distance)?;
        Ok(Self::FreeSpace { distance })
    }
    /// Create a new thin lens with the given `focal_length`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the focal length is zero or not finite.
    pub fn thin_lens(focal_length: Length) -> BpResult<Self> {
        check_focal_length(focal_length)?;
        Ok(Self::ThinLens { focal_length })
    }
    /// Check the invariants of this [`OpticalElement`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the element violates its invariants (see [`OpticalElement`]).
    pub fn validate(&self) -> BpResult<()> {
        match self {
            Self::FreeSpace { distance } => check_distance(*distance),
            Self::ThinLens { focal_length } => check_focal_length(*focal_length),
        }
    }
    /// Returns the ray-transfer matrix of this [`OpticalElement`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the element violates its invariants.
    pub fn matrix(&self) -> BpResult<RayTransferMatrix> {
        match self {
            Self::FreeSpace { distance } => RayTransferMatrix::free_space(*distance),
            Self::ThinLens { focal_length } => RayTransferMatrix::thin_lens(*focal_length),
        }
    }
    /// Returns the length this element occupies along the optical axis.
    ///
    /// This is the `distance` for free space and zero for a thin lens.
    #[must_use]
    pub fn axial_length(&self) -> Length {
        match self {
            Self::FreeSpace { distance } => *distance,
            Self::ThinLens { .. } => Length::zero(),
        }
    }
    /// Returns `true` if this element is a thin lens.
    #[must_use]
    pub const fn is_lens(&self) -> bool {
        matches!(self, Self::ThinLens { .. })
    }
    /// Pass the given [`ParaxialRay`] through this element.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element violates its invariants.
    pub fn apply(&self, ray: &mut ParaxialRay) -> BpResult<()> {
        match self {
            Self::FreeSpace { distance } => ray.propagate(*distance),
            Self::ThinLens { focal_length } => ray.refract_paraxial(*focal_length),
        }
    }
}
impl Display for OpticalElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_length = Length::format_args(millimeter, Abbreviation);
        match self {
            Self::FreeSpace { distance } => {
                write!(f, "free space ({:.2})", fmt_length.with(*distance))
            }
            Self::ThinLens { focal_length } => {
                write!(f, "thin lens (f = {:.2})", fmt_length.with(*focal_length))
            }
        }
    }
}
