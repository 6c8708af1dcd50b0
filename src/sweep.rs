#![warn(missing_docs)]
//! Tracing of a small bundle of rays ("beam") through an optical system.
//!
//! A [`BeamSweep`] samples the beam width at a fixed set of initial transverse positions `x0`. All rays share a common
//! divergence: the initial angle of each ray is proportional to its position (`θ0 = k * x0`).
use itertools_num::linspace;
use log::info;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::meter};

use crate::{
    error::{BeamPathError, BpResult},
    system::OpticalSystem,
    tracer::{TracePath, Tracer},
};

/// The initial conditions of a bundle of rays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSweep {
    x0_values: Vec<Length>,
    /// divergence constant `k` in rad/m
    divergence: f64,
}
impl BeamSweep {
    /// Creates a new [`BeamSweep`] from the given initial positions and the divergence constant `k` (in rad/m).
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the positions or the divergence constant is not finite.
    pub fn new(x0_values: Vec<Length>, divergence: f64) -> BpResult<Self> {
        if !divergence.is_finite() {
            return Err(BeamPathError::Config(
                "divergence constant must be finite".into(),
            ));
        }
        if x0_values.iter().any(|x0| !x0.is_finite()) {
            return Err(BeamPathError::Config(
                "initial ray positions must be finite".into(),
            ));
        }
        Ok(Self {
            x0_values,
            divergence,
        })
    }
    /// Creates a new [`BeamSweep`] with `number_of_rays` positions evenly spaced in the range `[-half_width, half_width]`.
    ///
    /// A single ray is placed on the optical axis.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the number of rays is zero.
    ///   - the half width is negative or not finite.
    ///   - the divergence constant is not finite.
    pub fn linspace(half_width: Length, number_of_rays: usize, divergence: f64) -> BpResult<Self> {
        if number_of_rays == 0 {
            return Err(BeamPathError::Config(
                "number of rays must be at least 1".into(),
            ));
        }
        if !half_width.is_finite() || half_width.is_sign_negative() {
            return Err(BeamPathError::Config(
                "beam half width must be >= 0.0 and finite".into(),
            ));
        }
        let x0_values = if number_of_rays == 1 {
            vec![Length::new::<meter>(0.0)]
        } else {
            let half_width = half_width.get::<meter>();
            linspace(-half_width, half_width, number_of_rays)
                .map(Length::new::<meter>)
                .collect()
        };
        Self::new(x0_values, divergence)
    }
    /// Returns the initial transverse positions of this [`BeamSweep`].
    #[must_use]
    pub fn x0_values(&self) -> &[Length] {
        &self.x0_values
    }
    /// Returns the divergence constant `k` (in rad/m) of this [`BeamSweep`].
    #[must_use]
    pub const fn divergence(&self) -> f64 {
        self.divergence
    }
    /// Returns the initial conditions `(x0, θ0)` of all rays.
    #[must_use]
    pub fn initial_rays(&self) -> Vec<(Length, f64)> {
        self.x0_values
            .iter()
            .map(|x0| (*x0, self.divergence * x0.get::<meter>()))
            .collect()
    }
    /// Trace all rays of this [`BeamSweep`] through the given [`OpticalSystem`].
    ///
    /// This function returns one [`TracePath`] per initial position (in the order of the positions).
    ///
    /// # Errors
    ///
    /// This function will return an error if the system contains invalid elements.
    pub fn trace(&self, system: &OpticalSystem) -> BpResult<Vec<TracePath>> {
        let tracer = Tracer::new(system)?;
        info!(
            "Tracing {} rays through {} elements.",
            self.x0_values.len(),
            system.elements().len()
        );
        self.initial_rays()
            .into_iter()
            .map(|(x0, theta0)| tracer.trace(x0, theta0))
            .collect()
    }
}
impl Default for BeamSweep {
    /// Five rays evenly spaced between -20 mm and 20 mm with a divergence constant of 1 rad/m.
    fn default() -> Self {
        Self {
            x0_values: [-0.02, -0.01, 0.0, 0.01, 0.02]
                .into_iter()
                .map(Length::new::<meter>)
                .collect(),
            divergence: 1.0,
        }
    }
}
