#![warn(missing_docs)]
//! The beam tracer.
//!
//! This module traces a single [`ParaxialRay`] through an ordered sequence of [`OpticalElement`]s using
//! ray-transfer matrices and records the transverse position of the ray at every axial location.
use log::debug;
use serde::{Deserialize, Serialize};
use uom::{
    num_traits::Zero,
    si::{f64::Length, length::meter},
};

use crate::{
    element::OpticalElement,
    error::{BeamPathError, BpResult},
    ray::ParaxialRay,
    system::OpticalSystem,
};

/// The sampled path of a single ray through an optical system.
///
/// A [`TracePath`] consists of two parallel sequences of equal length: the axial positions `z` and the transverse
/// positions `x` of the ray. It contains one sample at the start plane, one after each free-space segment and one
/// immediately after each lens. The latter shares the `z` value of the preceding sample, capturing the change of slope
/// at the lens without a change of position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracePath {
    z: Vec<Length>,
    x: Vec<Length>,
    final_ray: ParaxialRay,
}
impl TracePath {
    fn new(start: ParaxialRay, capacity: usize) -> Self {
        let mut path = Self {
            z: Vec::with_capacity(capacity),
            x: Vec::with_capacity(capacity),
            final_ray: start,
        };
        path.add_sample(Length::zero(), start);
        path
    }
    fn add_sample(&mut self, z: Length, ray: ParaxialRay) {
        self.z.push(z);
        self.x.push(ray.position());
        self.final_ray = ray;
    }
    /// Returns the axial positions of this [`TracePath`].
    #[must_use]
    pub fn z(&self) -> &[Length] {
        &self.z
    }
    /// Returns the transverse positions of this [`TracePath`].
    #[must_use]
    pub fn x(&self) -> &[Length] {
        &self.x
    }
    /// Returns the axial positions in meter.
    #[must_use]
    pub fn z_in_meter(&self) -> Vec<f64> {
        self.z.iter().map(|z| z.get::<meter>()).collect()
    }
    /// Returns the transverse positions in meter.
    #[must_use]
    pub fn x_in_meter(&self) -> Vec<f64> {
        self.x.iter().map(|x| x.get::<meter>()).collect()
    }
    /// Returns an iterator over all `(z, x)` samples.
    pub fn samples(&self) -> impl Iterator<Item = (Length, Length)> + '_ {
        self.z.iter().copied().zip(self.x.iter().copied())
    }
    /// Returns the number of samples of this [`TracePath`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.z.len()
    }
    /// Returns `true` if this [`TracePath`] contains no samples.
    ///
    /// **Note**: A path returned by the tracer always contains at least the start sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }
    /// Returns the ray state after the last element.
    #[must_use]
    pub const fn final_ray(&self) -> ParaxialRay {
        self.final_ray
    }
}

/// Trace a ray through an ordered sequence of optical elements.
///
/// The ray starts at `z = 0` with the transverse position `x0` and the angle `theta0`. For each free-space element the
/// ray is propagated and `z` advances by the element distance. For each thin lens the ray is refracted at the current `z`.
/// After each element a sample is recorded.
///
/// All preconditions are checked before the tracing starts. Hence, either the full path is computed or nothing.
///
/// # Errors
///
/// This function will return an error if
///   - `x0` or `theta0` is not finite.
///   - one of the elements is invalid (a zero or non-finite focal length, a negative or non-finite distance).
pub fn trace(x0: Length, theta0: f64, elements: &[OpticalElement]) -> BpResult<TracePath> {
    let ray = ParaxialRay::new(x0, theta0)?;
    for (idx, element) in elements.iter().enumerate() {
        element.validate().map_err(|e| {
            BeamPathError::Trace(format!("cannot trace through element #{idx}: {e}"))
        })?;
    }
    trace_validated(ray, elements)
}

fn trace_validated(mut ray: ParaxialRay, elements: &[OpticalElement]) -> BpResult<TracePath> {
    let mut path = TracePath::new(ray, elements.len() + 1);
    let mut z = Length::zero();
    for (idx, element) in elements.iter().enumerate() {
        element.apply(&mut ray)?;
        if !ray.position().is_finite() || !ray.angle().is_finite() {
            return Err(BeamPathError::Trace(format!(
                "ray left the representable range behind element #{idx} ({element})"
            )));
        }
        z += element.axial_length();
        path.add_sample(z, ray);
    }
    debug!(
        "traced ray ({}) through {} elements: {} samples",
        path.final_ray,
        elements.len(),
        path.len()
    );
    Ok(path)
}

/// A tracer bound to a fixed, already validated [`OpticalSystem`].
///
/// This is handy if many rays are traced through the same system (see [`BeamSweep`](crate::sweep::BeamSweep)).
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'a> {
    system: &'a OpticalSystem,
}
impl<'a> Tracer<'a> {
    /// Creates a new [`Tracer`] for the given system.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system contains invalid elements.
    pub fn new(system: &'a OpticalSystem) -> BpResult<Self> {
        system.validate()?;
        Ok(Self { system })
    }
    /// Trace a single ray with the given initial position and angle through the system.
    ///
    /// # Errors
    ///
    /// This function will return an error if `x0` or `theta0` is not finite.
    pub fn trace(&self, x0: Length, theta0: f64) -> BpResult<TracePath> {
        let ray = ParaxialRay::new(x0, theta0)?;
        trace_validated(ray, self.system.elements())
    }
}
