#![warn(missing_docs)]
//! The configuration surface of the beam path visualization.
//!
//! A [`BeamPathConfig`] holds the current values of all user controls: per lens an enable flag, a focal length and the
//! distance in front of the lens, a trailing distance to the observation plane and the sampling of the beam. All
//! continuous values are bounded [`Control`]s.
//!
//! The configuration is mutable and owned by the user interface. For each recomputation an immutable
//! [`OpticalSystem`] and [`BeamSweep`] is derived from it.
use std::{
    fmt::Display,
    fs::{self, File},
    io::Write,
    path::Path,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::meter};

use crate::{
    element::OpticalElement,
    error::{BeamPathError, BpResult},
    meter,
    sweep::BeamSweep,
    system::OpticalSystem,
};

/// A bounded, continuous control value (such as a slider).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Control {
    min: Length,
    max: Length,
    value: Length,
}
impl Control {
    /// Creates a new [`Control`] with the range `[min, max]` and the initial `value`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - one of the values is not finite.
    ///   - `min` is larger than `max`.
    ///   - the initial value is outside the range.
    pub fn new(min: Length, max: Length, value: Length) -> BpResult<Self> {
        let control = Self { min, max, value };
        control.validate()?;
        Ok(control)
    }
    /// Check the consistency of this [`Control`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the bounds are not finite or not ordered or the value lies outside the bounds.
    pub fn validate(&self) -> BpResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || !self.value.is_finite() {
            return Err(BeamPathError::Config(
                "control bounds and value must be finite".into(),
            ));
        }
        if self.min > self.max {
            return Err(BeamPathError::Config(format!(
                "control minimum ({} m) must not be larger than its maximum ({} m)",
                self.min.value, self.max.value
            )));
        }
        if self.value < self.min || self.value > self.max {
            return Err(BeamPathError::Config(format!(
                "control value ({} m) outside range [{} m, {} m]",
                self.value.value, self.min.value, self.max.value
            )));
        }
        Ok(())
    }
    /// Returns the current value of this [`Control`].
    #[must_use]
    pub const fn value(&self) -> Length {
        self.value
    }
    /// Returns the lower bound of this [`Control`].
    #[must_use]
    pub const fn min(&self) -> Length {
        self.min
    }
    /// Returns the upper bound of this [`Control`].
    #[must_use]
    pub const fn max(&self) -> Length {
        self.max
    }
    /// Sets the value of this [`Control`].
    ///
    /// Values outside the range are clamped to the nearest bound. The value actually set is returned.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given value is not finite. In this case the control is not modified.
    pub fn set_value(&mut self, value: Length) -> BpResult<Length> {
        if !value.is_finite() {
            return Err(BeamPathError::Config("control value must be finite".into()));
        }
        let clamped = if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        };
        if clamped != value {
            warn!(
                "value {} m outside range [{} m, {} m]. Clamped to {} m",
                value.value, self.min.value, self.max.value, clamped.value
            );
        }
        self.value = clamped;
        Ok(clamped)
    }
}

/// The controls of a single lens together with the gap in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensControl {
    /// true if the lens is part of the optical system
    pub enabled: bool,
    /// distance from the previous element (or the source plane) to this lens
    pub distance: Control,
    /// focal length of this lens
    pub focal_length: Control,
}
impl LensControl {
    /// Creates a new, enabled [`LensControl`] using the reference ranges (`[5 mm, 200 mm]` for the distance and
    /// `[-50 mm, 50 mm]` for the focal length).
    ///
    /// # Errors
    ///
    /// This function will return an error if the given values are outside these ranges.
    pub fn new(distance: Length, focal_length: Length) -> BpResult<Self> {
        Ok(Self {
            enabled: true,
            distance: distance_control(distance)?,
            focal_length: Control::new(meter!(-0.05), meter!(0.05), focal_length)?,
        })
    }
}

fn distance_control(value: Length) -> BpResult<Control> {
    Control::new(meter!(0.005), meter!(0.2), value)
}

/// The sampling of the beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    /// number of rays
    pub number_of_rays: usize,
    /// rays are evenly spaced in the range `[-half_width, half_width]`
    pub half_width: Length,
    /// divergence constant `k` in rad/m. The initial ray angle is `k * x0`.
    pub divergence: f64,
}
impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            number_of_rays: 5,
            half_width: meter!(0.02),
            divergence: 1.0,
        }
    }
}

/// The complete, user adjustable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamPathConfig {
    lenses: Vec<LensControl>,
    final_distance: Control,
    #[serde(default)]
    beam: BeamConfig,
}
impl Default for BeamPathConfig {
    /// Create the reference configuration
    ///   - two enabled lenses with a focal length of 25 mm
    ///   - distances 100 mm, 50 mm and a final distance of 50 mm
    ///   - 5 rays in the range [-20 mm, 20 mm] with a divergence constant of 1 rad/m
    fn default() -> Self {
        Self {
            lenses: vec![
                LensControl {
                    enabled: true,
                    distance: Control {
                        min: meter!(0.005),
                        max: meter!(0.2),
                        value: meter!(0.1),
                    },
                    focal_length: Control {
                        min: meter!(-0.05),
                        max: meter!(0.05),
                        value: meter!(0.025),
                    },
                },
                LensControl {
                    enabled: true,
                    distance: Control {
                        min: meter!(0.005),
                        max: meter!(0.2),
                        value: meter!(0.05),
                    },
                    focal_length: Control {
                        min: meter!(-0.05),
                        max: meter!(0.05),
                        value: meter!(0.025),
                    },
                },
            ],
            final_distance: Control {
                min: meter!(0.005),
                max: meter!(0.2),
                value: meter!(0.05),
            },
            beam: BeamConfig::default(),
        }
    }
}
impl BeamPathConfig {
    /// Creates a new [`BeamPathConfig`] from the given lenses, final distance and beam sampling.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the controls or the beam configuration is inconsistent.
    pub fn new(lenses: Vec<LensControl>, final_distance: Control, beam: BeamConfig) -> BpResult<Self> {
        let config = Self {
            lenses,
            final_distance,
            beam,
        };
        config.validate()?;
        Ok(config)
    }
    /// Read a [`BeamPathConfig`] from a file.
    ///
    /// Files with the extension `json` are parsed as JSON, all others as YAML.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the file cannot be read.
    ///   - the parsing failed.
    ///   - the configuration is inconsistent.
    pub fn from_file(path: &Path) -> BpResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            BeamPathError::Config(format!("cannot read file {} : {}", path.display(), e))
        })?;
        let config = if is_json(path) {
            let config: Self = serde_json::from_str(&contents).map_err(|e| {
                BeamPathError::Config(format!("parsing of configuration failed: {e}"))
            })?;
            config.validate()?;
            config
        } else {
            Self::from_yaml_str(&contents)?
        };
        info!("Read configuration from {}", path.display());
        Ok(config)
    }
    /// Create a [`BeamPathConfig`] from a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parsing failed or the configuration is inconsistent.
    pub fn from_yaml_str(yaml: &str) -> BpResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| BeamPathError::Config(format!("parsing of configuration failed: {e}")))?;
        config.validate()?;
        Ok(config)
    }
    /// Serialize this [`BeamPathConfig`] into a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization failed.
    pub fn to_yaml_string(&self) -> BpResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| BeamPathError::Config(format!("serialization of configuration failed: {e}")))
    }
    /// Save this [`BeamPathConfig`] to a file.
    ///
    /// Files with the extension `json` are written as JSON, all others as YAML.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the serialization failed.
    ///   - the file cannot be created or written.
    pub fn save_to_file(&self, path: &Path) -> BpResult<()> {
        let serialized = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| {
                BeamPathError::Config(format!("serialization of configuration failed: {e}"))
            })?
        } else {
            self.to_yaml_string()?
        };
        let mut output = File::create(path).map_err(|e| {
            BeamPathError::Config(format!(
                "could not create file path: {}: {}",
                path.display(),
                e
            ))
        })?;
        write!(output, "{serialized}").map_err(|e| {
            BeamPathError::Config(format!(
                "writing to file path {} failed: {}",
                path.display(),
                e
            ))
        })?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
    /// Check the consistency of all controls and the beam configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if a control or the beam configuration is inconsistent.
    pub fn validate(&self) -> BpResult<()> {
        for (idx, lens) in self.lenses.iter().enumerate() {
            lens.distance
                .validate()
                .and_then(|()| lens.focal_length.validate())
                .map_err(|e| BeamPathError::Config(format!("lens #{}: {e}", idx + 1)))?;
            if lens.distance.min.value < 0.0 {
                return Err(BeamPathError::Config(format!(
                    "lens #{}: distance must not be negative",
                    idx + 1
                )));
            }
        }
        self.final_distance
            .validate()
            .map_err(|e| BeamPathError::Config(format!("final distance: {e}")))?;
        if self.final_distance.min.value < 0.0 {
            return Err(BeamPathError::Config(
                "final distance must not be negative".into(),
            ));
        }
        BeamSweep::linspace(
            self.beam.half_width,
            self.beam.number_of_rays,
            self.beam.divergence,
        )?;
        Ok(())
    }
    /// Returns the lens controls of this [`BeamPathConfig`].
    #[must_use]
    pub fn lenses(&self) -> &[LensControl] {
        &self.lenses
    }
    /// Returns the number of lenses (enabled or not).
    #[must_use]
    pub fn number_of_lenses(&self) -> usize {
        self.lenses.len()
    }
    /// Returns the control of the distance from the last lens to the observation plane.
    #[must_use]
    pub const fn final_distance(&self) -> &Control {
        &self.final_distance
    }
    /// Returns the beam configuration.
    #[must_use]
    pub const fn beam(&self) -> &BeamConfig {
        &self.beam
    }
    /// Append a lens (with the gap in front of it) to the end of the lens train.
    pub fn add_lens(&mut self, lens: LensControl) {
        self.lenses.push(lens);
    }
    fn lens_mut(&mut self, index: usize) -> BpResult<&mut LensControl> {
        let number_of_lenses = self.lenses.len();
        self.lenses.get_mut(index).ok_or_else(|| {
            BeamPathError::Config(format!(
                "lens index {index} out of range (number of lenses: {number_of_lenses})"
            ))
        })
    }
    /// Set the distance of the gap with the given `index`.
    ///
    /// Gap `i` (for `i < number_of_lenses`) is located in front of lens `i`. The gap with index `number_of_lenses` is the
    /// final distance to the observation plane. The value is clamped to the range of the control. The value actually set
    /// is returned.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range or the distance is not finite.
    pub fn set_distance(&mut self, index: usize, distance: Length) -> BpResult<Length> {
        if index == self.lenses.len() {
            self.final_distance.set_value(distance)
        } else {
            self.lens_mut(index)?.distance.set_value(distance)
        }
    }
    /// Set the focal length of the lens with the given `index`.
    ///
    /// The value is clamped to the range of the control. The value actually set is returned. **Note**: A focal length
    /// of zero is accepted by the control but leads to an error while creating the optical system.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range or the focal length is not finite.
    pub fn set_focal_length(&mut self, index: usize, focal_length: Length) -> BpResult<Length> {
        self.lens_mut(index)?.focal_length.set_value(focal_length)
    }
    /// Toggle the enable flag of the lens with the given `index` and return the new state.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is out of range.
    pub fn toggle_lens(&mut self, index: usize) -> BpResult<bool> {
        let lens = self.lens_mut(index)?;
        lens.enabled = !lens.enabled;
        Ok(lens.enabled)
    }
    /// Set the divergence constant `k` (in rad/m) of the beam.
    ///
    /// # Errors
    ///
    /// This function will return an error if the value is not finite.
    pub fn set_divergence(&mut self, divergence: f64) -> BpResult<()> {
        if !divergence.is_finite() {
            return Err(BeamPathError::Config(
                "divergence constant must be finite".into(),
            ));
        }
        self.beam.divergence = divergence;
        Ok(())
    }
    /// Set the beam sampling: the number of rays and the half width of the sampled range.
    ///
    /// # Errors
    ///
    /// This function will return an error if the number of rays is zero or the half width is negative or not finite.
    /// In this case the configuration is not modified.
    pub fn set_beam(&mut self, number_of_rays: usize, half_width: Length) -> BpResult<()> {
        BeamSweep::linspace(half_width, number_of_rays, self.beam.divergence)?;
        self.beam.number_of_rays = number_of_rays;
        self.beam.half_width = half_width;
        Ok(())
    }
    /// Returns the element slots in the order a ray encounters them.
    ///
    /// The slots are `[gap 1, lens 1, gap 2, lens 2, ..., final gap]`. Disabled lenses are represented by `None`.
    /// The gap in front of a disabled lens is kept.
    ///
    /// # Errors
    ///
    /// This function will return an error if an enabled lens has an invalid focal length (e.g. zero) or a gap is invalid.
    pub fn slots(&self) -> BpResult<Vec<Option<OpticalElement>>> {
        let mut slots = Vec::with_capacity(2 * self.lenses.len() + 1);
        for (idx, lens) in self.lenses.iter().enumerate() {
            slots.push(Some(OpticalElement::free_space(lens.distance.value())?));
            let element = if lens.enabled {
                Some(
                    OpticalElement::thin_lens(lens.focal_length.value()).map_err(|e| {
                        BeamPathError::Element(format!("lens #{}: {e}", idx + 1))
                    })?,
                )
            } else {
                None
            };
            slots.push(element);
        }
        slots.push(Some(OpticalElement::free_space(
            self.final_distance.value(),
        )?));
        Ok(slots)
    }
    /// Create an (immutable) [`OpticalSystem`] from the current control values.
    ///
    /// # Errors
    ///
    /// This function will return an error if an enabled lens has an invalid focal length (e.g. zero).
    pub fn to_system(&self) -> BpResult<OpticalSystem> {
        OpticalSystem::from_slots(&self.slots()?)
    }
    /// Create the [`BeamSweep`] from the current beam configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if the beam configuration is invalid.
    pub fn beam_sweep(&self) -> BpResult<BeamSweep> {
        BeamSweep::linspace(
            self.beam.half_width,
            self.beam.number_of_rays,
            self.beam.divergence,
        )
    }
}
fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
impl Display for BeamPathConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, lens) in self.lenses.iter().enumerate() {
            writeln!(
                f,
                "d{}: {:.4} m [{:.4}, {:.4}]",
                idx + 1,
                lens.distance.value().get::<meter>(),
                lens.distance.min().get::<meter>(),
                lens.distance.max().get::<meter>()
            )?;
            writeln!(
                f,
                "f{}: {:.4} m [{:.4}, {:.4}] ({})",
                idx + 1,
                lens.focal_length.value().get::<meter>(),
                lens.focal_length.min().get::<meter>(),
                lens.focal_length.max().get::<meter>(),
                if lens.enabled { "enabled" } else { "disabled" }
            )?;
        }
        writeln!(
            f,
            "d{}: {:.4} m [{:.4}, {:.4}] (final)",
            self.lenses.len() + 1,
            self.final_distance.value().get::<meter>(),
            self.final_distance.min().get::<meter>(),
            self.final_distance.max().get::<meter>()
        )?;
        write!(
            f,
            "beam: {} rays, half width {:.4} m, k = {} rad/m",
            self.beam.number_of_rays,
            self.beam.half_width.get::<meter>(),
            self.beam.divergence
        )
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::test_helper::test_helper::check_warnings;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use tempfile::NamedTempFile;

    #[test]
    fn control_new() {
        let control = Control::new(meter!(0.0), meter!(1.0), meter!(0.5)).unwrap();
        assert_eq!(control.min(), meter!(0.0));
        assert_eq!(control.max(), meter!(1.0));
        assert_eq!(control.value(), meter!(0.5));
        assert!(Control::new(meter!(0.0), meter!(0.0), meter!(0.0)).is_ok());
        assert!(Control::new(meter!(1.0), meter!(0.0), meter!(0.5)).is_err());
        assert!(Control::new(meter!(0.0), meter!(1.0), meter!(1.5)).is_err());
        assert!(Control::new(meter!(0.0), meter!(1.0), meter!(-0.5)).is_err());
        assert!(Control::new(meter!(f64::NAN), meter!(1.0), meter!(0.5)).is_err());
        assert!(Control::new(meter!(0.0), meter!(f64::INFINITY), meter!(0.5)).is_err());
    }
    #[test]
    fn control_set_value() {
        testing_logger::setup();
        let mut control = Control::new(meter!(-1.0), meter!(1.0), meter!(0.0)).unwrap();
        assert_eq!(control.set_value(meter!(0.5)).unwrap(), meter!(0.5));
        assert_eq!(control.value(), meter!(0.5));
        check_warnings(&[]);
        assert_eq!(control.set_value(meter!(2.0)).unwrap(), meter!(1.0));
        check_warnings(&["value 2 m outside range [-1 m, 1 m]. Clamped to 1 m"]);
        assert_eq!(control.set_value(meter!(-3.0)).unwrap(), meter!(-1.0));
        check_warnings(&["value -3 m outside range [-1 m, 1 m]. Clamped to -1 m"]);
        assert!(control.set_value(meter!(f64::NAN)).is_err());
        assert_eq!(control.value(), meter!(-1.0));
    }
    #[test]
    fn lens_control_new() {
        let lens = LensControl::new(meter!(0.1), meter!(-0.02)).unwrap();
        assert!(lens.enabled);
        assert_eq!(lens.distance.value(), meter!(0.1));
        assert_eq!(lens.focal_length.value(), meter!(-0.02));
        assert!(LensControl::new(meter!(0.3), meter!(0.02)).is_err());
        assert!(LensControl::new(meter!(0.1), meter!(0.06)).is_err());
    }
    #[test]
    fn default() {
        let config = BeamPathConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.number_of_lenses(), 2);
        assert!(config.lenses().iter().all(|l| l.enabled));
        assert_eq!(config.lenses()[0].distance.value(), meter!(0.1));
        assert_eq!(config.lenses()[1].distance.value(), meter!(0.05));
        assert_eq!(config.final_distance().value(), meter!(0.05));
        assert_eq!(config.lenses()[0].focal_length.value(), meter!(0.025));
        assert_eq!(config.beam(), &BeamConfig::default());
        assert_eq!(
            config.lenses()[1],
            LensControl::new(meter!(0.05), meter!(0.025)).unwrap()
        );
    }
    #[test]
    fn new() {
        let lenses = vec![LensControl::new(meter!(0.1), meter!(0.02)).unwrap()];
        let final_distance = Control::new(meter!(0.0), meter!(1.0), meter!(0.3)).unwrap();
        let config = BeamPathConfig::new(lenses.clone(), final_distance, BeamConfig::default());
        assert!(config.is_ok());
        let final_distance = Control {
            min: meter!(-1.0),
            max: meter!(1.0),
            value: meter!(0.3),
        };
        assert!(BeamPathConfig::new(lenses.clone(), final_distance, BeamConfig::default()).is_err());
        let beam = BeamConfig {
            number_of_rays: 0,
            ..BeamConfig::default()
        };
        let final_distance = Control::new(meter!(0.0), meter!(1.0), meter!(0.3)).unwrap();
        assert!(BeamPathConfig::new(lenses, final_distance, beam).is_err());
    }
    #[test]
    fn slots() {
        let mut config = BeamPathConfig::default();
        let slots = config.slots().unwrap();
        assert_eq!(slots.len(), 5);
        assert!(slots.iter().all(Option::is_some));
        assert_eq!(
            slots[1],
            Some(OpticalElement::thin_lens(meter!(0.025)).unwrap())
        );
        config.toggle_lens(0).unwrap();
        let slots = config.slots().unwrap();
        assert_eq!(slots.len(), 5);
        assert_eq!(slots[1], None);
        assert_eq!(
            slots[0],
            Some(OpticalElement::free_space(meter!(0.1)).unwrap())
        );
    }
    #[test]
    fn to_system() {
        let mut config = BeamPathConfig::default();
        let system = config.to_system().unwrap();
        assert_eq!(system.number_of_lenses(), 2);
        assert_eq!(system.number_of_gaps(), 3);
        assert_abs_diff_eq!(system.total_length().value, 0.2);
        config.toggle_lens(1).unwrap();
        let system = config.to_system().unwrap();
        assert_eq!(system.number_of_lenses(), 1);
        assert_eq!(system.number_of_gaps(), 3);
        assert_abs_diff_eq!(system.total_length().value, 0.2);
    }
    #[test]
    fn zero_focal_length() {
        let mut config = BeamPathConfig::default();
        config.set_focal_length(0, meter!(0.0)).unwrap();
        assert_matches!(config.to_system(), Err(BeamPathError::Element(_)));
        // a disabled lens with zero focal length does not matter
        config.toggle_lens(0).unwrap();
        assert!(config.to_system().is_ok());
    }
    #[test]
    fn set_distance() {
        testing_logger::setup();
        let mut config = BeamPathConfig::default();
        assert_eq!(config.set_distance(0, meter!(0.15)).unwrap(), meter!(0.15));
        assert_eq!(config.lenses()[0].distance.value(), meter!(0.15));
        assert_eq!(config.set_distance(2, meter!(0.01)).unwrap(), meter!(0.01));
        assert_eq!(config.final_distance().value(), meter!(0.01));
        assert_eq!(config.set_distance(1, meter!(1.0)).unwrap(), meter!(0.2));
        check_warnings(&["value 1 m outside range [0.005 m, 0.2 m]. Clamped to 0.2 m"]);
        assert!(config.set_distance(3, meter!(0.1)).is_err());
        assert!(config.set_distance(0, meter!(f64::NAN)).is_err());
    }
    #[test]
    fn set_focal_length() {
        let mut config = BeamPathConfig::default();
        assert_eq!(
            config.set_focal_length(1, meter!(-0.03)).unwrap(),
            meter!(-0.03)
        );
        assert_eq!(config.lenses()[1].focal_length.value(), meter!(-0.03));
        assert_eq!(
            config.set_focal_length(1, meter!(-0.3)).unwrap(),
            meter!(-0.05)
        );
        assert!(config.set_focal_length(2, meter!(0.01)).is_err());
    }
    #[test]
    fn toggle_lens() {
        let mut config = BeamPathConfig::default();
        assert_eq!(config.toggle_lens(1).unwrap(), false);
        assert_eq!(config.toggle_lens(1).unwrap(), true);
        assert!(config.toggle_lens(2).is_err());
    }
    #[test]
    fn set_divergence() {
        let mut config = BeamPathConfig::default();
        config.set_divergence(-2.0).unwrap();
        assert_eq!(config.beam().divergence, -2.0);
        assert!(config.set_divergence(f64::NAN).is_err());
        assert_eq!(config.beam().divergence, -2.0);
    }
    #[test]
    fn set_beam() {
        let mut config = BeamPathConfig::default();
        config.set_beam(3, meter!(0.01)).unwrap();
        assert_eq!(config.beam().number_of_rays, 3);
        assert_eq!(config.beam().half_width, meter!(0.01));
        assert!(config.set_beam(0, meter!(0.01)).is_err());
        assert!(config.set_beam(3, meter!(-0.01)).is_err());
        assert_eq!(config.beam().number_of_rays, 3);
        let sweep = config.beam_sweep().unwrap();
        assert_eq!(sweep.x0_values().len(), 3);
    }
    #[test]
    fn add_lens() {
        let mut config = BeamPathConfig::default();
        config.add_lens(LensControl::new(meter!(0.02), meter!(-0.01)).unwrap());
        assert_eq!(config.number_of_lenses(), 3);
        let system = config.to_system().unwrap();
        assert_eq!(system.number_of_lenses(), 3);
        assert_eq!(system.number_of_gaps(), 4);
        assert_eq!(config.set_distance(3, meter!(0.1)).unwrap(), meter!(0.1));
        assert_eq!(config.final_distance().value(), meter!(0.1));
    }
    #[test]
    fn yaml_roundtrip() {
        let mut config = BeamPathConfig::default();
        config.toggle_lens(0).unwrap();
        let yaml = config.to_yaml_string().unwrap();
        let read = BeamPathConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(read, config);
    }
    #[test]
    fn from_yaml_str() {
        assert!(BeamPathConfig::from_yaml_str("no config").is_err());
        let yaml = "lenses:
  - enabled: true
    distance: {min: 0.0, max: 1.0, value: 0.5}
    focal_length: {min: -1.0, max: 1.0, value: 2.0}
final_distance: {min: 0.0, max: 1.0, value: 0.5}
";
        assert_matches!(
            BeamPathConfig::from_yaml_str(yaml),
            Err(BeamPathError::Config(_))
        );
        let yaml = "lenses:
  - enabled: true
    distance: {min: -1.0, max: 1.0, value: -0.5}
    focal_length: {min: -1.0, max: 1.0, value: 0.5}
final_distance: {min: 0.0, max: 1.0, value: 0.5}
";
        assert_matches!(
            BeamPathConfig::from_yaml_str(yaml),
            Err(BeamPathError::Config(_))
        );
        let yaml = "lenses: []
final_distance: {min: 0.0, max: 1.0, value: 0.5}
";
        let config = BeamPathConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.number_of_lenses(), 0);
        assert_eq!(config.beam(), &BeamConfig::default());
    }
    #[test]
    fn save_and_read_file() {
        let config = BeamPathConfig::default();
        for suffix in [".yaml", ".json"] {
            let file = NamedTempFile::with_suffix(suffix).unwrap();
            config.save_to_file(file.path()).unwrap();
            let read = BeamPathConfig::from_file(file.path()).unwrap();
            assert_eq!(read, config);
        }
        assert!(BeamPathConfig::from_file(Path::new("./this_file_does_not_exist.yaml")).is_err());
    }
    #[test]
    fn display() {
        let mut config = BeamPathConfig::default();
        config.toggle_lens(1).unwrap();
        assert_eq!(
            format!("{config}"),
            "d1: 0.1000 m [0.0050, 0.2000]
f1: 0.0250 m [-0.0500, 0.0500] (enabled)
d2: 0.0500 m [0.0050, 0.2000]
f2: 0.0250 m [-0.0500, 0.0500] (disabled)
d3: 0.0500 m [0.0050, 0.2000] (final)
beam: 5 rays, half width 0.0200 m, k = 1 rad/m"
        );
    }
}
