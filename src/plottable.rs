#![warn(missing_docs)]
//! Plotting of traced beam paths.
//!
//! All rays are drawn into one chart: the optical axis `z` horizontally and the transverse position `x` vertically.
//! Each ray is shown as a connected line with a marker at each sample.
use std::path::{Path, PathBuf};

use approx::{abs_diff_ne, RelativeEq};
use log::{info, warn};
use plotters::{
    coord::Shift,
    prelude::{
        BitMapBackend, ChartBuilder, Circle, DrawingArea, DrawingBackend, IntoDrawingArea,
        LineSeries, SVGBackend,
    },
    style::{Color, Palette, Palette99, WHITE},
};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{
    error::{BeamPathError, BpResult},
    session::Renderer,
    tracer::TracePath,
};

/// Title of the beam path chart
pub const PLOT_TITLE: &str = "Interactive Beam Path";
/// Label of the horizontal axis
pub const Z_LABEL: &str = "Optical Axis (z) [m]";
/// Label of the vertical axis
pub const X_LABEL: &str = "Transverse Position (x) [m]";

/// Plotting backend, selected by the file extension of the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum PltBackEnd {
    /// Scalable vector graphics (`.svg`)
    SVG,
    /// Bitmap image (`.png`, `.bmp`)
    BMP,
}
impl PltBackEnd {
    /// Returns the file extensions handled by this backend.
    #[must_use]
    pub const fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::SVG => &["svg"],
            Self::BMP => &["png", "bmp"],
        }
    }
    /// Determine the backend from the extension of the given file path.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file has no or an unsupported extension.
    pub fn from_path(path: &Path) -> BpResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        Self::iter()
            .find(|backend| backend.extensions().contains(&extension.as_str()))
            .ok_or_else(|| {
                let supported: Vec<&str> = Self::iter()
                    .flat_map(|b| b.extensions().iter().copied())
                    .collect();
                BeamPathError::Plot(format!(
                    "unsupported plot file extension of {}. Supported extensions: {}",
                    path.display(),
                    supported.join(", ")
                ))
            })
    }
}

/// Lower and upper limit of a plot axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxLims {
    /// minimum value of the axis
    pub min: f64,
    /// maximum value of the axis
    pub max: f64,
}
impl AxLims {
    /// Creates new [`AxLims`].
    ///
    /// Returns `None` if one of the values is not finite or `min` is not smaller than `max`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Option<Self> {
        let axlim = Self { min, max };
        if axlim.check_validity() {
            Some(axlim)
        } else {
            warn!("Invalid ax limit! Must be finite, not equal and min must be smaller than max!");
            None
        }
    }
    /// Returns true if both limits are finite and `min < max`.
    #[must_use]
    pub fn check_validity(self) -> bool {
        self.max.is_finite()
            && self.min.is_finite()
            && abs_diff_ne!(self.max, self.min)
            && self.max > self.min
    }
    /// Create valid [`AxLims`] from arbitrary values.
    ///
    /// Non-finite values are ignored, swapped limits are reordered and a (nearly) empty range is widened, so that the
    /// axis always spans some distance.
    #[must_use]
    pub fn create_useful_axlims(min_in: f64, max_in: f64) -> Option<Self> {
        if !min_in.is_finite() && !max_in.is_finite() {
            return Self::new(-0.5, 0.5);
        }
        let (min, max) = if !min_in.is_finite() {
            (max_in, max_in)
        } else if !max_in.is_finite() {
            (min_in, min_in)
        } else {
            (min_in, max_in)
        };
        let (mut min, mut max) = if max < min { (max, min) } else { (min, max) };
        let mut ax_range = max - min;
        // degenerate range: span the magnitude of the value itself
        if max.relative_eq(&min, f64::EPSILON, f64::EPSILON) {
            ax_range = max.abs();
            min = max - ax_range / 2.;
            max += ax_range / 2.;
        }
        if ax_range < f64::EPSILON {
            max = 0.5;
            min = -0.5;
        }
        Self::new(min, max)
    }
    /// Create [`AxLims`] covering all finite values of the given data.
    #[must_use]
    pub fn from_data(data: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min, max) = data
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
                (min.min(v), max.max(v))
            });
        Self::create_useful_axlims(min, max)
    }
    /// Widen the range by the given factor. Each limit is shifted by `range * (expansion_factor - 1) / 2`.
    pub fn expand_lim_range_by_factor(&mut self, expansion_factor: f64) {
        if expansion_factor.is_normal() && expansion_factor.is_sign_positive() {
            let range = self.max - self.min;
            self.max += range * (expansion_factor - 1.) / 2.;
            self.min -= range * (expansion_factor - 1.) / 2.;
        } else {
            warn!("Cannot expand ax limits! Expansion factor must be normal and positive!");
        }
    }
}

/// Returns the axis limits `(z, x)` needed to show all given paths.
///
/// The transverse range is widened by 10 % so that the outermost rays do not touch the frame.
#[must_use]
pub fn plot_bounds(paths: &[TracePath]) -> (AxLims, AxLims) {
    let fallback = AxLims {
        min: -0.5,
        max: 0.5,
    };
    let z_lims = AxLims::from_data(paths.iter().flat_map(TracePath::z_in_meter)).unwrap_or(fallback);
    let mut x_lims =
        AxLims::from_data(paths.iter().flat_map(TracePath::x_in_meter)).unwrap_or(fallback);
    x_lims.expand_lim_range_by_factor(1.1);
    (z_lims, x_lims)
}

fn plot_error(e: impl std::fmt::Display) -> BeamPathError {
    BeamPathError::Plot(e.to_string())
}

fn draw_paths<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    paths: &[TracePath],
) -> BpResult<()> {
    root.fill(&WHITE).map_err(plot_error)?;
    let (z_lims, x_lims) = plot_bounds(paths);
    let mut chart = ChartBuilder::on(root)
        .caption(PLOT_TITLE, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(z_lims.min..z_lims.max, x_lims.min..x_lims.max)
        .map_err(plot_error)?;
    chart
        .configure_mesh()
        .x_desc(Z_LABEL)
        .y_desc(X_LABEL)
        .draw()
        .map_err(plot_error)?;
    for (idx, path) in paths.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(f64, f64)> = path
            .z_in_meter()
            .into_iter()
            .zip(path.x_in_meter())
            .collect();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color))
            .map_err(plot_error)?;
        chart
            .draw_series(points.iter().map(|p| Circle::new(*p, 3, color.filled())))
            .map_err(plot_error)?;
    }
    root.present().map_err(plot_error)
}

/// A [`Renderer`] writing the beam paths as a chart into an image file.
#[derive(Debug, Clone)]
pub struct PlotRenderer {
    file_path: PathBuf,
    backend: PltBackEnd,
    fig_size: (u32, u32),
}
impl PlotRenderer {
    /// Creates a new [`PlotRenderer`] for the given file. The backend is selected from the file extension.
    ///
    /// # Errors
    ///
    /// This function will return an error if the extension is not supported.
    pub fn new(file_path: &Path) -> BpResult<Self> {
        Ok(Self {
            backend: PltBackEnd::from_path(file_path)?,
            file_path: file_path.to_path_buf(),
            fig_size: (800, 600),
        })
    }
    /// Set the size of the image in pixels (width, height).
    ///
    /// # Errors
    ///
    /// This function will return an error if width or height is zero.
    pub fn set_fig_size(&mut self, width: u32, height: u32) -> BpResult<()> {
        if width == 0 || height == 0 {
            return Err(BeamPathError::Plot(
                "figure size must be larger than zero".into(),
            ));
        }
        self.fig_size = (width, height);
        Ok(())
    }
    /// Returns the path of the output file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
    /// Returns the backend of this [`PlotRenderer`].
    #[must_use]
    pub const fn backend(&self) -> PltBackEnd {
        self.backend
    }
}
impl Renderer for PlotRenderer {
    fn render(&mut self, paths: &[TracePath]) -> BpResult<()> {
        match self.backend {
            PltBackEnd::SVG => {
                let root = SVGBackend::new(&self.file_path, self.fig_size).into_drawing_area();
                draw_paths(&root, paths)?;
            }
            PltBackEnd::BMP => {
                let root = BitMapBackend::new(&self.file_path, self.fig_size).into_drawing_area();
                draw_paths(&root, paths)?;
            }
        }
        info!("Plot written to {}", self.file_path.display());
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::{element::OpticalElement, meter, sweep::BeamSweep, system::OpticalSystem};
    use approx::assert_relative_eq;
    use assert_matches::assert_matches;
    use tempfile::NamedTempFile;

    fn reference_paths() -> Vec<TracePath> {
        let system = OpticalSystem::new(vec![
            OpticalElement::free_space(meter!(0.1)).unwrap(),
            OpticalElement::thin_lens(meter!(0.025)).unwrap(),
            OpticalElement::free_space(meter!(0.05)).unwrap(),
        ])
        .unwrap();
        BeamSweep::default().trace(&system).unwrap()
    }
    #[test]
    fn backend_from_path() {
        assert_eq!(
            PltBackEnd::from_path(Path::new("plot.svg")).unwrap(),
            PltBackEnd::SVG
        );
        assert_eq!(
            PltBackEnd::from_path(Path::new("plot.PNG")).unwrap(),
            PltBackEnd::BMP
        );
        assert_eq!(
            PltBackEnd::from_path(Path::new("./dir/plot.bmp")).unwrap(),
            PltBackEnd::BMP
        );
        assert_matches!(
            PltBackEnd::from_path(Path::new("plot.pdf")),
            Err(BeamPathError::Plot(_))
        );
        assert!(PltBackEnd::from_path(Path::new("plot")).is_err());
    }
    #[test]
    fn axlims_new() {
        assert!(AxLims::new(0., 1.).is_some());
        assert!(AxLims::new(1., 0.).is_none());
        assert!(AxLims::new(1., 1.).is_none());
        assert!(AxLims::new(f64::NAN, 1.).is_none());
        assert!(AxLims::new(0., f64::INFINITY).is_none());
    }
    #[test]
    fn create_useful_axlims() {
        let axlim = AxLims::create_useful_axlims(0., 1.).unwrap();
        assert_relative_eq!(axlim.min, 0.);
        assert_relative_eq!(axlim.max, 1.);
        let axlim = AxLims::create_useful_axlims(1., 0.).unwrap();
        assert_relative_eq!(axlim.min, 0.);
        assert_relative_eq!(axlim.max, 1.);
        let axlim = AxLims::create_useful_axlims(2., 2.).unwrap();
        assert_relative_eq!(axlim.min, 1.);
        assert_relative_eq!(axlim.max, 3.);
        let axlim = AxLims::create_useful_axlims(0., 0.).unwrap();
        assert_relative_eq!(axlim.min, -0.5);
        assert_relative_eq!(axlim.max, 0.5);
        let axlim = AxLims::create_useful_axlims(f64::NAN, f64::INFINITY).unwrap();
        assert_relative_eq!(axlim.min, -0.5);
        assert_relative_eq!(axlim.max, 0.5);
        let axlim = AxLims::create_useful_axlims(f64::NAN, 1.).unwrap();
        assert_relative_eq!(axlim.min, 0.5);
        assert_relative_eq!(axlim.max, 1.5);
    }
    #[test]
    fn from_data() {
        let axlim = AxLims::from_data([0.3, -0.1, f64::NAN, 0.2]).unwrap();
        assert_relative_eq!(axlim.min, -0.1);
        assert_relative_eq!(axlim.max, 0.3);
        let axlim = AxLims::from_data([]).unwrap();
        assert_relative_eq!(axlim.min, -0.5);
        assert_relative_eq!(axlim.max, 0.5);
    }
    #[test]
    fn expand_lim_range_by_factor() {
        testing_logger::setup();
        let mut axlim = AxLims::new(0., 1.).unwrap();
        axlim.expand_lim_range_by_factor(2.);
        assert_relative_eq!(axlim.min, -0.5);
        assert_relative_eq!(axlim.max, 1.5);
        axlim.expand_lim_range_by_factor(-1.);
        assert_relative_eq!(axlim.min, -0.5);
        assert_relative_eq!(axlim.max, 1.5);
        crate::utils::test_helper::test_helper::check_warnings(&[
            "Cannot expand ax limits! Expansion factor must be normal and positive!",
        ]);
    }
    #[test]
    fn bounds() {
        let (z_lims, x_lims) = plot_bounds(&reference_paths());
        assert_relative_eq!(z_lims.min, 0.0);
        assert_relative_eq!(z_lims.max, 0.15, epsilon = 1e-12);
        assert!(x_lims.min < -0.02);
        assert!(x_lims.max > 0.02);
        let (z_lims, x_lims) = plot_bounds(&[]);
        assert_relative_eq!(z_lims.min, -0.5);
        assert_relative_eq!(x_lims.max, 0.55);
    }
    #[test]
    fn renderer_new() {
        let renderer = PlotRenderer::new(Path::new("beam.svg")).unwrap();
        assert_eq!(renderer.backend(), PltBackEnd::SVG);
        assert_eq!(renderer.file_path(), Path::new("beam.svg"));
        assert!(PlotRenderer::new(Path::new("beam.txt")).is_err());
        let mut renderer = PlotRenderer::new(Path::new("beam.png")).unwrap();
        assert!(renderer.set_fig_size(0, 100).is_err());
        assert!(renderer.set_fig_size(400, 300).is_ok());
    }
    #[test]
    fn render_svg() {
        let file = NamedTempFile::with_suffix(".svg").unwrap();
        let mut renderer = PlotRenderer::new(file.path()).unwrap();
        renderer.render(&reference_paths()).unwrap();
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.starts_with("<svg"));
        assert!(contents.contains(PLOT_TITLE));
    }
}
