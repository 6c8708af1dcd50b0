//! Recompute-and-render cycle of the beam path visualization.
use log::{debug, info};

use crate::{config::BeamPathConfig, error::BpResult, tracer::TracePath};

/// Something which is able to present a set of traced rays (e.g. as a plot or a table).
pub trait Renderer {
    /// Present the given [`TracePath`]s. A new call supersedes all previously rendered paths.
    ///
    /// # Errors
    ///
    /// This function will return an error if the rendering failed.
    fn render(&mut self, paths: &[TracePath]) -> BpResult<()>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, paths: &[TracePath]) -> BpResult<()> {
        (**self).render(paths)
    }
}
/// Renders into all renderers in order. The first failure stops the cycle, so the renderers before it already show
/// the new paths. [`crate::console::run_shell`] re-renders the restored configuration in this case.
impl<R: Renderer> Renderer for Vec<R> {
    fn render(&mut self, paths: &[TracePath]) -> BpResult<()> {
        for renderer in self.iter_mut() {
            renderer.render(paths)?;
        }
        Ok(())
    }
}

/// Owner of the (mutable) configuration and the output [`Renderer`].
pub struct Session<R: Renderer> {
    config: BeamPathConfig,
    renderer: R,
    number_of_renders: usize,
}
impl<R: Renderer> Session<R> {
    /// Creates a new [`Session`]. Nothing is rendered until [`Session::configuration_changed`] is called.
    pub const fn new(config: BeamPathConfig, renderer: R) -> Self {
        Self {
            config,
            renderer,
            number_of_renders: 0,
        }
    }
    /// Returns a reference to the current configuration.
    pub const fn config(&self) -> &BeamPathConfig {
        &self.config
    }
    /// Returns a mutable reference to the configuration.
    ///
    /// Changes are not rendered until [`Session::configuration_changed`] is called.
    pub fn config_mut(&mut self) -> &mut BeamPathConfig {
        &mut self.config
    }
    /// Returns a reference to the renderer.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }
    /// Returns the number of successful render cycles.
    pub const fn number_of_renders(&self) -> usize {
        self.number_of_renders
    }
    /// Trace the beam through the current configuration without rendering it.
    ///
    /// # Errors
    ///
    /// This function will return an error if the current configuration does not form a valid optical system or beam.
    pub fn trace(&self) -> BpResult<Vec<TracePath>> {
        let system = self.config.to_system()?;
        debug!("current system: {system}");
        let sweep = self.config.beam_sweep()?;
        sweep.trace(&system)
    }
    /// Render the given paths and count the render cycle.
    ///
    /// # Errors
    ///
    /// This function will return an error if the rendering failed.
    pub fn render(&mut self, paths: &[TracePath]) -> BpResult<()> {
        self.renderer.render(paths)?;
        self.number_of_renders += 1;
        info!("Rendered {} ray paths", paths.len());
        Ok(())
    }
    /// Recompute all ray paths from a snapshot of the current configuration and render them.
    ///
    /// If the configuration is invalid, nothing is rendered and the previous output stays in place.
    ///
    /// # Errors
    ///
    /// This function will return an error if the configuration is invalid or the rendering failed.
    pub fn configuration_changed(&mut self) -> BpResult<Vec<TracePath>> {
        let paths = self.trace()?;
        self.render(&paths)?;
        Ok(paths)
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::BeamPathError, meter};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<Vec<TracePath>>,
    }
    impl Renderer for RecordingRenderer {
        fn render(&mut self, paths: &[TracePath]) -> BpResult<()> {
            self.frames.push(paths.to_vec());
            Ok(())
        }
    }
    struct FailingRenderer;
    impl Renderer for FailingRenderer {
        fn render(&mut self, _paths: &[TracePath]) -> BpResult<()> {
            Err(BeamPathError::Plot("no device".into()))
        }
    }
    #[test]
    fn new() {
        let session = Session::new(BeamPathConfig::default(), RecordingRenderer::default());
        assert_eq!(session.config(), &BeamPathConfig::default());
        assert!(session.renderer().frames.is_empty());
        assert_eq!(session.number_of_renders(), 0);
    }
    #[test]
    fn configuration_changed() {
        let mut session = Session::new(BeamPathConfig::default(), RecordingRenderer::default());
        let paths = session.configuration_changed().unwrap();
        assert_eq!(paths.len(), 5);
        assert_eq!(session.renderer().frames.len(), 1);
        assert_eq!(session.number_of_renders(), 1);
        // 3 gaps and 2 lenses
        assert!(paths.iter().all(|p| p.len() == 6));
        assert_abs_diff_eq!(paths[0].z().last().unwrap().value, 0.2, epsilon = 1e-15);

        session.config_mut().set_distance(2, meter!(0.1)).unwrap();
        let paths = session.configuration_changed().unwrap();
        assert_eq!(session.renderer().frames.len(), 2);
        assert_abs_diff_eq!(paths[0].z().last().unwrap().value, 0.25, epsilon = 1e-15);
    }
    #[test]
    fn toggled_lens() {
        let mut session = Session::new(BeamPathConfig::default(), RecordingRenderer::default());
        session.config_mut().toggle_lens(0).unwrap();
        let paths = session.configuration_changed().unwrap();
        assert!(paths.iter().all(|p| p.len() == 5));
    }
    #[test]
    fn invalid_configuration_keeps_previous_frame() {
        let mut session = Session::new(BeamPathConfig::default(), RecordingRenderer::default());
        session.configuration_changed().unwrap();
        session
            .config_mut()
            .set_focal_length(0, meter!(0.0))
            .unwrap();
        assert_matches!(
            session.configuration_changed(),
            Err(BeamPathError::Element(_))
        );
        assert_eq!(session.renderer().frames.len(), 1);
        assert_eq!(session.number_of_renders(), 1);
    }
    #[test]
    fn renderer_error() {
        let mut session = Session::new(BeamPathConfig::default(), FailingRenderer);
        assert_matches!(session.configuration_changed(), Err(BeamPathError::Plot(_)));
        assert_eq!(session.number_of_renders(), 0);
    }
    #[test]
    fn render() {
        let mut session = Session::new(BeamPathConfig::default(), RecordingRenderer::default());
        let paths = session.trace().unwrap();
        assert_eq!(session.number_of_renders(), 0);
        session.render(&paths).unwrap();
        assert_eq!(session.number_of_renders(), 1);
        assert_eq!(session.renderer().frames, vec![paths]);
        let mut session = Session::new(BeamPathConfig::default(), FailingRenderer);
        assert_matches!(session.render(&[]), Err(BeamPathError::Plot(_)));
        assert_eq!(session.number_of_renders(), 0);
    }
    #[test]
    fn multiple_renderers() {
        let renderers: Vec<Box<dyn Renderer>> = vec![
            Box::new(RecordingRenderer::default()),
            Box::new(RecordingRenderer::default()),
        ];
        let mut session = Session::new(BeamPathConfig::default(), renderers);
        assert!(session.configuration_changed().is_ok());
        assert_eq!(session.renderer().len(), 2);
    }
}
