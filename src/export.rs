//! Export of traced beam paths as CSV tables.
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use log::info;
use serde::Serialize;
use uom::si::length::meter;

use crate::{
    error::{BeamPathError, BpResult},
    session::Renderer,
    tracer::TracePath,
};

#[derive(Serialize)]
struct SampleRecord {
    ray: usize,
    sample: usize,
    z_m: f64,
    x_m: f64,
}

fn export_error(e: impl std::fmt::Display) -> BeamPathError {
    BeamPathError::Export(e.to_string())
}

/// Write all samples of the given paths as a CSV table with the columns `ray`, `sample`, `z_m` and `x_m`.
///
/// Rays and samples are numbered starting at zero. The header is written even if no paths are given.
///
/// # Errors
///
/// This function will return an error if writing to `writer` failed.
pub fn write_csv<W: Write>(paths: &[TracePath], writer: W) -> BpResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer
        .write_record(["ray", "sample", "z_m", "x_m"])
        .map_err(export_error)?;
    for (ray, path) in paths.iter().enumerate() {
        for (sample, (z, x)) in path.samples().enumerate() {
            csv_writer
                .serialize(SampleRecord {
                    ray,
                    sample,
                    z_m: z.get::<meter>(),
                    x_m: x.get::<meter>(),
                })
                .map_err(export_error)?;
        }
    }
    csv_writer.flush().map_err(export_error)
}

/// A [`Renderer`] writing the beam paths into a CSV file.
#[derive(Debug, Clone)]
pub struct CsvRenderer {
    file_path: PathBuf,
}
impl CsvRenderer {
    /// Creates a new [`CsvRenderer`] writing to the given file.
    #[must_use]
    pub fn new(file_path: &Path) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
        }
    }
    /// Returns the path of the output file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}
impl Renderer for CsvRenderer {
    fn render(&mut self, paths: &[TracePath]) -> BpResult<()> {
        let file = File::create(&self.file_path).map_err(|e| {
            BeamPathError::Export(format!(
                "could not create file {}: {e}",
                self.file_path.display()
            ))
        })?;
        write_csv(paths, file)?;
        info!("Ray paths exported to {}", self.file_path.display());
        Ok(())
    }
}
