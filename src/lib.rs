#![warn(missing_docs)]
//! This is the documentation for the **beampath** software package, an interactive visualization of a paraxial beam
//! passing through a train of thin lenses and free-space gaps.
//!
//! Each optical element is described by its ray-transfer (ABCD) matrix. A small bundle of rays is traced through the
//! optical system and the transverse ray position is recorded at each element boundary. The resulting paths are
//! rendered as a chart (SVG or bitmap) and may be exported as a CSV table.
//!
//! The optical system is edited through a [`config::BeamPathConfig`] which holds all user controls (lens distances,
//! focal lengths, enable flags and beam sampling). A [`session::Session`] recomputes and renders the beam paths after
//! each change.
pub mod config;
pub mod console;
pub mod element;
pub mod error;
pub mod export;
pub mod plottable;
pub mod ray;
pub mod ray_transfer_matrix;
pub mod session;
pub mod sweep;
pub mod system;
pub mod tracer;
pub mod utils;

/// Return the version information of this crate.
#[must_use]
pub fn get_version() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
