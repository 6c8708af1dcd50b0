#![warn(missing_docs)]
//! Beampath specific error structures
use std::{error::Error, fmt::Display};

/// Beampath application specific Result type
pub type BpResult<T> = std::result::Result<T, BeamPathError>;

/// Errors that can be returned by various beampath functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeamPathError {
    /// invalid optical element (e.g. zero focal length or negative distance)
    Element(String),
    /// errors while tracing a ray through an optical system
    Trace(String),
    /// errors while setting up or reading / writing a configuration
    Config(String),
    /// errors console io
    Console(String),
    /// errors while rendering a plot
    Plot(String),
    /// errors while exporting trace data
    Export(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for BeamPathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element(m) => {
                write!(f, "Element:{m}")
            }
            Self::Trace(m) => {
                write!(f, "Trace:{m}")
            }
            Self::Config(m) => {
                write!(f, "Config:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Plot(m) => {
                write!(f, "Plot:{m}")
            }
            Self::Export(m) => {
                write!(f, "Export:{m}")
            }
            Self::Other(m) => write!(f, "Beampath Error:Other:{m}"),
        }
    }
}
impl Error for BeamPathError {}

impl std::convert::From<String> for BeamPathError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
