use crate::tnp::SyntaxError;
use std::io;

/// Unrecoverable errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Standard parallels coincide, projection cone is undefined")]
    ParallelsCoincide,

    #[error("Standard parallel at the pole, projection cone is undefined")]
    PolarParallel,

    #[error("Projection constants are not finite (n = {n}, F = {f})")]
    DegenerateProjection { n: f64, f: f64 },

    #[error("Parse error at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: SyntaxError,
    },

    #[error("Task needs at least one turnpoint")]
    EmptyTask,

    #[error("Unknown waypoint: {0}")]
    UnknownWaypoint(String),
}

impl Error {
    /// Whether the error comes from degenerate projection parameters
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::ParallelsCoincide | Error::PolarParallel | Error::DegenerateProjection { .. }
        )
    }

    /// Line number of a parse error
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Non-fatal issues encountered while importing airspace
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Arc with a non-positive radius, replaced by a straight line to its end point
    DegenerateArc { title: String, radius: f64 },

    /// `INCLUDE=NO` section still open at end of input
    UnterminatedInclude { line: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
