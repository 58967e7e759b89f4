//! Error types for boidfield.
//!
//! Every fallible call reports a [`SimulationError`] synchronously and leaves
//! the state it was called on untouched. Out-of-range SDF queries and
//! detection cutoffs are not errors; they saturate or exclude silently.

use std::fmt;

/// Broad classification of a [`SimulationError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller passed a value outside the accepted domain.
    InvalidArgument,
    /// A call was made while the state it needs is in use elsewhere.
    PreconditionViolation,
    /// A configuration file could not be read or parsed.
    Config,
}

/// Errors that can occur while building fields, sizing stores or stepping.
#[derive(Debug)]
pub enum SimulationError {
    /// Particle capacity must be at least one.
    InvalidCapacity(usize),
    /// SDF grid dimensions must both be positive.
    InvalidDimensions {
        /// Requested grid width.
        width: usize,
        /// Requested grid height.
        height: usize,
    },
    /// Step delta must be finite and strictly positive.
    InvalidDelta(f32),
    /// A polygon needs at least three vertices.
    DegeneratePolygon {
        /// Number of vertices that were supplied.
        vertices: usize,
    },
    /// A polygon vertex was NaN or infinite.
    NonFinitePolygon,
    /// A flocking or timing parameter was non-finite or out of range.
    InvalidParameter {
        /// Field name in [`FlockingParams`](crate::FlockingParams) or
        /// [`ClockConfig`](crate::time::ClockConfig).
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The boundary field is shared with another reader and cannot be rebuilt.
    BoundaryInUse,
    /// Failed to parse a configuration document.
    Config(serde_json::Error),
    /// Failed to read a configuration file from disk.
    Io(std::io::Error),
}

impl SimulationError {
    /// Which part of the taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimulationError::InvalidCapacity(_)
            | SimulationError::InvalidDimensions { .. }
            | SimulationError::InvalidDelta(_)
            | SimulationError::DegeneratePolygon { .. }
            | SimulationError::NonFinitePolygon
            | SimulationError::InvalidParameter { .. } => ErrorKind::InvalidArgument,
            SimulationError::BoundaryInUse => ErrorKind::PreconditionViolation,
            SimulationError::Config(_) | SimulationError::Io(_) => ErrorKind::Config,
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidCapacity(n) => {
                write!(f, "Particle capacity must be at least 1, got {}", n)
            }
            SimulationError::InvalidDimensions { width, height } => {
                write!(f, "SDF grid dimensions must be positive, got {}x{}", width, height)
            }
            SimulationError::InvalidDelta(delta) => {
                write!(f, "Step delta must be finite and greater than 0, got {}", delta)
            }
            SimulationError::DegeneratePolygon { vertices } => {
                write!(f, "Polygon needs at least 3 vertices, got {}", vertices)
            }
            SimulationError::NonFinitePolygon => write!(f, "Polygon contains a non-finite vertex"),
            SimulationError::InvalidParameter { name, value } => {
                write!(f, "Invalid value {} for parameter `{}`", value, name)
            }
            SimulationError::BoundaryInUse => write!(
                f,
                "Boundary field is still shared with another reader. \
                 Drop all handles before rebuilding."
            ),
            SimulationError::Config(e) => write!(f, "Failed to parse configuration: {}", e),
            SimulationError::Io(e) => write!(f, "Failed to read configuration file: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(e: serde_json::Error) -> Self {
        SimulationError::Config(e)
    }
}

impl From<std::io::Error> for SimulationError {
    fn from(e: std::io::Error) -> Self {
        SimulationError::Io(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;
