//! Error types for map generation

use std::fmt;

/// Errors that can occur while building or checking a map
#[derive(Debug, Clone)]
pub enum MapError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// The triangulator produced no usable output
    TriangulationFailed(String),
    /// A structural invariant of the mesh does not hold
    ///
    /// The message carries the offending side/region/triangle ids so the
    /// upstream triangulation can be debugged.
    InvalidMesh(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            MapError::TriangulationFailed(msg) => write!(f, "triangulation failed: {}", msg),
            MapError::InvalidMesh(msg) => write!(f, "invalid mesh: {}", msg),
        }
    }
}

impl std::error::Error for MapError {}

/// Result type alias for map operations
pub type Result<T> = std::result::Result<T, MapError>;
