//! Error handling for GeoEdit
//!
//! Provides the error types shared by all layers of the editing core:
//! - Geometry errors (unsupported operands, policy violations, GeoJSON)
//! - Configuration errors (loading and validation)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised by the geometry engine adapter and the transform pipeline. Inside
/// event handlers these are logged and the operation is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The operation is not defined for this geometry type
    #[error("{operation} is not supported for {kind} geometries")]
    Unsupported {
        /// The operation that was attempted.
        operation: String,
        /// The geometry type it was attempted on.
        kind: String,
    },

    /// Cutting a point is undefined
    #[error("Cannot cut a Point geometry")]
    CutPoint,

    /// The GeoJSON input could not be interpreted
    #[error("Invalid GeoJSON: {reason}")]
    InvalidGeoJson {
        /// Why the input was rejected.
        reason: String,
    },

    /// Buffer parameters out of range
    #[error("Invalid buffer parameters: radius {radius}, segments {segments}")]
    InvalidBuffer {
        /// The requested radius.
        radius: f64,
        /// The requested segment count per quarter circle.
        segments: u32,
    },
}

/// Configuration error type
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// A configuration value is out of its valid range
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting {
        /// The offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The bounds polygon set could not be built
    #[error("Invalid bounds: {reason}")]
    InvalidBounds {
        /// Why the bounds were rejected.
        reason: String,
    },
}

/// Main error type for GeoEdit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
