//! Error types for the map identify crates.

use thiserror::Error;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Errors raised while loading configuration or validating map input.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Duplicate layer id: {0}")]
    DuplicateLayer(String),

    #[error("Failed to read layer config {path}: {message}")]
    ConfigRead { path: String, message: String },

    #[error("Failed to parse layer config: {0}")]
    ConfigParse(String),
}

impl MapError {
    /// Short machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            MapError::InvalidViewport(_) => "InvalidViewport",
            MapError::LayerNotFound(_) => "LayerNotDefined",
            MapError::DuplicateLayer(_)
            | MapError::ConfigRead { .. }
            | MapError::ConfigParse(_) => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            MapError::InvalidViewport(_) => 400,
            MapError::LayerNotFound(_) => 404,
            _ => 500,
        }
    }
}

impl From<serde_yaml::Error> for MapError {
    fn from(err: serde_yaml::Error) -> Self {
        MapError::ConfigParse(err.to_string())
    }
}
