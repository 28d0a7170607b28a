//! Error types for OGC requests.

use thiserror::Error;

/// Result type alias using OgcError.
pub type OgcResult<T> = Result<T, OgcError>;

#[derive(Debug, Error)]
pub enum OgcError {
    #[error("Invalid service endpoint '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Response from {url} is not a FeatureCollection")]
    NotFeatureCollection { url: String },

    /// Every WFS output format was tried without a GeoJSON answer.
    #[error("WFS failed: non-GeoJSON")]
    NonGeoJson { type_name: String },
}
