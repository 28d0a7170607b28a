//! Coordinate Reference System types and utilities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CRS codes a layer may be queried in.
///
/// Serialized as the OGC string form (`"EPSG:4326"`), which is also what goes
/// into `SRS`/`srsName` request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    #[default]
    Epsg3857,
}

impl CrsCode {
    /// Parse a CRS string as it appears in OGC requests and layer configs.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326"
    /// - "epsg:3857"
    /// - "CRS:84" (lon/lat WGS84)
    /// - "EPSG:900913" (legacy Google Mercator alias)
    pub fn from_wms_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "EPSG:4326" | "CRS:84" => Ok(CrsCode::Epsg4326),
            "EPSG:3857" | "EPSG:900913" => Ok(CrsCode::Epsg3857),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// The canonical OGC code string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Epsg3857 => "EPSG:3857",
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CrsCode {
    type Error = CrsParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CrsCode::from_wms_string(&value)
    }
}

impl From<CrsCode> for String {
    fn from(code: CrsCode) -> Self {
        code.as_str().to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
