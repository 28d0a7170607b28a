//! Common types and utilities shared across the map identify crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod feature;
pub mod layer;
pub mod viewport;

pub use bbox::BoundingBox;
pub use crs::CrsCode;
pub use error::{MapError, MapResult};
pub use feature::{AttrRecord, AttrValue, Feature, FeatureCollection};
pub use layer::{LayerCatalog, LayerSpec, WmsTileSource};
pub use viewport::{LatLng, ScreenPoint, ViewportProvider, WebMercatorViewport};
