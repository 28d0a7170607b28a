//! Coordinate reference system transformations.
//!
//! Only the spherical ("Web") Mercator projection is needed by the identify
//! path; geographic coordinates pass through untouched.

pub mod mercator;

pub use mercator::{project, unproject, EARTH_RADIUS, MAX_EXTENT, MAX_LATITUDE};
