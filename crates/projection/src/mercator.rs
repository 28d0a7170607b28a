//! Spherical Mercator (EPSG:3857).
//!
//! Matches the projection used by Leaflet-style web maps: a sphere of radius
//! 6378137 m with latitudes clamped to the square world extent.

use std::f64::consts::PI;

/// Sphere radius in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude at which the projected world becomes square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Half-width of the projected world in meters.
pub const MAX_EXTENT: f64 = 20_037_508.342_789_244;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Forward-project a geographic coordinate into EPSG:3857 meters.
///
/// Latitude is clamped to [`MAX_LATITUDE`] so poles never produce infinities.
pub fn project(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let sin_lat = (lat * DEG_TO_RAD).sin();

    let x = EARTH_RADIUS * lon * DEG_TO_RAD;
    let y = EARTH_RADIUS * ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / 2.0;
    (x, y)
}

/// Inverse of [`project`]: EPSG:3857 meters back to (lon, lat) degrees.
pub fn unproject(x: f64, y: f64) -> (f64, f64) {
    let lon = x * RAD_TO_DEG / EARTH_RADIUS;
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0) * RAD_TO_DEG;
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_zero() {
        let (x, y) = project(0.0, 0.0);
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_is_world_edge() {
        let (x, _) = project(180.0, 0.0);
        assert!((x - MAX_EXTENT).abs() < 1e-6);
    }

    #[test]
    fn test_max_latitude_is_square() {
        let (_, y) = project(0.0, MAX_LATITUDE);
        assert!((y - MAX_EXTENT).abs() < 1.0);
    }

    #[test]
    fn test_poles_are_clamped() {
        let (_, north) = project(0.0, 90.0);
        let (_, south) = project(0.0, -90.0);
        assert!(north.is_finite());
        assert!(south.is_finite());
        assert!((north + south).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_kansas() {
        let (x, y) = project(-98.0, 39.0);
        let (lon, lat) = unproject(x, y);
        assert!((lon - -98.0).abs() < 1e-9);
        assert!((lat - 39.0).abs() < 1e-9);
    }
}
