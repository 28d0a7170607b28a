//! Viewport abstraction: the bridge between screen pixels and the map.
//!
//! The rendering surface owns the viewport; identify code only asks it to
//! convert between container pixels and geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

/// Side of one zoom-0 tile in pixels.
const TILE_SIZE: f64 = 256.0;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A position in container pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Read-only view of the map surface as seen by identify code.
pub trait ViewportProvider: Send + Sync {
    /// South-west and north-east corners of the visible extent.
    fn bounds(&self) -> (LatLng, LatLng);

    /// Visible size in whole pixels (width, height).
    fn size(&self) -> (u32, u32);

    fn latlng_to_container_point(&self, latlng: LatLng) -> ScreenPoint;

    fn container_point_to_latlng(&self, point: ScreenPoint) -> LatLng;

    /// Forward-project into Web Mercator meters.
    fn project(&self, latlng: LatLng) -> (f64, f64) {
        projection::project(latlng.lng, latlng.lat)
    }
}

/// A Web Mercator map view defined by center, zoom and pixel size.
///
/// Uses the 256-pixel tile pyramid of common web maps: world pixel
/// coordinates at zoom `z` span `256 * 2^z` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebMercatorViewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl WebMercatorViewport {
    pub fn new(center: LatLng, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    /// Construct a viewport from untrusted input.
    pub fn try_new(center: LatLng, zoom: f64, width: f64, height: f64) -> MapResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width < 1.0 || height < 1.0 {
            return Err(MapError::InvalidViewport(format!(
                "size must be at least 1x1 pixels, got {}x{}",
                width, height
            )));
        }
        if !zoom.is_finite() || !(0.0..=24.0).contains(&zoom) {
            return Err(MapError::InvalidViewport(format!(
                "zoom out of range: {}",
                zoom
            )));
        }
        if !(-90.0..=90.0).contains(&center.lat) || !(-180.0..=180.0).contains(&center.lng) {
            return Err(MapError::InvalidViewport(format!(
                "center out of range: {}, {}",
                center.lat, center.lng
            )));
        }
        Ok(Self::new(center, zoom, width, height))
    }

    fn world_scale(&self) -> f64 {
        TILE_SIZE * 2_f64.powf(self.zoom)
    }

    /// Geographic position to absolute world pixels at the current zoom.
    fn to_world_pixels(&self, latlng: LatLng) -> (f64, f64) {
        let (x, y) = projection::project(latlng.lng, latlng.lat);
        let k = 0.5 / (std::f64::consts::PI * projection::EARTH_RADIUS);
        let scale = self.world_scale();
        (scale * (k * x + 0.5), scale * (-k * y + 0.5))
    }

    fn from_world_pixels(&self, px: f64, py: f64) -> LatLng {
        let k = 0.5 / (std::f64::consts::PI * projection::EARTH_RADIUS);
        let scale = self.world_scale();
        let x = (px / scale - 0.5) / k;
        let y = (py / scale - 0.5) / -k;
        let (lng, lat) = projection::unproject(x, y);
        LatLng::new(lat, lng)
    }

    /// World pixel of the container's top-left corner.
    fn pixel_origin(&self) -> (f64, f64) {
        let (cx, cy) = self.to_world_pixels(self.center);
        (cx - self.width / 2.0, cy - self.height / 2.0)
    }
}

impl ViewportProvider for WebMercatorViewport {
    fn bounds(&self) -> (LatLng, LatLng) {
        let sw = self.container_point_to_latlng(ScreenPoint::new(0.0, self.height));
        let ne = self.container_point_to_latlng(ScreenPoint::new(self.width, 0.0));
        (sw, ne)
    }

    fn size(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }

    fn latlng_to_container_point(&self, latlng: LatLng) -> ScreenPoint {
        let (px, py) = self.to_world_pixels(latlng);
        let (ox, oy) = self.pixel_origin();
        ScreenPoint::new(px - ox, py - oy)
    }

    fn container_point_to_latlng(&self, point: ScreenPoint) -> LatLng {
        let (ox, oy) = self.pixel_origin();
        self.from_world_pixels(point.x + ox, point.y + oy)
    }
}
