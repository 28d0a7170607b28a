//! Bounding box types and the click bounding-box calculator.

use serde::{Deserialize, Serialize};

use crate::viewport::{LatLng, ScreenPoint, ViewportProvider};
use crate::CrsCode;

/// Pixel radius used around a click when querying vector features.
pub const DEFAULT_CLICK_PAD_PX: f64 = 12.0;

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For projected CRS (EPSG:3857), coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub crs: CrsCode,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64, crs: CrsCode) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            crs,
        }
    }

    /// Build a box spanning two arbitrary corners (component-wise min/max).
    pub fn from_corners(a: (f64, f64), b: (f64, f64), crs: CrsCode) -> Self {
        Self {
            min_x: a.0.min(b.0),
            min_y: a.1.min(b.1),
            max_x: a.0.max(b.0),
            max_y: a.1.max(b.1),
            crs,
        }
    }

    /// Box around a click point, `pad_px` screen pixels in every direction.
    ///
    /// Both padded corners are converted to geographic coordinates through the
    /// viewport and, for projected targets, forward-projected before the
    /// min/max is taken. Screen y grows downward, so the top-left corner maps
    /// to the larger latitude.
    pub fn around_point<V: ViewportProvider + ?Sized>(
        viewport: &V,
        point: ScreenPoint,
        crs: CrsCode,
        pad_px: f64,
    ) -> Self {
        let top_left = viewport.container_point_to_latlng(ScreenPoint::new(
            point.x - pad_px,
            point.y - pad_px,
        ));
        let bottom_right = viewport.container_point_to_latlng(ScreenPoint::new(
            point.x + pad_px,
            point.y + pad_px,
        ));

        Self::from_corners(
            in_crs(viewport, top_left, crs),
            in_crs(viewport, bottom_right, crs),
            crs,
        )
    }

    /// The visible map extent expressed in `crs`.
    ///
    /// Geographic uses the raw south-west/north-east corners; Web Mercator
    /// forward-projects both.
    pub fn of_viewport<V: ViewportProvider + ?Sized>(viewport: &V, crs: CrsCode) -> Self {
        let (sw, ne) = viewport.bounds();
        let (min_x, min_y) = in_crs(viewport, sw, crs);
        let (max_x, max_y) = in_crs(viewport, ne, crs);
        Self::new(min_x, min_y, max_x, max_y, crs)
    }

    /// Format as a comma-joined OGC BBOX value.
    pub fn to_wms_string(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Check if a point lies in the interior, not on an edge.
    pub fn strictly_contains_point(&self, x: f64, y: f64) -> bool {
        x > self.min_x && x < self.max_x && y > self.min_y && y < self.max_y
    }
}

/// Express a geographic position in `crs`, projecting through the viewport.
fn in_crs<V: ViewportProvider + ?Sized>(viewport: &V, latlng: LatLng, crs: CrsCode) -> (f64, f64) {
    match crs {
        CrsCode::Epsg4326 => (latlng.lng, latlng.lat),
        CrsCode::Epsg3857 => viewport.project(latlng),
    }
}
