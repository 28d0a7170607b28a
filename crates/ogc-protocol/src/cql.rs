//! CQL filter expressions.

use map_common::BoundingBox;

/// `BBOX(<geom>,minx,miny,maxx,maxy,'<srs>')`
pub fn bbox_filter(geometry_field: &str, bbox: &BoundingBox) -> String {
    format!(
        "BBOX({},{},{},{},{},'{}')",
        geometry_field, bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y, bbox.crs
    )
}
