//! Common test fixtures for identify tests.
//!
//! Response bodies mirror what a GeoServer returns for the `topp:states`
//! demo layer, trimmed to a few vertices.

use map_common::{CrsCode, LatLng, LayerSpec, ScreenPoint, WebMercatorViewport};
use serde_json::{json, Value};

/// Default endpoints used by tests.
pub const WMS_URL: &str = "https://ogc.test/geoserver/wms";
pub const WFS_URL: &str = "https://ogc.test/geoserver/wfs";

/// Kansas outline, one ring.
pub fn kansas_geometry() -> Value {
    json!({
        "type": "MultiPolygon",
        "coordinates": [[[
            [-102.05, 36.99], [-94.62, 36.99], [-94.61, 40.0],
            [-102.05, 40.0], [-102.05, 36.99]
        ]]]
    })
}

/// Nebraska outline, one ring.
pub fn nebraska_geometry() -> Value {
    json!({
        "type": "MultiPolygon",
        "coordinates": [[[
            [-104.05, 40.0], [-95.31, 40.0], [-96.0, 43.0],
            [-104.05, 43.0], [-104.05, 40.0]
        ]]]
    })
}

/// A FeatureCollection body with one feature per (properties, geometry).
pub fn feature_collection(features: &[(Value, Value)]) -> String {
    let features: Vec<Value> = features
        .iter()
        .map(|(properties, geometry)| {
            json!({"type": "Feature", "properties": properties, "geometry": geometry})
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features}).to_string()
}

/// `{"STATE_NAME":"Kansas"}` over the Kansas outline.
pub fn kansas_body() -> String {
    feature_collection(&[(json!({"STATE_NAME": "Kansas"}), kansas_geometry())])
}

/// Nebraska, with a nested attribute that needs normalizing.
pub fn nebraska_body() -> String {
    feature_collection(&[(
        json!({"STATE_NAME": "Nebraska", "STATE_FIPS": 31, "meta": {"src": "census"}}),
        nebraska_geometry(),
    )])
}

/// An empty, valid FeatureCollection.
pub fn empty_body() -> String {
    feature_collection(&[])
}

/// A JSON body that is not a FeatureCollection.
pub const EXCEPTION_BODY: &str =
    r#"{"exceptions":[{"code":"InvalidParameterValue","text":"Unknown outputFormat"}]}"#;

/// A body wrapped as a JSON string, as some servers send it.
pub fn string_wrapped(body: &str) -> String {
    Value::String(body.to_string()).to_string()
}

/// The layer configured by the demo viewer.
pub fn states_layer() -> LayerSpec {
    LayerSpec::new("states", "topp:states")
        .with_srs(CrsCode::Epsg3857)
        .with_wfs("topp:states")
        .with_geom_field("the_geom")
}

/// Raster-only layer without a WFS fallback.
pub fn raster_layer(id: &str, name: &str) -> LayerSpec {
    LayerSpec::new(id, name)
}

/// Initial view of the demo viewer: central US at zoom 4.
pub fn conus_viewport() -> WebMercatorViewport {
    WebMercatorViewport::new(LatLng::new(39.0, -98.0), 4.0, 1024.0, 768.0)
}

/// Center pixel of [`conus_viewport`].
pub fn center_point() -> ScreenPoint {
    ScreenPoint::new(512.0, 384.0)
}
