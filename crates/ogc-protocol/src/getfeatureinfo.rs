//! WMS GetFeatureInfo requests
//!
//! Builds OGC WMS 1.1.1 GetFeatureInfo URLs for a click on the current map
//! view and fetches the response as a GeoJSON FeatureCollection.

use std::sync::Arc;

use map_common::{BoundingBox, CrsCode, FeatureCollection, ScreenPoint, ViewportProvider};
use tracing::debug;

use crate::error::{OgcError, OgcResult};
use crate::http::HttpFetcher;
use crate::kvp::with_params;
use crate::ACCEPT_JSON;

/// Response format requested from the server.
pub const DEFAULT_INFO_FORMAT: &str = "application/json";

/// Maximum features the server may report per click.
pub const FEATURE_COUNT: u32 = 5;

/// GetFeatureInfo request parameters
#[derive(Debug, Clone, PartialEq)]
pub struct GetFeatureInfoRequest {
    /// Layer rendered and queried (LAYERS and QUERY_LAYERS)
    pub layer_name: String,
    /// Spatial reference of `bbox` (SRS)
    pub srs: CrsCode,
    /// Current map extent expressed in `srs`
    pub bbox: BoundingBox,
    /// Map width in pixels
    pub width: u32,
    /// Map height in pixels
    pub height: u32,
    /// Pixel column, 0-based from left
    pub x: i64,
    /// Pixel row, 0-based from top
    pub y: i64,
    /// Response format
    pub info_format: String,
    /// Maximum number of features to return
    pub feature_count: u32,
}

impl GetFeatureInfoRequest {
    /// Request for a click at `point` on the current view of `viewport`.
    pub fn at_click<V: ViewportProvider + ?Sized>(
        viewport: &V,
        point: ScreenPoint,
        layer_name: impl Into<String>,
        srs: CrsCode,
    ) -> Self {
        let (width, height) = viewport.size();
        Self {
            layer_name: layer_name.into(),
            srs,
            bbox: BoundingBox::of_viewport(viewport, srs),
            width,
            height,
            x: round_half_up(point.x),
            y: round_half_up(point.y),
            info_format: DEFAULT_INFO_FORMAT.to_string(),
            feature_count: FEATURE_COUNT,
        }
    }

    /// Query parameters in the order they are written.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("SERVICE", "WMS".to_string()),
            ("VERSION", "1.1.1".to_string()),
            ("REQUEST", "GetFeatureInfo".to_string()),
            ("SRS", self.srs.to_string()),
            ("BBOX", self.bbox.to_wms_string()),
            ("WIDTH", self.width.to_string()),
            ("HEIGHT", self.height.to_string()),
            ("LAYERS", self.layer_name.clone()),
            ("QUERY_LAYERS", self.layer_name.clone()),
            ("STYLES", String::new()),
            ("FORMAT", "image/png".to_string()),
            ("INFO_FORMAT", self.info_format.clone()),
            ("FEATURE_COUNT", self.feature_count.to_string()),
            ("X", self.x.to_string()),
            ("Y", self.y.to_string()),
            ("TILED", "true".to_string()),
        ]
    }

    /// Full request URL against the WMS endpoint.
    pub fn to_url(&self, wms_url: &str) -> OgcResult<String> {
        with_params(wms_url, &self.query_pairs())
    }
}

/// Round to the nearest integer, halves toward +infinity.
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Issues GetFeatureInfo requests against one WMS endpoint.
#[derive(Clone)]
pub struct WmsClient {
    base_url: String,
    fetcher: Arc<dyn HttpFetcher>,
}

impl WmsClient {
    pub fn new(base_url: impl Into<String>, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self {
            base_url: base_url.into(),
            fetcher,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and parse a GetFeatureInfo response.
    ///
    /// Non-2xx statuses and bodies that are not a FeatureCollection are
    /// errors; an empty FeatureCollection is a success.
    pub async fn get_feature_info(
        &self,
        request: &GetFeatureInfoRequest,
    ) -> OgcResult<FeatureCollection> {
        let url = request.to_url(&self.base_url)?;
        debug!(url = %url, layer = %request.layer_name, "WMS GetFeatureInfo");

        let response = self.fetcher.get(&url, ACCEPT_JSON).await?;
        if !response.is_success() {
            return Err(OgcError::HttpStatus {
                status: response.status,
                url,
            });
        }

        FeatureCollection::from_json_str(&response.body)
            .ok_or(OgcError::NotFeatureCollection { url })
    }
}
