//! WFS GetFeature requests with output-format negotiation.
//!
//! Servers disagree on which `outputFormat` value yields GeoJSON, so a
//! request is tried with the caller's format first and then with
//! `application/json; subtype=geojson`. The first body that is structurally a
//! FeatureCollection wins, including bodies that arrive as a JSON-encoded
//! string. Transport failures and error statuses fall through to the next
//! format exactly like an unexpected body does.
//!
//! `typenames`/`typeName` and `count`/`maxFeatures` are both sent with the
//! same value: WFS 2.0 servers read the former, 1.x-minded ones the latter.

use std::sync::Arc;

use map_common::{BoundingBox, CrsCode, FeatureCollection};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{OgcError, OgcResult};
use crate::http::HttpFetcher;
use crate::kvp::with_params;
use crate::ACCEPT_JSON;

/// First output format tried when the caller has no preference.
pub const DEFAULT_OUTPUT_FORMAT: &str = "application/json";

/// Output format tried after the preferred one.
pub const GEOJSON_SUBTYPE_FORMAT: &str = "application/json; subtype=geojson";

/// GetFeature query options.
#[derive(Debug, Clone, PartialEq)]
pub struct GetFeatureRequest {
    /// Feature type name (e.g., "topp:states")
    pub type_name: String,
    /// CQL_FILTER expression
    pub cql_filter: Option<String>,
    /// Explicit BBOX parameter
    pub bbox: Option<BoundingBox>,
    /// CRS the response geometries should be expressed in
    pub srs_name: Option<CrsCode>,
    /// Result cap
    pub max_features: Option<u32>,
    /// Preferred output format
    pub output_format: Option<String>,
}

impl GetFeatureRequest {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            cql_filter: None,
            bbox: None,
            srs_name: None,
            max_features: None,
            output_format: None,
        }
    }

    pub fn with_cql_filter(mut self, cql: impl Into<String>) -> Self {
        self.cql_filter = Some(cql.into());
        self
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn with_srs_name(mut self, srs: CrsCode) -> Self {
        self.srs_name = Some(srs);
        self
    }

    pub fn with_max_features(mut self, max: u32) -> Self {
        self.max_features = Some(max);
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    /// Output formats in the order they are attempted.
    pub fn format_candidates(&self) -> [String; 2] {
        [
            self.output_format
                .clone()
                .unwrap_or_else(|| DEFAULT_OUTPUT_FORMAT.to_string()),
            GEOJSON_SUBTYPE_FORMAT.to_string(),
        ]
    }

    /// Query parameters for one attempt.
    pub fn query_pairs(&self, output_format: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("service", "WFS".to_string()),
            ("version", "2.0.0".to_string()),
            ("request", "GetFeature".to_string()),
            ("typenames", self.type_name.clone()),
            ("typeName", self.type_name.clone()),
        ];

        if let Some(srs) = self.srs_name {
            pairs.push(("srsName", srs.to_string()));
        }
        if let Some(ref cql) = self.cql_filter {
            pairs.push(("CQL_FILTER", cql.clone()));
        }
        if let Some(ref bbox) = self.bbox {
            pairs.push(("BBOX", format!("{},{}", bbox.to_wms_string(), bbox.crs)));
        }
        if let Some(max) = self.max_features {
            pairs.push(("count", max.to_string()));
            pairs.push(("maxFeatures", max.to_string()));
        }

        pairs.push(("outputFormat", output_format.to_string()));
        pairs.push(("exceptions", "application/json".to_string()));
        pairs
    }

    pub fn to_url(&self, wfs_url: &str, output_format: &str) -> OgcResult<String> {
        with_params(wfs_url, &self.query_pairs(output_format))
    }
}

/// Read a GetFeature body, unwrapping a JSON-encoded string if needed.
pub fn parse_feature_collection(body: &str) -> Option<FeatureCollection> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value {
        Value::String(inner) => FeatureCollection::from_json_str(&inner),
        other => FeatureCollection::from_value(&other),
    }
}

/// Issues GetFeature requests against one WFS endpoint.
#[derive(Clone)]
pub struct WfsClient {
    base_url: String,
    fetcher: Arc<dyn HttpFetcher>,
}

impl WfsClient {
    pub fn new(base_url: impl Into<String>, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self {
            base_url: base_url.into(),
            fetcher,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute the request, negotiating the output format.
    ///
    /// Fails with [`OgcError::NonGeoJson`] only after every candidate format
    /// was tried; per-attempt failures are logged, not returned. An invalid
    /// endpoint URL fails immediately.
    pub async fn get_feature(&self, request: &GetFeatureRequest) -> OgcResult<FeatureCollection> {
        for format in request.format_candidates() {
            let url = request.to_url(&self.base_url, &format)?;
            debug!(url = %url, type_name = %request.type_name, "WFS GetFeature");

            match self.fetcher.get(&url, ACCEPT_JSON).await {
                Ok(response) => {
                    if let Some(fc) = parse_feature_collection(&response.body) {
                        return Ok(fc);
                    }
                    warn!(status = response.status, url = %url, "WFS non-GeoJSON");
                }
                Err(e) => {
                    warn!(error = %e, url = %url, "WFS request failed");
                }
            }
        }

        Err(OgcError::NonGeoJson {
            type_name: request.type_name.clone(),
        })
    }
}
