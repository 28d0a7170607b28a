//! OGC WMS and WFS client-side protocol support.
//!
//! Supports:
//! - WMS 1.1.1 GetFeatureInfo request URLs
//! - WFS 2.0.0 GetFeature requests with output-format negotiation
//! - CQL bounding-box filters
//!
//! Network access goes through [`HttpFetcher`] so callers can substitute
//! their own transport.

pub mod cql;
pub mod error;
pub mod getfeature;
pub mod getfeatureinfo;
pub mod http;
mod kvp;

pub use error::{OgcError, OgcResult};
pub use getfeature::{GetFeatureRequest, WfsClient};
pub use getfeatureinfo::{GetFeatureInfoRequest, WmsClient};
pub use http::{HttpFetcher, HttpResponse, ReqwestFetcher};

/// `Accept` header sent with every request.
pub const ACCEPT_JSON: &str = "application/json";
