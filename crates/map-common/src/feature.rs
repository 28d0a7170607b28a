//! GeoJSON features as returned by GetFeatureInfo and GetFeature.
//!
//! Responses are checked structurally (`type == "FeatureCollection"` with a
//! `features` array) rather than validated against the full GeoJSON schema.
//! Feature properties are normalized into flat scalar attributes on the way in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Shown in place of a null attribute value.
pub const NULL_DISPLAY: &str = "—";

/// Feature members with a field of their own; everything else is foreign.
const CORE_MEMBERS: [&str; 4] = ["type", "id", "geometry", "properties"];

/// A scalar attribute value.
///
/// Anything that is not a string, number, boolean or null is stored as its
/// JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
}

impl AttrValue {
    /// Normalize an arbitrary JSON value into a scalar.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Boolean(*b),
            Value::Number(n) => AttrValue::Number(n.clone()),
            Value::String(s) => AttrValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => serde_json::to_string(value)
                .map(AttrValue::String)
                .unwrap_or(AttrValue::Null),
        }
    }

    /// Human-readable form for popups.
    pub fn display(&self) -> String {
        match self {
            AttrValue::Null => NULL_DISPLAY.to_string(),
            AttrValue::Boolean(b) => b.to_string(),
            AttrValue::Number(n) => n.to_string(),
            AttrValue::String(s) => s.clone(),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

/// Flat attribute mapping of a feature.
pub type AttrRecord = BTreeMap<String, AttrValue>;

/// Normalize a GeoJSON `properties` member.
///
/// Non-object input (including a missing or null `properties`) yields an
/// empty record.
pub fn normalize_attributes(properties: Option<&Value>) -> AttrRecord {
    match properties {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (k.clone(), AttrValue::from_json(v)))
            .collect(),
        _ => AttrRecord::new(),
    }
}

/// A GeoJSON Feature with normalized attributes.
///
/// Only `properties` is rewritten. The geometry and any foreign members
/// (`bbox`, GeoServer's `geometry_name`) are kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Raw GeoJSON geometry; `None` when the response carried none.
    pub geometry: Option<Value>,

    pub properties: AttrRecord,

    #[serde(flatten)]
    pub foreign: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Option<Value>, properties: AttrRecord) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry,
            properties,
            foreign: Map::new(),
        }
    }

    /// Read one element of a `features` array.
    ///
    /// Lenient: the geometry is not validated and properties are normalized,
    /// so a single odd member never rejects the collection.
    pub fn from_value(value: &Value) -> Self {
        let foreign = value
            .as_object()
            .map(|members| {
                members
                    .iter()
                    .filter(|(k, _)| !CORE_MEMBERS.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            type_: "Feature".to_string(),
            id: value.get("id").filter(|id| !id.is_null()).cloned(),
            geometry: value.get("geometry").filter(|g| !g.is_null()).cloned(),
            properties: normalize_attributes(value.get("properties")),
            foreign,
        }
    }
}

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Structural check: a `"FeatureCollection"`-tagged object with a
    /// `features` array.
    pub fn is_feature_collection(value: &Value) -> bool {
        value.get("type").and_then(Value::as_str) == Some("FeatureCollection")
            && value.get("features").map(Value::is_array).unwrap_or(false)
    }

    /// Read a parsed JSON document, `None` unless it is structurally a
    /// FeatureCollection.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !Self::is_feature_collection(value) {
            return None;
        }
        let features = value
            .get("features")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Feature::from_value).collect())
            .unwrap_or_default();
        Some(Self::new(features))
    }

    /// Parse a response body. Invalid JSON and other shapes yield `None`.
    pub fn from_json_str(body: &str) -> Option<Self> {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| Self::from_value(&value))
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Take the first feature, dropping the rest.
    pub fn into_first(self) -> Option<Feature> {
        self.features.into_iter().next()
    }
}
