//! Layer definitions and the ordered layer catalog.
//!
//! Layers come from a YAML file loaded once at startup. List order is the
//! identify priority: the first visible layer with a match wins.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{MapError, MapResult};
use crate::CrsCode;

/// Geometry column assumed when a layer doesn't name one.
pub const DEFAULT_GEOMETRY_FIELD: &str = "the_geom";

fn default_visible() -> bool {
    true
}

fn default_format() -> String {
    "image/png".to_string()
}

fn default_transparent() -> bool {
    true
}

fn default_info_format() -> String {
    "application/json".to_string()
}

/// A map layer served by the WMS (and optionally WFS) endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Unique layer identifier (e.g., "states")
    pub id: String,

    /// WMS layer name, also shown in the layer switcher (e.g., "topp:states")
    pub name: String,

    /// Visibility before the user toggles anything
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Tile image format
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default = "default_transparent")]
    pub transparent: bool,

    /// GetFeatureInfo format advertised to map clients. Identify itself
    /// always asks for `application/json`.
    #[serde(default = "default_info_format", alias = "infoFormat")]
    pub info_format: String,

    /// CRS used for identify requests
    #[serde(default)]
    pub srs: CrsCode,

    /// WFS feature type queried when the raster query finds nothing
    #[serde(default, alias = "wfsTypeName")]
    pub wfs_type_name: Option<String>,

    /// Geometry attribute for the WFS BBOX filter
    #[serde(default, alias = "geomField")]
    pub geom_field: Option<String>,

    /// Attribute that identifies a feature to a human (e.g., "STATE_NAME")
    #[serde(default, alias = "idField")]
    pub id_field: Option<String>,
}

impl LayerSpec {
    /// Minimal raster-only layer with defaults for every optional field.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: default_visible(),
            format: default_format(),
            transparent: default_transparent(),
            info_format: default_info_format(),
            srs: CrsCode::default(),
            wfs_type_name: None,
            geom_field: None,
            id_field: None,
        }
    }

    /// Declare the WFS fallback type for this layer.
    pub fn with_wfs(mut self, type_name: impl Into<String>) -> Self {
        self.wfs_type_name = Some(type_name.into());
        self
    }

    pub fn with_srs(mut self, srs: CrsCode) -> Self {
        self.srs = srs;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_geom_field(mut self, field: impl Into<String>) -> Self {
        self.geom_field = Some(field.into());
        self
    }

    /// Geometry attribute name for CQL filters.
    pub fn geometry_field(&self) -> &str {
        self.geom_field.as_deref().unwrap_or(DEFAULT_GEOMETRY_FIELD)
    }

    /// Effective visibility given the user's overrides.
    pub fn is_visible(&self, overrides: &HashMap<String, bool>) -> bool {
        overrides.get(&self.id).copied().unwrap_or(self.visible)
    }
}

/// Tile source description handed to the map renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WmsTileSource {
    pub id: String,
    pub url: String,
    pub layers: String,
    pub format: String,
    pub transparent: bool,
}

impl WmsTileSource {
    pub fn for_layer(layer: &LayerSpec, wms_url: &str) -> Self {
        Self {
            id: layer.id.clone(),
            url: wms_url.to_string(),
            layers: layer.name.clone(),
            format: layer.format.clone(),
            transparent: layer.transparent,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LayersFile {
    layers: Vec<LayerSpec>,
}

/// Ordered, id-unique list of layers.
#[derive(Debug, Clone, Default)]
pub struct LayerCatalog {
    layers: Vec<LayerSpec>,
}

impl LayerCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(layers: Vec<LayerSpec>) -> MapResult<Self> {
        let mut seen = HashSet::new();
        for layer in &layers {
            if !seen.insert(layer.id.as_str()) {
                return Err(MapError::DuplicateLayer(layer.id.clone()));
            }
        }
        Ok(Self { layers })
    }

    /// Parse a `layers:` YAML document.
    pub fn from_yaml_str(yaml: &str) -> MapResult<Self> {
        let file: LayersFile = serde_yaml::from_str(yaml)?;
        Self::new(file.layers)
    }

    /// Load the catalog from a YAML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| MapError::ConfigRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let catalog = Self::from_yaml_str(&content)?;
        info!(
            count = catalog.len(),
            path = %path.display(),
            "Loaded layer catalog"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayerSpec> {
        self.layers.iter()
    }

    pub fn get(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Visible layers in catalog order.
    pub fn visible_layers(&self, overrides: &HashMap<String, bool>) -> Vec<&LayerSpec> {
        self.layers
            .iter()
            .filter(|l| l.is_visible(overrides))
            .collect()
    }

    /// Configured default visibility for every layer.
    pub fn default_visibility(&self) -> HashMap<String, bool> {
        self.layers
            .iter()
            .map(|l| (l.id.clone(), l.visible))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES_YAML: &str = r#"
layers:
  - id: states
    name: "topp:states"
    visible: true
    transparent: true
    infoFormat: application/json
    srs: "EPSG:3857"
    wfsTypeName: "topp:states"
    idField: STATE_NAME
    geomField: the_geom
  - id: roads
    name: "tiger:roads"
    visible: false
    srs: "EPSG:4326"
"#;

    #[test]
    fn test_parse_layers_yaml() {
        let catalog = LayerCatalog::from_yaml_str(STATES_YAML).unwrap();
        assert_eq!(catalog.len(), 2);

        let states = catalog.get("states").unwrap();
        assert_eq!(states.name, "topp:states");
        assert_eq!(states.wfs_type_name.as_deref(), Some("topp:states"));
        assert_eq!(states.id_field.as_deref(), Some("STATE_NAME"));
        assert_eq!(states.srs, CrsCode::Epsg3857);

        let roads = catalog.get("roads").unwrap();
        assert_eq!(roads.format, "image/png");
        assert!(roads.transparent);
        assert_eq!(roads.info_format, "application/json");
        assert_eq!(roads.srs, CrsCode::Epsg4326);
        assert_eq!(roads.geometry_field(), DEFAULT_GEOMETRY_FIELD);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = LayerCatalog::new(vec![
            LayerSpec::new("a", "ns:a"),
            LayerSpec::new("a", "ns:b"),
        ])
        .unwrap_err();
        assert!(matches!(err, MapError::DuplicateLayer(id) if id == "a"));
    }

    #[test]
    fn test_unsupported_srs_is_parse_error() {
        let yaml = "layers:\n  - id: x\n    name: ns:x\n    srs: EPSG:27700\n";
        assert!(matches!(
            LayerCatalog::from_yaml_str(yaml),
            Err(MapError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_visible_layers_respects_overrides_and_order() {
        let catalog = LayerCatalog::new(vec![
            LayerSpec::new("a", "ns:a"),
            LayerSpec::new("b", "ns:b").with_visible(false),
            LayerSpec::new("c", "ns:c"),
        ])
        .unwrap();

        let mut overrides = HashMap::new();
        overrides.insert("b".to_string(), true);
        overrides.insert("c".to_string(), false);

        let ids: Vec<&str> = catalog
            .visible_layers(&overrides)
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_tile_source_for_layer() {
        let layer = LayerSpec::new("states", "topp:states");
        let source = WmsTileSource::for_layer(&layer, "https://example.com/wms");
        assert_eq!(source.layers, "topp:states");
        assert_eq!(source.format, "image/png");
        assert!(source.transparent);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layers.yaml");
        std::fs::write(&path, STATES_YAML).unwrap();

        let catalog = LayerCatalog::load_from_file(&path).unwrap();
        assert_eq!(catalog.iter().next().unwrap().id, "states");

        let missing = LayerCatalog::load_from_file(dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(MapError::ConfigRead { .. })));
    }
}
