//! Viewer configuration: service endpoints, basemap and initial view.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use map_common::{CrsCode, LayerCatalog, LayerSpec};
use serde::Serialize;
use tracing::warn;

pub const DEFAULT_WMS_URL: &str = "https://ahocevar.com/geoserver/wms";
pub const DEFAULT_WFS_URL: &str = "https://ahocevar.com/geoserver/wfs";
pub const DEFAULT_LAYERS_FILE: &str = "config/layers.yaml";

pub const BASEMAP_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const BASEMAP_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Background tile layer drawn under the WMS overlays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasemapConfig {
    pub url_template: String,
    pub attribution: String,
}

impl Default for BasemapConfig {
    fn default() -> Self {
        Self {
            url_template: BASEMAP_URL_TEMPLATE.to_string(),
            attribution: BASEMAP_ATTRIBUTION.to_string(),
        }
    }
}

/// Map view shown on load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitialView {
    /// `[lat, lng]`
    pub center: [f64; 2],
    pub zoom: f64,
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            center: [39.0, -98.0],
            zoom: 4.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub wms_url: String,
    pub wfs_url: String,
    pub layers_file: PathBuf,
    pub basemap: BasemapConfig,
    pub initial_view: InitialView,
    /// Per-request timeout for WMS/WFS calls; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            wms_url: DEFAULT_WMS_URL.to_string(),
            wfs_url: DEFAULT_WFS_URL.to_string(),
            layers_file: PathBuf::from(DEFAULT_LAYERS_FILE),
            basemap: BasemapConfig::default(),
            initial_view: InitialView::default(),
            request_timeout: None,
        }
    }
}

impl ViewerConfig {
    /// Load the layer catalog.
    ///
    /// A missing file falls back to the built-in states layer; an unreadable
    /// or invalid one is an error.
    pub fn load_catalog(&self) -> Result<LayerCatalog> {
        load_catalog_from(&self.layers_file)
    }
}

fn load_catalog_from(path: &Path) -> Result<LayerCatalog> {
    if !path.exists() {
        warn!(
            path = %path.display(),
            "Layer config does not exist, using built-in layers"
        );
        return default_catalog();
    }

    LayerCatalog::load_from_file(path)
        .with_context(|| format!("Failed to load layer config: {}", path.display()))
}

/// The `topp:states` demo layer with its WFS fallback.
pub fn default_catalog() -> Result<LayerCatalog> {
    let states = LayerSpec::new("states", "topp:states")
        .with_srs(CrsCode::Epsg3857)
        .with_wfs("topp:states")
        .with_geom_field("the_geom");
    Ok(LayerCatalog::new(vec![states])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.wms_url, "https://ahocevar.com/geoserver/wms");
        assert_eq!(config.wfs_url, "https://ahocevar.com/geoserver/wfs");
        assert_eq!(config.initial_view.center, [39.0, -98.0]);
        assert_eq!(config.initial_view.zoom, 4.0);
        assert!(config.request_timeout.is_none());
        assert_eq!(
            config.basemap.url_template,
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
        );
    }

    #[test]
    fn test_missing_file_uses_default_catalog() {
        let config = ViewerConfig {
            layers_file: PathBuf::from("/nonexistent/layers.yaml"),
            ..Default::default()
        };
        let catalog = config.load_catalog().unwrap();
        let states = catalog.get("states").unwrap();
        assert_eq!(states.wfs_type_name.as_deref(), Some("topp:states"));
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "layers:\n  - id: a\n    name: x\n  - id: a\n    name: y").unwrap();

        let config = ViewerConfig {
            layers_file: file.path().to_path_buf(),
            ..Default::default()
        };
        let err = config.load_catalog().unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load layer config"));
    }

    #[test]
    fn test_shipped_layer_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/layers.yaml");
        let catalog = load_catalog_from(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("states").unwrap().geometry_field(), "the_geom");
    }
}
