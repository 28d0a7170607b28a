//! Layer listing and visibility toggles.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use map_common::{CrsCode, LayerCatalog, MapError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// A layer as shown in the layer switcher.
#[derive(Debug, Serialize)]
pub struct LayerEntry {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub srs: CrsCode,
    pub info_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wfs_type_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

fn layer_entries(catalog: &LayerCatalog, visibility: &HashMap<String, bool>) -> Vec<LayerEntry> {
    catalog
        .iter()
        .map(|layer| LayerEntry {
            id: layer.id.clone(),
            name: layer.name.clone(),
            visible: layer.is_visible(visibility),
            srs: layer.srs,
            info_format: layer.info_format.clone(),
            wfs_type_name: layer.wfs_type_name.clone(),
        })
        .collect()
}

/// GET /layers
pub async fn list_layers_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<Vec<LayerEntry>> {
    Json(layer_entries(&state.catalog, &state.map_state.visibility()))
}

/// PUT /layers/:id/visibility
pub async fn set_visibility_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(layer_id): Path<String>,
    Json(request): Json<VisibilityRequest>,
) -> Result<Json<Vec<LayerEntry>>, ApiError> {
    if state.catalog.get(&layer_id).is_none() {
        return Err(MapError::LayerNotFound(layer_id).into());
    }

    state.map_state.set_visibility(&layer_id, request.visible);
    info!(layer = %layer_id, visible = request.visible, "Layer visibility changed");

    Ok(Json(layer_entries(
        &state.catalog,
        &state.map_state.visibility(),
    )))
}
