//! Initial viewer configuration for the front-end.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use map_common::WmsTileSource;
use serde::Serialize;

use crate::config::{BasemapConfig, InitialView};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ViewConfigResponse {
    pub basemap: BasemapConfig,
    pub initial_view: InitialView,
    /// One WMS tile source per visible layer, in draw order.
    pub tile_sources: Vec<WmsTileSource>,
}

/// GET /config
pub async fn config_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<ViewConfigResponse> {
    let visibility = state.map_state.visibility();
    let tile_sources = state
        .catalog
        .visible_layers(&visibility)
        .into_iter()
        .map(|layer| WmsTileSource::for_layer(layer, &state.config.wms_url))
        .collect();

    Json(ViewConfigResponse {
        basemap: state.config.basemap.clone(),
        initial_view: state.config.initial_view.clone(),
        tile_sources,
    })
}
