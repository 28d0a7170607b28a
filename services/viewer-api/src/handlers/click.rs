//! Click handling.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use identify::{ClickEvent, IdentifyOutcome, MapSnapshot};
use map_common::{LatLng, ScreenPoint, WebMercatorViewport};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// The map view at the time of the click.
#[derive(Debug, Deserialize)]
pub struct ViewportParams {
    pub center: LatLng,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Deserialize)]
pub struct IdentifyRequest {
    pub viewport: ViewportParams,
    /// Click position in container pixels
    pub point: ScreenPoint,
}

#[derive(Debug, Serialize)]
pub struct IdentifyResponse {
    pub outcome: IdentifyOutcome,
    #[serde(flatten)]
    pub state: MapSnapshot,
}

/// POST /identify
pub async fn identify_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<IdentifyRequest>,
) -> Result<Json<IdentifyResponse>, ApiError> {
    let ViewportParams {
        center,
        zoom,
        width,
        height,
    } = request.viewport;
    let viewport = WebMercatorViewport::try_new(center, zoom, width, height)?;
    let click = ClickEvent::at_point(&viewport, request.point);

    let outcome = state
        .identifier
        .identify_visible(&click, &state.catalog)
        .await;

    Ok(Json(IdentifyResponse {
        outcome,
        state: state.map_state.snapshot(),
    }))
}
