//! Map state for the render sink.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use identify::MapSnapshot;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub snapshot: MapSnapshot,
    /// Popup attributes as display rows, null values already substituted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_rows: Option<Vec<(String, String)>>,
}

impl From<MapSnapshot> for StateResponse {
    fn from(snapshot: MapSnapshot) -> Self {
        let popup_rows = snapshot.popup.as_ref().map(|p| p.rows());
        Self {
            snapshot,
            popup_rows,
        }
    }
}

/// GET /state
pub async fn get_state_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<StateResponse> {
    Json(state.map_state.snapshot().into())
}

/// DELETE /popup - the user closed the popup
pub async fn hide_popup_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<StateResponse> {
    state.map_state.hide_popup();
    Json(state.map_state.snapshot().into())
}
