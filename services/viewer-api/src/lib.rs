//! Viewer API Service Library
//!
//! HTTP backend for a browser map viewer: serves the layer catalog and
//! viewer settings, runs click-to-identify against the WMS/WFS endpoints and
//! exposes the resulting map state to the front-end.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Viewer setup
        .route("/config", get(handlers::view::config_handler))
        .route("/layers", get(handlers::layers::list_layers_handler))
        .route(
            "/layers/:id/visibility",
            put(handlers::layers::set_visibility_handler),
        )
        // Identify
        .route("/identify", post(handlers::click::identify_handler))
        .route("/state", get(handlers::state::get_state_handler))
        .route("/popup", delete(handlers::state::hide_popup_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
