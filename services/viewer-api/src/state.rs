//! Application state for the viewer API.

use std::sync::Arc;

use anyhow::{Context, Result};
use identify::{Identifier, MapState};
use map_common::LayerCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use ogc_protocol::{HttpFetcher, ReqwestFetcher, WfsClient, WmsClient};

use crate::config::ViewerConfig;

/// Shared application state.
pub struct AppState {
    pub config: ViewerConfig,

    /// Overlay layers in identify priority order.
    pub catalog: LayerCatalog,

    /// Visibility, popup and highlight observed by the front-end.
    pub map_state: Arc<MapState>,

    pub identifier: Identifier,

    /// Prometheus recorder handle, absent when no recorder was installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state from configuration, talking to the real OGC endpoints.
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let catalog = config.load_catalog()?;
        let fetcher = ReqwestFetcher::new(config.request_timeout)
            .context("Failed to build HTTP client")?;
        Ok(Self::with_fetcher(config, catalog, Arc::new(fetcher)))
    }

    /// Build state around an explicit fetcher.
    pub fn with_fetcher(
        config: ViewerConfig,
        catalog: LayerCatalog,
        fetcher: Arc<dyn HttpFetcher>,
    ) -> Self {
        let map_state = Arc::new(MapState::with_catalog(&catalog));
        let identifier = Identifier::new(
            WmsClient::new(config.wms_url.clone(), fetcher.clone()),
            WfsClient::new(config.wfs_url.clone(), fetcher),
            map_state.clone(),
        );

        Self {
            config,
            catalog,
            map_state,
            identifier,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
