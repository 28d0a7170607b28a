//! Per-click identify: WMS GetFeatureInfo first, WFS bounding-box query as a
//! fallback, layer by layer until something matches.

use std::sync::Arc;

use map_common::bbox::DEFAULT_CLICK_PAD_PX;
use map_common::{
    BoundingBox, Feature, LatLng, LayerCatalog, LayerSpec, ScreenPoint, ViewportProvider,
};
use metrics::counter;
use ogc_protocol::{
    cql, GetFeatureInfoRequest, GetFeatureRequest, OgcResult, WfsClient, WmsClient,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::state::{MapState, PopupState};

/// A click on the map.
#[derive(Clone, Copy)]
pub struct ClickEvent<'a> {
    /// Geographic position of the click
    pub latlng: LatLng,
    /// Container pixel of the click
    pub point: ScreenPoint,
    /// View the click happened in
    pub viewport: &'a dyn ViewportProvider,
}

impl<'a> ClickEvent<'a> {
    pub fn new(latlng: LatLng, point: ScreenPoint, viewport: &'a dyn ViewportProvider) -> Self {
        Self {
            latlng,
            point,
            viewport,
        }
    }

    /// Click at a container pixel, geographic position taken from the view.
    pub fn at_point(viewport: &'a dyn ViewportProvider, point: ScreenPoint) -> Self {
        Self::new(viewport.container_point_to_latlng(point), point, viewport)
    }
}

/// Which service produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    Wms,
    Wfs,
}

impl MatchSource {
    fn as_str(&self) -> &'static str {
        match self {
            MatchSource::Wms => "wms",
            MatchSource::Wfs => "wfs",
        }
    }
}

/// How an identify call ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum IdentifyOutcome {
    /// A feature was found and published.
    Matched { layer_id: String, source: MatchSource },
    /// No layer had anything at the click.
    NoMatch,
    /// A feature was found but a newer click had started, so it was dropped.
    Superseded { layer_id: String, source: MatchSource },
}

/// Runs identify for clicks and publishes results into [`MapState`].
#[derive(Clone)]
pub struct Identifier {
    wms: WmsClient,
    wfs: WfsClient,
    state: Arc<MapState>,
    pad_px: f64,
}

impl Identifier {
    pub fn new(wms: WmsClient, wfs: WfsClient, state: Arc<MapState>) -> Self {
        Self {
            wms,
            wfs,
            state,
            pad_px: DEFAULT_CLICK_PAD_PX,
        }
    }

    pub fn state(&self) -> &Arc<MapState> {
        &self.state
    }

    /// Identify the feature under a click.
    ///
    /// `layers` are the visible layers in priority order. Popup and highlight
    /// are cleared before any request goes out; the first layer with a match
    /// wins and later layers are not queried. Failures for one layer are
    /// logged and the next layer is tried.
    pub async fn identify(
        &self,
        click: &ClickEvent<'_>,
        layers: &[&LayerSpec],
    ) -> IdentifyOutcome {
        let generation = self.state.begin_identify();
        counter!("identify_requests_total").increment(1);
        debug!(
            generation,
            lat = click.latlng.lat,
            lng = click.latlng.lng,
            layers = layers.len(),
            "Identify started"
        );

        for layer in layers {
            let Some((feature, source)) = self.identify_layer(click, layer).await else {
                continue;
            };

            counter!("identify_matches_total", "source" => source.as_str()).increment(1);
            let popup = PopupState::new(click.latlng, feature.properties.clone());
            let layer_id = layer.id.clone();

            if self.state.publish(generation, popup, feature) {
                info!(layer = %layer_id, source = source.as_str(), "Identify matched");
                return IdentifyOutcome::Matched { layer_id, source };
            }
            counter!("identify_superseded_total").increment(1);
            return IdentifyOutcome::Superseded { layer_id, source };
        }

        counter!("identify_no_match_total").increment(1);
        debug!(generation, "Identify found nothing");
        IdentifyOutcome::NoMatch
    }

    /// Identify against the catalog layers currently visible in the state.
    pub async fn identify_visible(
        &self,
        click: &ClickEvent<'_>,
        catalog: &LayerCatalog,
    ) -> IdentifyOutcome {
        let visibility = self.state.visibility();
        let layers = catalog.visible_layers(&visibility);
        self.identify(click, &layers).await
    }

    /// Try one layer: WMS, then WFS if the layer has a vector type.
    async fn identify_layer(
        &self,
        click: &ClickEvent<'_>,
        layer: &LayerSpec,
    ) -> Option<(Feature, MatchSource)> {
        match self.query_wms(click, layer).await {
            Ok(Some(feature)) => return Some((feature, MatchSource::Wms)),
            Ok(None) => {}
            Err(e) => {
                counter!("identify_layer_errors_total", "step" => "wms").increment(1);
                warn!(layer = %layer.id, error = %e, "WMS GetFeatureInfo failed");
            }
        }

        let type_name = layer.wfs_type_name.as_deref()?;
        match self.query_wfs(click, layer, type_name).await {
            Ok(Some(feature)) => Some((feature, MatchSource::Wfs)),
            Ok(None) => None,
            Err(e) => {
                counter!("identify_layer_errors_total", "step" => "wfs").increment(1);
                warn!(layer = %layer.id, type_name, error = %e, "WFS fallback failed");
                None
            }
        }
    }

    async fn query_wms(
        &self,
        click: &ClickEvent<'_>,
        layer: &LayerSpec,
    ) -> OgcResult<Option<Feature>> {
        // Always JSON: the response is parsed as a FeatureCollection
        // regardless of the format the layer advertises.
        let request =
            GetFeatureInfoRequest::at_click(click.viewport, click.point, &layer.name, layer.srs);
        let collection = self.wms.get_feature_info(&request).await?;
        Ok(collection.into_first())
    }

    async fn query_wfs(
        &self,
        click: &ClickEvent<'_>,
        layer: &LayerSpec,
        type_name: &str,
    ) -> OgcResult<Option<Feature>> {
        let bbox = BoundingBox::around_point(click.viewport, click.point, layer.srs, self.pad_px);
        let request = GetFeatureRequest::new(type_name)
            .with_cql_filter(cql::bbox_filter(layer.geometry_field(), &bbox))
            .with_srs_name(layer.srs)
            .with_max_features(1);
        let collection = self.wfs.get_feature(&request).await?;
        Ok(collection.into_first())
    }
}
