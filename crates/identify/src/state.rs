//! Shared map state observed by the renderer.
//!
//! Every mutation replaces whole fields of a [`MapSnapshot`] and is broadcast
//! through a `watch` channel, so observers only ever see complete snapshots.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use map_common::{AttrRecord, Feature, LatLng, LayerCatalog};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

/// A popup anchored at a geographic position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupState {
    pub position: LatLng,
    pub attributes: AttrRecord,
}

impl PopupState {
    pub fn new(position: LatLng, attributes: AttrRecord) -> Self {
        Self {
            position,
            attributes,
        }
    }

    /// `(key, display value)` rows in key order.
    pub fn rows(&self) -> Vec<(String, String)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.display()))
            .collect()
    }
}

/// Rendering hints for the highlighted feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightStyle {
    pub color: String,
    pub weight: u32,
    pub radius: u32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: "#ff3333".to_string(),
            weight: 3,
            radius: 6,
        }
    }
}

/// Everything the render sink needs at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapSnapshot {
    /// Layer id to visibility override
    pub visibility: HashMap<String, bool>,
    pub popup: Option<PopupState>,
    pub highlight: Option<Feature>,
    pub style: HighlightStyle,
}

/// Process-wide map state, owned by the application root.
///
/// Also hands out identify generations: a result is only published while
/// its generation is still the latest one issued.
pub struct MapState {
    tx: watch::Sender<MapSnapshot>,
    generation: AtomicU64,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new()
    }
}

impl MapState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(MapSnapshot::default());
        Self {
            tx,
            generation: AtomicU64::new(0),
        }
    }

    /// State with every catalog layer at its configured visibility.
    pub fn with_catalog(catalog: &LayerCatalog) -> Self {
        let state = Self::new();
        state.init_visibility(catalog);
        state
    }

    /// Fill in default visibility for layers that have no override yet.
    pub fn init_visibility(&self, catalog: &LayerCatalog) {
        let defaults = catalog.default_visibility();
        self.tx.send_modify(|snap| {
            let mut visibility = snap.visibility.clone();
            for (id, visible) in defaults {
                visibility.entry(id).or_insert(visible);
            }
            snap.visibility = visibility;
        });
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> MapSnapshot {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<MapSnapshot> {
        self.tx.subscribe()
    }

    pub fn visibility(&self) -> HashMap<String, bool> {
        self.tx.borrow().visibility.clone()
    }

    pub fn set_visibility(&self, layer_id: &str, visible: bool) {
        self.tx.send_modify(|snap| {
            let mut visibility = snap.visibility.clone();
            visibility.insert(layer_id.to_string(), visible);
            snap.visibility = visibility;
        });
    }

    pub fn set_highlight(&self, feature: Option<Feature>) {
        self.tx.send_modify(|snap| snap.highlight = feature);
    }

    pub fn show_popup(&self, position: LatLng, attributes: AttrRecord) {
        self.tx
            .send_modify(|snap| snap.popup = Some(PopupState::new(position, attributes)));
    }

    pub fn hide_popup(&self) {
        self.tx.send_modify(|snap| snap.popup = None);
    }

    /// Start an identify operation: clear popup and highlight, return its
    /// generation.
    pub fn begin_identify(&self) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|snap| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            snap.popup = None;
            snap.highlight = None;
        });
        generation
    }

    /// Latest generation handed out by [`MapState::begin_identify`].
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Publish an identify result for `generation`.
    ///
    /// Returns false, leaving state untouched, if a newer identify has
    /// started since.
    pub fn publish(&self, generation: u64, popup: PopupState, highlight: Feature) -> bool {
        let published = self.tx.send_if_modified(|snap| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            snap.popup = Some(popup);
            snap.highlight = Some(highlight);
            true
        });

        if !published {
            debug!(
                generation,
                latest = self.current_generation(),
                "Dropping stale identify result"
            );
        }
        published
    }
}
