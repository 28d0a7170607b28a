//! Click-to-identify for WMS layers.
//!
//! [`Identifier`] turns a map click into at most one published feature,
//! querying each visible layer's WMS GetFeatureInfo and falling back to a
//! WFS bounding-box query. Results land in [`MapState`], which the render
//! sink observes.

pub mod orchestrator;
pub mod state;

pub use orchestrator::{ClickEvent, IdentifyOutcome, Identifier, MatchSource};
pub use state::{HighlightStyle, MapSnapshot, MapState, PopupState};
