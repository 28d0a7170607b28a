//! HTTP request handlers for the viewer API.

pub mod click;
pub mod health;
pub mod layers;
pub mod state;
pub mod view;
