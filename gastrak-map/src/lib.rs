//! Station map and price history panel controller.
//!
//! The crate is toolkit-agnostic: the map, the viewport, the dialog, and the
//! chart engine are reached through the traits in [`surface`], [`map`] and
//! [`panel::chart`]. The [`headless`] module provides in-memory
//! implementations of all of them.

pub mod api;
pub mod dismiss;
pub mod feed;
pub mod geo;
pub mod grade;
pub mod headless;
pub mod history;
pub mod map;
pub mod marker;
pub mod navigation;
pub mod panel;
mod prelude;
pub mod surface;
#[cfg(test)]
mod testing;
