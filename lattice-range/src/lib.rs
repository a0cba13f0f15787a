//! Lattice Range - background layout for large item collections.
//!
//! A [`RangeController`] measures each item's element tree on blocking
//! workers and streams the results to the presentation thread through
//! [`LayoutUpdates`]. Each item has at most one measurement in flight; a newer
//! request for a busy item replaces any request still waiting behind it, so
//! the last constraint handed to the controller is the one that lands.

mod config;
mod controller;
mod error;

pub use config::RangeControllerConfig;
pub use controller::{
    ElementFactory, LayoutSink, LayoutUpdate, LayoutUpdates, RangeController, RangeEvent,
};
pub use error::{RangeError, Result};
