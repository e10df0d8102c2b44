#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Viewport control for the parcel map.
//!
//! The [`ViewportController`] reacts to every change of the parcel batch or
//! the selection and tells a [`ViewportSink`] what region to show:
//!
//! - selection set: center on the selected parcel's first point, at once
//! - no selection, empty batch: show the default region, at once
//! - no selection, results: fit their bounds after a short settle delay
//!
//! The settle step runs as a `tokio` task that is aborted whenever the
//! inputs change again, so at most one fit is ever outstanding and a stale
//! fit never lands after a newer state.

pub mod config;
pub mod controller;

pub use config::{ConfigError, ViewportConfig};
pub use controller::{Reaction, ViewportController, ViewportSink};
pub use parcel_map_viewport_models::{
    Padding, ResolvedView, SurfaceSize, ViewportInstruction, fit_bounds, visible_bounds,
};
