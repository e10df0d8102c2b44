#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map session state.
//!
//! A [`MapSession`] owns what the UI shell owns in the browser: the current
//! parcel batch and the selected parcel. Every change runs the viewport
//! controller, and [`MapSession::render_model`] rebuilds the shapes to draw
//! from the same state.

use std::sync::Arc;

use parcel_map_parcel_models::{Parcel, ParcelKey};
use parcel_map_render::RenderDescriptor;
use parcel_map_viewport::{Reaction, ViewportConfig, ViewportController, ViewportSink};

/// The parcel batch and selection currently on the map.
pub struct MapSession {
    parcels: Vec<Parcel>,
    selected: Option<ParcelKey>,
    viewport: ViewportController,
}

impl MapSession {
    /// Creates an empty session whose viewport instructions go to `sink`.
    #[must_use]
    pub fn new(config: ViewportConfig, sink: Arc<dyn ViewportSink>) -> Self {
        Self {
            parcels: Vec::new(),
            selected: None,
            viewport: ViewportController::new(config, sink),
        }
    }

    /// The current batch.
    #[must_use]
    pub fn parcels(&self) -> &[Parcel] {
        &self.parcels
    }

    /// Key of the selected parcel.
    #[must_use]
    pub const fn selected(&self) -> Option<&ParcelKey> {
        self.selected.as_ref()
    }

    /// The selected parcel.
    #[must_use]
    pub fn selected_parcel(&self) -> Option<&Parcel> {
        let index = position(&self.parcels, self.selected.as_ref()?)?;
        self.parcels.get(index)
    }

    /// Replaces the batch with a new search result and clears the
    /// selection.
    pub fn set_parcels(&mut self, parcels: Vec<Parcel>) -> Reaction {
        log::info!("Showing {} parcels", parcels.len());
        self.parcels = parcels;
        self.selected = None;
        self.react()
    }

    /// Selects the parcel with `key`.
    ///
    /// Returns `None`, leaving the selection unchanged, when no parcel in
    /// the current batch has that key.
    pub fn select(&mut self, key: &ParcelKey) -> Option<Reaction> {
        if position(&self.parcels, key).is_none() {
            log::warn!("No parcel with key {key:?} in the current batch");
            return None;
        }

        self.selected = Some(key.clone());
        Some(self.react())
    }

    /// Clears the selection, returning the map to the whole batch.
    pub fn clear_selection(&mut self) -> Reaction {
        self.selected = None;
        self.react()
    }

    /// Shapes to draw for the current batch and selection.
    #[must_use]
    pub fn render_model(&self) -> Vec<RenderDescriptor<'_>> {
        parcel_map_render::build(&self.parcels, self.selected.as_ref())
    }

    /// Keys of every parcel in the batch, in order.
    #[must_use]
    pub fn keys(&self) -> Vec<ParcelKey> {
        self.parcels
            .iter()
            .enumerate()
            .map(|(index, parcel)| ParcelKey::for_parcel(parcel, index))
            .collect()
    }

    fn react(&mut self) -> Reaction {
        let selected = self
            .selected
            .as_ref()
            .and_then(|key| position(&self.parcels, key))
            .and_then(|index| self.parcels.get(index));
        self.viewport.update(&self.parcels, selected)
    }
}

/// Index of the parcel whose key is `key`.
fn position(parcels: &[Parcel], key: &ParcelKey) -> Option<usize> {
    parcels
        .iter()
        .enumerate()
        .position(|(index, parcel)| ParcelKey::for_parcel(parcel, index) == *key)
}
