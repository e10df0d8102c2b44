//! The map as the CLI sees it: one session plus the instructions it emits.

use std::sync::Arc;
use std::time::Duration;

use parcel_map_parcel_models::{Parcel, ParcelKey};
use parcel_map_search::SearchTurn;
use parcel_map_session::MapSession;
use parcel_map_viewport::{Reaction, ViewportConfig, ViewportInstruction};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use crate::input::CliError;
use crate::report;

/// A [`MapSession`] wired to an in-process viewport channel.
pub struct MapView {
    session: MapSession,
    rx: UnboundedReceiver<ViewportInstruction>,
    settle_delay: Duration,
}

impl MapView {
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        let settle_delay = config.settle_delay();
        let (tx, rx) = unbounded_channel();
        Self {
            session: MapSession::new(config, Arc::new(tx)),
            rx,
            settle_delay,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &MapSession {
        &self.session
    }

    /// Shows `parcels`, then selects `select` if given.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnknownKey`] if no parcel has the `select` key.
    pub fn show_batch(
        &mut self,
        parcels: Vec<Parcel>,
        select: Option<&ParcelKey>,
    ) -> Result<Reaction, CliError> {
        let reaction = self.session.set_parcels(parcels);
        let Some(key) = select else {
            return Ok(reaction);
        };
        self.session
            .select(key)
            .ok_or_else(|| CliError::UnknownKey(key.to_string()))
    }

    /// Puts a search turn on the map.
    ///
    /// Error turns clear the map. A turn that found nothing leaves the
    /// current batch in place and yields `None`.
    pub fn apply_turn(&mut self, turn: SearchTurn) -> Option<Reaction> {
        if !turn.is_error && turn.parcels.is_empty() {
            log::debug!("Search turn found nothing, keeping the current batch");
            return None;
        }
        Some(self.session.set_parcels(turn.parcels))
    }

    /// Waits for the instruction `reaction` will eventually produce.
    pub async fn settle(&mut self, reaction: Reaction) -> Option<ViewportInstruction> {
        report::settle(reaction, &mut self.rx, self.settle_delay).await
    }
}
