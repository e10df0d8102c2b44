//! The reactive viewport state machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parcel_map_geometry::{bounds_of, normalize_geometry, valid_points};
use parcel_map_parcel_models::{LatLng, LatLngBounds, Parcel};
use parcel_map_viewport_models::ViewportInstruction;
use tokio::task::JoinHandle;

use crate::ViewportConfig;

/// Receives viewport instructions; typically the map surface.
pub trait ViewportSink: Send + Sync {
    /// Carry out `instruction`.
    fn apply(&self, instruction: ViewportInstruction);
}

impl ViewportSink for tokio::sync::mpsc::UnboundedSender<ViewportInstruction> {
    fn apply(&self, instruction: ViewportInstruction) {
        if self.send(instruction).is_err() {
            log::debug!("Viewport receiver dropped, discarding {}", instruction.label());
        }
    }
}

/// What one call to [`ViewportController::update`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    /// The instruction was handed to the sink immediately.
    Applied(ViewportInstruction),
    /// The instruction will be handed to the sink after the settle delay,
    /// unless the inputs change first.
    Scheduled(ViewportInstruction),
    /// Nothing to do; the current view stands.
    Idle,
}

/// Decides what region the map shows for a parcel batch and selection.
///
/// Holds no state about the batch itself, only the one pending settle task.
/// Call [`update`](Self::update) on every change of either input.
pub struct ViewportController {
    config: ViewportConfig,
    sink: Arc<dyn ViewportSink>,
    pending: Option<JoinHandle<()>>,
    /// Bumped on every update; a settle task only applies its fit if the
    /// generation it was scheduled under is still current.
    generation: Arc<AtomicU64>,
}

impl ViewportController {
    /// Creates a controller that sends instructions to `sink`.
    #[must_use]
    pub fn new(config: ViewportConfig, sink: Arc<dyn ViewportSink>) -> Self {
        Self {
            config,
            sink,
            pending: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The controller's configuration.
    #[must_use]
    pub const fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Whether a fit is waiting for its settle delay.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Reacts to a new `(parcels, selected)` pair.
    ///
    /// Any pending fit is cancelled first. With a selection, centers on it
    /// and never fits. Without one, shows the default region for an empty
    /// batch or schedules a fit to the batch's bounds.
    pub fn update(&mut self, parcels: &[Parcel], selected: Option<&Parcel>) -> Reaction {
        self.cancel();

        match selected {
            Some(parcel) => self.center_on(parcel),
            None => self.fit_region(parcels),
        }
    }

    /// Cancels any pending fit.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                log::debug!("Cancelling pending viewport fit");
            }
            handle.abort();
        }
    }

    fn center_on(&self, parcel: &Parcel) -> Reaction {
        let Some(center) = first_point(parcel) else {
            log::debug!(
                "Selected parcel {:?} has no usable position, keeping current view",
                parcel.address
            );
            return Reaction::Idle;
        };

        let instruction = ViewportInstruction::CenterOn {
            center,
            zoom: self.config.selection_zoom,
            animate: self.config.animate,
        };
        self.sink.apply(instruction);
        Reaction::Applied(instruction)
    }

    fn fit_region(&mut self, parcels: &[Parcel]) -> Reaction {
        if parcels.is_empty() {
            let instruction = ViewportInstruction::ShowDefault {
                center: self.config.default_center,
                zoom: self.config.default_zoom,
                animate: self.config.animate,
            };
            self.sink.apply(instruction);
            return Reaction::Applied(instruction);
        }

        let Some(bounds) = batch_bounds(parcels) else {
            log::debug!(
                "No valid positions across {} parcels, keeping current view",
                parcels.len()
            );
            return Reaction::Idle;
        };

        let instruction = ViewportInstruction::FitBounds {
            bounds,
            padding: self.config.fit_padding,
            max_zoom: self.config.fit_max_zoom,
            animate: self.config.animate,
        };
        self.schedule(instruction)
    }

    fn schedule(&mut self, instruction: ViewportInstruction) -> Reaction {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::error!("No async runtime available, cannot schedule viewport fit");
            return Reaction::Idle;
        };

        let delay = self.config.settle_delay();
        let sink = Arc::clone(&self.sink);
        let generation = Arc::clone(&self.generation);
        let scheduled_under = generation.load(Ordering::SeqCst);

        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == scheduled_under {
                sink.apply(instruction);
            } else {
                log::debug!("Discarding stale viewport fit");
            }
        }));

        Reaction::Scheduled(instruction)
    }
}

impl Drop for ViewportController {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// First position of the first normalized ring of `parcel`.
fn first_point(parcel: &Parcel) -> Option<LatLng> {
    let rings = normalize_geometry(parcel.geometry.as_ref()?);
    rings.first()?.first().copied()
}

/// Bounds of every valid position in every ring of every parcel.
fn batch_bounds(parcels: &[Parcel]) -> Option<LatLngBounds> {
    let points: Vec<LatLng> = parcels
        .iter()
        .filter_map(|parcel| parcel.geometry.as_ref())
        .flat_map(|geometry| {
            let rings = normalize_geometry(geometry);
            valid_points(&rings).collect::<Vec<_>>()
        })
        .collect();

    bounds_of(points)
}
