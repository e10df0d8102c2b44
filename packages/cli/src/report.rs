//! Text output for the render model and viewport.

use std::fmt::Write as _;
use std::time::Duration;

use parcel_map_render::RenderDescriptor;
use parcel_map_viewport::{Reaction, SurfaceSize, ViewportInstruction};
use tokio::sync::mpsc::UnboundedReceiver;

/// Waits for the instruction a reaction will eventually produce.
///
/// Applied instructions are returned as-is. A scheduled fit is awaited for
/// up to `settle` plus a grace period, and idle reactions yield `None`.
pub async fn settle(
    reaction: Reaction,
    rx: &mut UnboundedReceiver<ViewportInstruction>,
    settle: Duration,
) -> Option<ViewportInstruction> {
    match reaction {
        Reaction::Applied(instruction) => Some(instruction),
        Reaction::Idle => None,
        Reaction::Scheduled(expected) => {
            let deadline = settle + Duration::from_secs(1);
            let mut latest = None;
            while let Ok(Some(instruction)) = tokio::time::timeout(deadline, rx.recv()).await {
                latest = Some(instruction);
                if instruction == expected {
                    break;
                }
            }
            if latest.is_none() {
                log::warn!("Timed out waiting for the viewport to settle");
            }
            latest
        }
    }
}

/// One line per descriptor, plus a header.
#[must_use]
pub fn describe_model(total: usize, model: &[RenderDescriptor<'_>]) -> String {
    let mut out = format!("{} of {total} parcels rendered\n", model.len());

    for descriptor in model {
        let popup = descriptor.popup();
        let marker = if descriptor.selected { "*" } else { " " };
        writeln!(
            out,
            "{marker} {:<32} {}, {} County, {} acres ({} ring(s), {} points)",
            descriptor.key.as_str(),
            popup.title,
            popup.county,
            popup.acres,
            descriptor.rings.len(),
            descriptor.point_count(),
        )
        .unwrap();
    }

    out
}

/// Human-readable viewport instruction and where it lands on `surface`.
#[must_use]
pub fn describe_viewport(instruction: Option<&ViewportInstruction>, surface: SurfaceSize) -> String {
    let Some(instruction) = instruction else {
        return "viewport: unchanged\n".to_string();
    };

    let mut out = match instruction {
        ViewportInstruction::FitBounds {
            bounds, max_zoom, ..
        } => format!(
            "viewport: fit {} .. {} (max zoom {max_zoom})\n",
            bounds.south_west(),
            bounds.north_east()
        ),
        ViewportInstruction::CenterOn { center, zoom, .. } => {
            format!("viewport: center on {center} at zoom {zoom}\n")
        }
        ViewportInstruction::ShowDefault { center, zoom, .. } => {
            format!("viewport: default region {center} at zoom {zoom}\n")
        }
    };

    let view = instruction.resolve(surface);
    writeln!(
        out,
        "resolved on {}x{}: center {} zoom {}",
        surface.width, surface.height, view.center, view.zoom
    )
    .unwrap();
    out
}
