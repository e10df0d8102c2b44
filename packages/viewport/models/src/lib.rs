#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Viewport instruction types for the parcel map.
//!
//! The viewport controller never moves a camera itself. It emits a
//! [`ViewportInstruction`] and the rendering surface carries it out. For
//! surfaces that want concrete numbers, [`ViewportInstruction::resolve`]
//! turns an instruction into a center and integer zoom using the same Web
//! Mercator tile math as common slippy maps.

use std::f64::consts::PI;

use parcel_map_parcel_models::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};

/// Width and height of one map tile in pixels at any zoom.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the spherical Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Pixel padding kept between fitted bounds and the surface edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    /// Horizontal padding on each side.
    pub x: u32,
    /// Vertical padding on each side.
    pub y: u32,
}

/// Measured size of the display surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// What the map should display next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViewportInstruction {
    /// Fit the view to a region.
    #[serde(rename_all = "camelCase")]
    FitBounds {
        /// Region that must be visible.
        bounds: LatLngBounds,
        /// Padding to keep around the region.
        padding: Padding,
        /// Never zoom in further than this.
        max_zoom: u8,
        /// Animate the camera move.
        animate: bool,
    },
    /// Center on a point at a fixed zoom.
    CenterOn {
        /// Point to center on.
        center: LatLng,
        /// Zoom level.
        zoom: u8,
        /// Animate the camera move.
        animate: bool,
    },
    /// Show the default region (no results).
    ShowDefault {
        /// Default center.
        center: LatLng,
        /// Default zoom level.
        zoom: u8,
        /// Animate the camera move.
        animate: bool,
    },
}

/// A concrete camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedView {
    /// Map center.
    pub center: LatLng,
    /// Integer zoom level.
    pub zoom: u8,
}

impl ViewportInstruction {
    /// Short label for logs and CLI output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FitBounds { .. } => "fit bounds",
            Self::CenterOn { .. } => "center on selection",
            Self::ShowDefault { .. } => "default region",
        }
    }

    /// Whether the camera move should be animated.
    #[must_use]
    pub const fn animate(&self) -> bool {
        match self {
            Self::FitBounds { animate, .. }
            | Self::CenterOn { animate, .. }
            | Self::ShowDefault { animate, .. } => *animate,
        }
    }

    /// Resolves this instruction to a center and zoom on a surface of the
    /// given size.
    #[must_use]
    pub fn resolve(&self, surface: SurfaceSize) -> ResolvedView {
        match *self {
            Self::FitBounds {
                bounds,
                padding,
                max_zoom,
                ..
            } => fit_bounds(bounds, padding, max_zoom, surface),
            Self::CenterOn { center, zoom, .. } | Self::ShowDefault { center, zoom, .. } => {
                ResolvedView { center, zoom }
            }
        }
    }
}

/// Finds the largest zoom, capped at `max_zoom`, at which `bounds` fits
/// inside `surface` minus `padding` on every side, centered on the bounds.
///
/// A degenerate (single point) region resolves to `max_zoom`. A surface too
/// small to hold the padding resolves to zoom 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fit_bounds(
    bounds: LatLngBounds,
    padding: Padding,
    max_zoom: u8,
    surface: SurfaceSize,
) -> ResolvedView {
    let (x0, y0) = project(bounds.south_west());
    let (x1, y1) = project(bounds.north_east());
    let center = unproject(f64::midpoint(x0, x1), f64::midpoint(y0, y1));

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let available_w = f64::from(surface.width) - 2.0 * f64::from(padding.x);
    let available_h = f64::from(surface.height) - 2.0 * f64::from(padding.y);

    let zoom = if available_w <= 0.0 || available_h <= 0.0 {
        0
    } else {
        let scale_x = if dx > 0.0 { available_w / dx } else { f64::INFINITY };
        let scale_y = if dy > 0.0 { available_h / dy } else { f64::INFINITY };
        let zoom = scale_x.min(scale_y).log2().floor();
        if zoom >= f64::from(max_zoom) {
            max_zoom
        } else if zoom <= 0.0 {
            0
        } else {
            zoom as u8
        }
    };

    ResolvedView { center, zoom }
}

/// The region visible on `surface` when centered on `center` at `zoom`.
#[must_use]
pub fn visible_bounds(center: LatLng, zoom: u8, surface: SurfaceSize) -> LatLngBounds {
    let scale = 2f64.powi(i32::from(zoom));
    let (cx, cy) = project(center);
    let half_w = f64::from(surface.width) / 2.0 / scale;
    let half_h = f64::from(surface.height) / 2.0 / scale;

    let north_west = unproject(cx - half_w, cy - half_h);
    let south_east = unproject(cx + half_w, cy + half_h);

    LatLngBounds {
        south: south_east.lat,
        west: north_west.lng,
        north: north_west.lat,
        east: south_east.lng,
    }
}

/// Projects to zoom-0 pixel coordinates (origin at the north-west corner).
#[must_use]
pub fn project(point: LatLng) -> (f64, f64) {
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = TILE_SIZE * (point.lng + 180.0) / 360.0;
    let y = TILE_SIZE * (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    (x, y)
}

/// Inverse of [`project`].
#[must_use]
pub fn unproject(x: f64, y: f64) -> LatLng {
    let lng = x / TILE_SIZE * 360.0 - 180.0;
    let n = PI - 2.0 * PI * y / TILE_SIZE;
    LatLng::new(n.sinh().atan().to_degrees(), lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: SurfaceSize = SurfaceSize {
        width: 800,
        height: 600,
    };
    const PADDING: Padding = Padding { x: 50, y: 50 };

    fn franklin_county() -> LatLngBounds {
        LatLngBounds {
            south: 42.40,
            west: -72.80,
            north: 42.75,
            east: -72.25,
        }
    }

    #[test]
    fn project_round_trips() {
        let point = LatLng::new(42.2373, -71.5314);
        let (x, y) = project(point);
        let back = unproject(x, y);
        assert!((back.lat - point.lat).abs() < 1e-9);
        assert!((back.lng - point.lng).abs() < 1e-9);
    }

    #[test]
    fn fit_covers_bounds_plus_padding() {
        let bounds = franklin_county();
        let view = fit_bounds(bounds, PADDING, 16, SURFACE);

        let visible = visible_bounds(view.center, view.zoom, SURFACE);
        assert!(visible.contains(bounds.south_west()), "{visible:?}");
        assert!(visible.contains(bounds.north_east()), "{visible:?}");

        // The padded region also fits.
        let scale = 2f64.powi(i32::from(view.zoom));
        let (x0, y0) = project(bounds.south_west());
        let (x1, y1) = project(bounds.north_east());
        assert!((x1 - x0).abs() * scale + 100.0 <= 800.0);
        assert!((y1 - y0).abs() * scale + 100.0 <= 600.0);

        // One level closer would no longer fit.
        let closer = scale * 2.0;
        assert!(
            (x1 - x0).abs() * closer + 100.0 > 800.0 || (y1 - y0).abs() * closer + 100.0 > 600.0
        );
    }

    #[test]
    fn fit_is_capped_at_max_zoom() {
        let tiny = LatLngBounds {
            south: 42.1000,
            west: -72.5001,
            north: 42.1001,
            east: -72.5000,
        };
        assert_eq!(fit_bounds(tiny, PADDING, 16, SURFACE).zoom, 16);
    }

    #[test]
    fn single_point_fits_at_max_zoom() {
        let point = LatLngBounds {
            south: 42.1,
            west: -72.5,
            north: 42.1,
            east: -72.5,
        };
        let view = fit_bounds(point, PADDING, 16, SURFACE);
        assert_eq!(view.zoom, 16);
        assert!((view.center.lat - 42.1).abs() < 1e-9);
    }

    #[test]
    fn surface_smaller_than_padding_resolves_to_zero() {
        let tiny = SurfaceSize {
            width: 80,
            height: 80,
        };
        assert_eq!(fit_bounds(franklin_county(), PADDING, 16, tiny).zoom, 0);
    }

    #[test]
    fn center_instruction_resolves_verbatim() {
        let instruction = ViewportInstruction::CenterOn {
            center: LatLng::new(42.1, -72.5),
            zoom: 14,
            animate: true,
        };
        assert_eq!(
            instruction.resolve(SURFACE),
            ResolvedView {
                center: LatLng::new(42.1, -72.5),
                zoom: 14,
            }
        );
        assert!(instruction.animate());
        assert_eq!(instruction.label(), "center on selection");
    }

    #[test]
    fn serializes_with_type_tag() {
        let instruction = ViewportInstruction::ShowDefault {
            center: LatLng::new(42.2373, -71.5314),
            zoom: 8,
            animate: true,
        };
        let value = serde_json::to_value(instruction).unwrap();
        assert_eq!(value["type"], "showDefault");
        assert_eq!(value["zoom"], 8);
    }
}
