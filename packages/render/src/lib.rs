#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Render model for parcel search results.
//!
//! [`build`] turns a batch of parcels into [`RenderDescriptor`]s: one per
//! parcel whose geometry normalizes to a usable outer ring, in input order.
//! Parcels that fail validation are logged and left out; the rest of the
//! batch still renders.

pub mod export;

use parcel_map_geometry::normalize_geometry;
use parcel_map_parcel_models::{Parcel, ParcelKey, Ring};
use serde::Serialize;
use thiserror::Error;

/// Fewest positions an outer ring needs to bound an area.
pub const MIN_RING_POINTS: usize = 3;

/// Stroke and fill colour for every parcel outline.
pub const PARCEL_COLOR: &str = "#FFB300";

/// Why a parcel produced no shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The parcel has no geometry at all.
    #[error("no geometry")]
    MissingGeometry,

    /// The geometry has no `coordinates` member.
    #[error("geometry has no coordinates")]
    MissingCoordinates,

    /// Normalization produced no rings (empty or malformed coordinates).
    #[error("no rings after normalization")]
    NoRings,

    /// The outer ring is too short to enclose an area.
    #[error("outer ring has {points} point(s), need at least 3")]
    ShortOuterRing {
        /// Valid positions left in the outer ring.
        points: usize,
    },
}

/// One drawable parcel outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDescriptor<'a> {
    /// Stable key within this build.
    pub key: ParcelKey,
    /// Position of the parcel in the batch.
    pub index: usize,
    /// The parcel this shape was derived from.
    #[serde(skip)]
    pub parcel: &'a Parcel,
    /// Normalized rings; the first is the outer boundary.
    pub rings: Vec<Ring>,
    /// Whether this parcel is the current selection.
    pub selected: bool,
}

/// Path options for drawing a parcel outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonStyle {
    /// Stroke colour.
    pub color: &'static str,
    /// Fill colour.
    pub fill_color: &'static str,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
    /// Stroke width in pixels.
    pub weight: u8,
}

/// Text shown when a parcel outline is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupSummary {
    /// Address, or "Unknown Address".
    pub title: String,
    /// County, or "Unknown".
    pub county: String,
    /// Acreage to two decimals.
    pub acres: String,
}

impl RenderDescriptor<'_> {
    /// Selected parcels are drawn heavier and more opaque.
    #[must_use]
    pub const fn style(&self) -> PolygonStyle {
        PolygonStyle {
            color: PARCEL_COLOR,
            fill_color: PARCEL_COLOR,
            fill_opacity: if self.selected { 0.4 } else { 0.3 },
            weight: if self.selected { 3 } else { 2 },
        }
    }

    /// Popup text for this parcel.
    #[must_use]
    pub fn popup(&self) -> PopupSummary {
        let parcel = self.parcel;
        PopupSummary {
            title: non_blank(&parcel.address).unwrap_or("Unknown Address").to_string(),
            county: non_blank(&parcel.county).unwrap_or("Unknown").to_string(),
            acres: format!("{:.2}", parcel.acreage.unwrap_or(0.0)),
        }
    }

    /// Total positions across all rings.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Builds render descriptors for `parcels`, in input order.
///
/// A parcel is skipped, with a warning, when it has no geometry, no
/// coordinates, no rings after normalization, or an outer ring shorter than
/// [`MIN_RING_POINTS`]. The `selected` key is compared by value against each
/// parcel's [`ParcelKey`].
#[must_use]
pub fn build<'a>(parcels: &'a [Parcel], selected: Option<&ParcelKey>) -> Vec<RenderDescriptor<'a>> {
    log::debug!("Building render model for {} parcels", parcels.len());

    let descriptors: Vec<RenderDescriptor<'a>> = parcels
        .iter()
        .enumerate()
        .filter_map(|(index, parcel)| match describe(parcel, index, selected) {
            Ok(descriptor) => Some(descriptor),
            Err(reason) => {
                log::warn!(
                    "Skipping parcel {index} ({:?}): {reason}",
                    parcel.address
                );
                None
            }
        })
        .collect();

    log::debug!(
        "Render model has {} of {} parcels",
        descriptors.len(),
        parcels.len()
    );

    descriptors
}

/// Validates one parcel and builds its descriptor.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the parcel cannot be drawn.
pub fn describe<'a>(
    parcel: &'a Parcel,
    index: usize,
    selected: Option<&ParcelKey>,
) -> Result<RenderDescriptor<'a>, SkipReason> {
    let geometry = parcel.geometry.as_ref().ok_or(SkipReason::MissingGeometry)?;
    if geometry.coordinates.is_none() {
        return Err(SkipReason::MissingCoordinates);
    }

    let rings = normalize_geometry(geometry);
    let outer = rings.first().ok_or(SkipReason::NoRings)?;
    if outer.len() < MIN_RING_POINTS {
        return Err(SkipReason::ShortOuterRing {
            points: outer.len(),
        });
    }

    let key = ParcelKey::for_parcel(parcel, index);
    let selected = selected == Some(&key);

    Ok(RenderDescriptor {
        key,
        index,
        parcel,
        rings,
        selected,
    })
}
