//! Conversion from normalized rings to `geo` types.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use parcel_map_parcel_models::{LatLng, Ring};

/// Builds a polygon from normalized rings: the first ring is the exterior,
/// the rest are interiors, matching how the map draws them.
///
/// `geo` closes each ring, so the result may hold one more position per
/// ring than the input. Returns `None` when there are no rings.
#[must_use]
pub fn rings_to_polygon(rings: &[Ring]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    Some(Polygon::new(
        to_line_string(exterior),
        interiors.iter().map(|ring| to_line_string(ring)).collect(),
    ))
}

/// Builds a multi-polygon from rings grouped by polygon, as returned by
/// [`normalize_polygons`](crate::normalize_polygons). Groups without rings
/// are skipped; returns `None` when nothing is left.
#[must_use]
pub fn polygons_to_multi_polygon(polygons: &[Vec<Ring>]) -> Option<MultiPolygon<f64>> {
    let members: Vec<Polygon<f64>> = polygons
        .iter()
        .filter_map(|rings| rings_to_polygon(rings))
        .collect();
    (!members.is_empty()).then(|| MultiPolygon::new(members))
}

fn to_line_string(ring: &[LatLng]) -> LineString<f64> {
    ring.iter()
        .map(|p| Coord { x: p.lng, y: p.lat })
        .collect::<Vec<_>>()
        .into()
}
