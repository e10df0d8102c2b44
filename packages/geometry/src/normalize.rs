//! Structural shape inference and ring extraction.

use parcel_map_parcel_models::{Geometry, GeometryType, LatLng, Ring};
use serde_json::Value;
use thiserror::Error;

/// Coordinates classified by nesting depth.
///
/// Each variant borrows the top-level array of the raw value: the rings of a
/// polygon, or the polygons of a multi-polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateShape<'a> {
    /// Three levels deep: rings of positions.
    Polygon(&'a [Value]),
    /// Four levels deep: polygons of rings of positions.
    MultiPolygon(&'a [Value]),
}

impl CoordinateShape<'_> {
    /// The kind of shape without the borrowed data.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Polygon(_) => ShapeKind::Polygon,
            Self::MultiPolygon(_) => ShapeKind::MultiPolygon,
        }
    }
}

/// Shape inferred from coordinate nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Rings of positions.
    Polygon,
    /// Polygons of rings of positions.
    MultiPolygon,
}

impl ShapeKind {
    /// Whether a declared `type` tag agrees with this inferred shape.
    #[must_use]
    pub const fn matches(self, declared: GeometryType) -> bool {
        matches!(
            (self, declared),
            (Self::Polygon, GeometryType::Polygon)
                | (Self::MultiPolygon, GeometryType::MultiPolygon)
        )
    }
}

/// Why a coordinate structure could not be walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
enum ShapeError {
    /// A polygon slot held something other than an array of rings.
    #[error("polygon {polygon} is not an array")]
    NotAPolygon { polygon: usize },

    /// A ring slot held something other than an array of positions.
    #[error("ring {ring} is not an array")]
    NotARing { ring: usize },

    /// A position slot held something other than an array.
    #[error("position {position} of ring {ring} is not an array")]
    NotAPosition { ring: usize, position: usize },
}

/// Classifies `coordinates` by nesting depth.
///
/// Looks at the first element three levels down: an array there means a
/// multi-polygon, anything else a polygon. Returns `None` when the value is
/// not an array, is empty, or its first element is not an array.
#[must_use]
pub fn infer_shape(coordinates: &Value) -> Option<CoordinateShape<'_>> {
    let top = coordinates.as_array()?;
    let first = top.first()?;
    if !first.is_array() {
        return None;
    }

    let third = first.get(0).and_then(|ring| ring.get(0));
    if third.is_some_and(Value::is_array) {
        Some(CoordinateShape::MultiPolygon(top))
    } else {
        Some(CoordinateShape::Polygon(top))
    }
}

/// Converts raw `[lng, lat]` coordinates into latitude-first rings.
///
/// Multi-polygons are flattened: polygon order first, then ring order
/// within each polygon. Positions that are not two finite numbers within
/// range are dropped; their ring keeps the remaining positions and may end
/// up empty. Empty or malformed input yields no rings.
#[must_use]
pub fn normalize(coordinates: &Value) -> Vec<Ring> {
    normalize_polygons(coordinates).into_iter().flatten().collect()
}

/// Like [`normalize`], but keeps the rings grouped by polygon.
///
/// A `Polygon` shape yields one group; a `MultiPolygon` shape yields one
/// group per member polygon, in order.
#[must_use]
pub fn normalize_polygons(coordinates: &Value) -> Vec<Vec<Ring>> {
    let Some(shape) = infer_shape(coordinates) else {
        if !is_empty_array(coordinates) {
            log::warn!("Unrecognized coordinate nesting, treating geometry as empty");
        }
        return Vec::new();
    };

    match extract_polygons(shape) {
        Ok(polygons) => polygons,
        Err(e) => {
            log::warn!("Malformed {:?} coordinates ({e}), treating geometry as empty", shape.kind());
            Vec::new()
        }
    }
}

/// Normalizes a parcel [`Geometry`], logging when its declared `type`
/// disagrees with the shape inferred from its coordinates.
///
/// The inferred shape always wins.
#[must_use]
pub fn normalize_geometry(geometry: &Geometry) -> Vec<Ring> {
    let Some(coordinates) = geometry.coordinates.as_ref() else {
        return Vec::new();
    };

    if let Some(shape) = infer_shape(coordinates) {
        let kind = shape.kind();
        match geometry.declared_type() {
            Some(declared) if kind.matches(declared) => {}
            declared => log::debug!(
                "Declared geometry type {:?} ({declared:?}) differs from inferred {kind:?}",
                geometry.geometry_type
            ),
        }
    }

    normalize(coordinates)
}

fn is_empty_array(value: &Value) -> bool {
    value.as_array().is_some_and(Vec::is_empty)
}

fn extract_polygons(shape: CoordinateShape<'_>) -> Result<Vec<Vec<Ring>>, ShapeError> {
    match shape {
        CoordinateShape::Polygon(rings) => Ok(vec![polygon_rings(rings, 0)?]),
        CoordinateShape::MultiPolygon(polygons) => {
            let mut out = Vec::with_capacity(polygons.len());
            let mut ring_offset = 0;
            for (polygon, value) in polygons.iter().enumerate() {
                let rings = value
                    .as_array()
                    .ok_or(ShapeError::NotAPolygon { polygon })?;
                let rings = polygon_rings(rings, ring_offset)?;
                ring_offset += rings.len();
                out.push(rings);
            }
            Ok(out)
        }
    }
}

/// `ring_offset` keeps error positions meaningful after flattening.
fn polygon_rings(rings: &[Value], ring_offset: usize) -> Result<Vec<Ring>, ShapeError> {
    rings
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let ring = ring_offset + i;
            let positions = value.as_array().ok_or(ShapeError::NotARing { ring })?;
            ring_positions(positions, ring)
        })
        .collect()
}

fn ring_positions(positions: &[Value], ring: usize) -> Result<Ring, ShapeError> {
    let mut out = Vec::with_capacity(positions.len());
    for (position, value) in positions.iter().enumerate() {
        let pair = value
            .as_array()
            .ok_or(ShapeError::NotAPosition { ring, position })?;
        if let Some(point) = to_lat_lng(pair) {
            out.push(point);
        }
    }
    Ok(out)
}

/// Swaps a `[lng, lat, ...]` position into a [`LatLng`]. Extra members such
/// as altitude are ignored.
fn to_lat_lng(pair: &[Value]) -> Option<LatLng> {
    let lng = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    let point = LatLng::new(lat, lng);
    point.is_valid().then_some(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn polygon_swaps_axis_order() {
        let rings = normalize(&json!([[
            [-72.5, 42.1],
            [-72.4, 42.1],
            [-72.4, 42.2],
            [-72.5, 42.1]
        ]]));

        assert_eq!(
            rings,
            vec![vec![
                LatLng::new(42.1, -72.5),
                LatLng::new(42.1, -72.4),
                LatLng::new(42.2, -72.4),
                LatLng::new(42.1, -72.5),
            ]]
        );
    }

    #[test]
    fn polygon_keeps_holes_as_rings() {
        let rings = normalize(&json!([
            [[-72.0, 42.0], [-71.0, 42.0], [-71.0, 43.0], [-72.0, 42.0]],
            [[-71.8, 42.2], [-71.6, 42.2], [-71.6, 42.4], [-71.8, 42.2]]
        ]));

        assert_eq!(rings.len(), 2);
        assert_eq!(rings[1][0], LatLng::new(42.2, -71.8));
    }

    #[test]
    fn multipolygon_flattens_in_order() {
        let rings = normalize(&json!([
            [
                [[-72.0, 42.0], [-71.0, 42.0], [-71.0, 43.0]],
                [[-71.9, 42.1], [-71.8, 42.1], [-71.8, 42.2]]
            ],
            [[[-70.0, 41.0], [-69.9, 41.0], [-69.9, 41.1]]]
        ]));

        assert_eq!(rings.len(), 3, "ring count should be 2 + 1");
        assert_eq!(rings[0][0], LatLng::new(42.0, -72.0));
        assert_eq!(rings[1][0], LatLng::new(42.1, -71.9));
        assert_eq!(rings[2][0], LatLng::new(41.0, -70.0));
    }

    #[test]
    fn drops_out_of_range_positions() {
        let rings = normalize(&json!([[
            [-72.5, 42.1],
            [-72.4, 95.0],
            [-190.0, 42.2],
            [-72.4, 42.2]
        ]]));

        assert_eq!(
            rings,
            vec![vec![LatLng::new(42.1, -72.5), LatLng::new(42.2, -72.4)]]
        );
    }

    #[test]
    fn drops_non_numeric_positions() {
        let rings = normalize(&json!([[
            [-72.5, 42.1],
            ["-72.4", "42.1"],
            [-72.4],
            [null, 42.0],
            [-72.4, 42.2]
        ]]));

        assert_eq!(rings[0].len(), 2);
    }

    #[test]
    fn ignores_altitude() {
        let rings = normalize(&json!([[[-72.5, 42.1, 120.0]]]));
        assert_eq!(rings, vec![vec![LatLng::new(42.1, -72.5)]]);
    }

    #[test]
    fn keeps_ring_emptied_by_filtering() {
        let rings = normalize(&json!([
            [[-72.5, 42.1], [-72.4, 42.1], [-72.4, 42.2]],
            [[500.0, 500.0], [600.0, 600.0]]
        ]));

        assert_eq!(rings.len(), 2);
        assert!(rings[1].is_empty());
    }

    #[test]
    fn empty_input_yields_no_rings() {
        assert!(normalize(&json!([])).is_empty());
        assert!(normalize(&json!(null)).is_empty());
        assert!(normalize(&json!({})).is_empty());
    }

    #[test]
    fn flat_position_list_is_unrecognized() {
        assert!(normalize(&json!([-72.5, 42.1])).is_empty());
        assert!(normalize(&json!([[-72.5, 42.1], [-72.4, 42.1]])).is_empty());
    }

    #[test]
    fn malformed_structure_yields_no_rings() {
        // Second ring is a bare number.
        assert!(normalize(&json!([[[-72.5, 42.1]], 7])).is_empty());
        // Second polygon is a string.
        assert!(normalize(&json!([[[[-72.5, 42.1]]], "oops"])).is_empty());
    }

    #[test]
    fn polygons_keep_their_grouping() {
        let polygons = normalize_polygons(&json!([
            [
                [[-72.0, 42.0], [-71.0, 42.0], [-71.0, 43.0]],
                [[-71.9, 42.1], [-71.8, 42.1], [-71.8, 42.2]]
            ],
            [[[-70.0, 41.0], [-69.9, 41.0], [-69.9, 41.1]]]
        ]));

        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].len(), 2);
        assert_eq!(polygons[1][0][0], LatLng::new(41.0, -70.0));

        let single = normalize_polygons(&json!([[[-72.5, 42.1], [-72.4, 42.1]]]));
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn shape_errors_name_the_bad_slot() {
        let bad_ring = json!([[[-72.5, 42.1]], 7]);
        let err = extract_polygons(infer_shape(&bad_ring).unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "ring 1 is not an array");

        let bad_polygon = json!([[[[-72.5, 42.1]], [[-72.4, 42.1]]], "oops"]);
        let err = extract_polygons(infer_shape(&bad_polygon).unwrap()).unwrap_err();
        assert_eq!(err, ShapeError::NotAPolygon { polygon: 1 });

        let bad_position = json!([[[[-72.5, 42.1]]], [[[-72.4, 42.1], 5]]]);
        let err = extract_polygons(infer_shape(&bad_position).unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "position 1 of ring 1 is not an array");
    }

    #[test]
    fn infers_shape_from_depth() {
        let polygon = json!([[[-72.5, 42.1]]]);
        let multi = json!([[[[-72.5, 42.1]]]]);

        assert_eq!(infer_shape(&polygon).map(|s| s.kind()), Some(ShapeKind::Polygon));
        assert_eq!(infer_shape(&multi).map(|s| s.kind()), Some(ShapeKind::MultiPolygon));
        assert_eq!(infer_shape(&json!([])), None);
    }

    #[test]
    fn inferred_shape_beats_declared_type() {
        let geometry = Geometry {
            geometry_type: "Polygon".to_string(),
            coordinates: Some(json!([
                [[[-72.0, 42.0], [-71.0, 42.0], [-71.0, 43.0]]],
                [[[-70.0, 41.0], [-69.9, 41.0], [-69.9, 41.1]]]
            ])),
        };

        assert_eq!(normalize_geometry(&geometry).len(), 2);
    }

    #[test]
    fn geometry_without_coordinates_is_empty() {
        let geometry = Geometry {
            geometry_type: "MultiPolygon".to_string(),
            coordinates: None,
        };
        assert!(normalize_geometry(&geometry).is_empty());
    }
}
