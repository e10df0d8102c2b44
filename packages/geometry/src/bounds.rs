//! Extent computation over normalized rings.

use geo::{BoundingRect, MultiPoint, Point};
use parcel_map_parcel_models::{LatLng, LatLngBounds, Ring};

/// Every in-range position across `rings`, in ring order.
pub fn valid_points(rings: &[Ring]) -> impl Iterator<Item = LatLng> + '_ {
    rings.iter().flatten().copied().filter(LatLng::is_valid)
}

/// The minimal rectangle covering every valid point, or `None` when there
/// are no valid points.
#[must_use]
pub fn bounds_of(points: impl IntoIterator<Item = LatLng>) -> Option<LatLngBounds> {
    let multi: MultiPoint<f64> = points
        .into_iter()
        .filter(LatLng::is_valid)
        .map(|p| Point::new(p.lng, p.lat))
        .collect();

    multi.bounding_rect().map(|rect| LatLngBounds {
        south: rect.min().y,
        west: rect.min().x,
        north: rect.max().y,
        east: rect.max().x,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_all_rings() {
        let rings = vec![
            vec![LatLng::new(42.0, -72.0), LatLng::new(42.5, -71.5)],
            vec![],
            vec![LatLng::new(41.5, -70.0)],
        ];

        let bounds = bounds_of(valid_points(&rings)).unwrap();
        assert_eq!(
            bounds,
            LatLngBounds {
                south: 41.5,
                west: -72.0,
                north: 42.5,
                east: -70.0,
            }
        );
    }

    #[test]
    fn single_point_bounds_are_degenerate() {
        let bounds = bounds_of([LatLng::new(42.1, -72.5)]).unwrap();
        assert_eq!(bounds.south_west(), bounds.north_east());
    }

    #[test]
    fn invalid_points_are_ignored() {
        let bounds = bounds_of([
            LatLng::new(42.1, -72.5),
            LatLng::new(f64::NAN, 0.0),
            LatLng::new(99.0, -72.0),
        ])
        .unwrap();
        assert_eq!(bounds.north, 42.1);
    }

    #[test]
    fn no_points_no_bounds() {
        assert_eq!(bounds_of(Vec::new()), None);
        assert_eq!(bounds_of(valid_points(&[vec![]])), None);
    }
}
