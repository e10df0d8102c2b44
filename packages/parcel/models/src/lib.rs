#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parcel and geometry types for the parcel map.
//!
//! A [`Parcel`] arrives from the conversational search service as loosely
//! typed JSON. Its [`Geometry`] keeps the raw `coordinates` value untouched
//! so the normalizer can infer the real shape from nesting depth instead of
//! trusting the declared `type` tag.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A land parcel returned by a search turn.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parcel {
    /// Street address (may be blank).
    #[serde(default)]
    pub address: String,
    /// County name.
    #[serde(default)]
    pub county: String,
    /// Parcel size in acres.
    #[serde(default)]
    pub acreage: Option<f64>,
    /// Why the search service picked this parcel.
    #[serde(default)]
    pub explanation: String,
    /// Parcel boundary, if the service sent one.
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// A `GeoJSON`-style geometry whose coordinate nesting has not been checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    /// Declared geometry type (e.g. "Polygon"). Informational only.
    #[serde(rename = "type", default)]
    pub geometry_type: String,
    /// Raw nested coordinate arrays in `[lng, lat]` order.
    #[serde(default)]
    pub coordinates: Option<serde_json::Value>,
}

impl Geometry {
    /// Parses the declared `type` tag, if it names a known geometry type.
    #[must_use]
    pub fn declared_type(&self) -> Option<GeometryType> {
        self.geometry_type.parse().ok()
    }
}

/// Geometry type names as they appear in a `GeoJSON` `type` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum GeometryType {
    /// A single point.
    Point,
    /// Several points.
    MultiPoint,
    /// A single line.
    LineString,
    /// Several lines.
    MultiLineString,
    /// A single polygon (rings).
    Polygon,
    /// Several polygons.
    MultiPolygon,
    /// A heterogeneous collection.
    GeometryCollection,
}

/// A geographic position in map (latitude first) order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees, within `[-90, 90]`.
    pub lat: f64,
    /// Longitude in degrees, within `[-180, 180]`.
    pub lng: f64,
}

impl LatLng {
    /// Creates a position from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether both components are finite and inside their valid range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// One normalized ring: latitude-first positions in their original order.
pub type Ring = Vec<LatLng>;

/// An axis-aligned geographic rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    /// Minimum latitude.
    pub south: f64,
    /// Minimum longitude.
    pub west: f64,
    /// Maximum latitude.
    pub north: f64,
    /// Maximum longitude.
    pub east: f64,
}

impl LatLngBounds {
    /// The south-west corner.
    #[must_use]
    pub const fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    /// The north-east corner.
    #[must_use]
    pub const fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }

    /// Midpoint of the rectangle.
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            f64::midpoint(self.south, self.north),
            f64::midpoint(self.west, self.east),
        )
    }

    /// Whether `point` lies inside or on the edge of the rectangle.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south..=self.north).contains(&point.lat)
            && (self.west..=self.east).contains(&point.lng)
    }
}

/// Identifies a parcel within one result batch.
///
/// Built from the address (or a positional placeholder when the address is
/// blank) plus the parcel's index, so it stays unique even when addresses
/// repeat or are missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParcelKey(String);

impl ParcelKey {
    /// Derives the key for the parcel at `index` in its batch.
    #[must_use]
    pub fn for_parcel(parcel: &Parcel, index: usize) -> Self {
        if parcel.address.trim().is_empty() {
            Self(format!("parcel-{index}-{index}"))
        } else {
            Self(format!("{}-{index}", parcel.address))
        }
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParcelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParcelKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ParcelKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_sparse_parcel() {
        let parcel: Parcel = serde_json::from_value(serde_json::json!({
            "address": "12 Farm Rd, Greenfield, MA",
            "geometry": { "type": "Polygon", "coordinates": [] }
        }))
        .unwrap();

        assert_eq!(parcel.address, "12 Farm Rd, Greenfield, MA");
        assert_eq!(parcel.county, "");
        assert_eq!(parcel.acreage, None);
        let geometry = parcel.geometry.unwrap();
        assert_eq!(geometry.declared_type(), Some(GeometryType::Polygon));
        assert_eq!(geometry.coordinates, Some(serde_json::json!([])));
    }

    #[test]
    fn null_coordinates_are_none() {
        let geometry: Geometry =
            serde_json::from_value(serde_json::json!({ "type": "Polygon", "coordinates": null }))
                .unwrap();
        assert!(geometry.coordinates.is_none());
    }

    #[test]
    fn unknown_declared_type() {
        let geometry = Geometry {
            geometry_type: "Blob".to_string(),
            coordinates: None,
        };
        assert_eq!(geometry.declared_type(), None);
    }

    #[test]
    fn key_uses_address_and_index() {
        let parcel = Parcel {
            address: "5 Main St".to_string(),
            ..Parcel::default()
        };
        assert_eq!(ParcelKey::for_parcel(&parcel, 3).as_str(), "5 Main St-3");
    }

    #[test]
    fn key_keeps_address_verbatim() {
        let parcel = Parcel {
            address: " 5 Main St ".to_string(),
            ..Parcel::default()
        };
        assert_eq!(ParcelKey::for_parcel(&parcel, 0).as_str(), " 5 Main St -0");
    }

    #[test]
    fn key_falls_back_for_blank_address() {
        let parcel = Parcel {
            address: "   ".to_string(),
            ..Parcel::default()
        };
        assert_eq!(ParcelKey::for_parcel(&parcel, 2).as_str(), "parcel-2-2");
    }

    #[test]
    fn duplicate_addresses_get_distinct_keys() {
        let parcel = Parcel {
            address: "5 Main St".to_string(),
            ..Parcel::default()
        };
        assert_ne!(
            ParcelKey::for_parcel(&parcel, 0),
            ParcelKey::for_parcel(&parcel, 1)
        );
    }

    #[test]
    fn lat_lng_validity() {
        assert!(LatLng::new(42.1, -72.5).is_valid());
        assert!(LatLng::new(90.0, 180.0).is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -180.5).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
        assert!(!LatLng::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn bounds_center_and_contains() {
        let bounds = LatLngBounds {
            south: 42.0,
            west: -73.0,
            north: 43.0,
            east: -71.0,
        };
        assert_eq!(bounds.center(), LatLng::new(42.5, -72.0));
        assert!(bounds.contains(LatLng::new(42.0, -71.0)));
        assert!(!bounds.contains(LatLng::new(43.5, -72.0)));
    }
}
