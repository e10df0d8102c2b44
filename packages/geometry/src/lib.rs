#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry normalization for parcel boundaries.
//!
//! Search results carry `GeoJSON`-like coordinates whose nesting depth,
//! not the declared `type`, decides whether they describe a `Polygon` or a
//! `MultiPolygon`. [`normalize`] flattens either shape into an ordered list
//! of latitude-first rings, dropping invalid positions and absorbing
//! malformed structure instead of failing.
//!
//! [`bounds`] computes the extent of normalized rings for viewport fitting,
//! and [`convert`] turns them back into `geo` polygons for export.

pub mod bounds;
pub mod convert;
pub mod normalize;

pub use bounds::{bounds_of, valid_points};
pub use convert::{polygons_to_multi_polygon, rings_to_polygon};
pub use normalize::{
    CoordinateShape, ShapeKind, infer_shape, normalize, normalize_geometry, normalize_polygons,
};
