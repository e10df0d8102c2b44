//! `GeoJSON` export of a built render model.

use geojson::{Feature, FeatureCollection, JsonObject, JsonValue, feature::Id};
use parcel_map_geometry::{
    ShapeKind, infer_shape, normalize_polygons, polygons_to_multi_polygon, rings_to_polygon,
};

use crate::RenderDescriptor;

/// Converts descriptors into a `FeatureCollection`, one feature per
/// descriptor, in render order.
#[must_use]
pub fn to_feature_collection(descriptors: &[RenderDescriptor<'_>]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: descriptors.iter().map(to_feature).collect(),
        foreign_members: None,
    }
}

/// Converts one descriptor into a feature keyed by its [`ParcelKey`].
///
/// [`ParcelKey`]: parcel_map_parcel_models::ParcelKey
#[must_use]
pub fn to_feature(descriptor: &RenderDescriptor<'_>) -> Feature {
    let geometry = to_geometry(descriptor).map(geojson::Geometry::new);

    let parcel = descriptor.parcel;
    let mut properties = JsonObject::new();
    properties.insert("key".to_string(), descriptor.key.as_str().into());
    properties.insert("address".to_string(), parcel.address.clone().into());
    properties.insert("county".to_string(), parcel.county.clone().into());
    properties.insert(
        "acreage".to_string(),
        parcel.acreage.map_or(JsonValue::Null, JsonValue::from),
    );
    properties.insert("explanation".to_string(), parcel.explanation.clone().into());
    properties.insert("selected".to_string(), descriptor.selected.into());

    Feature {
        bbox: None,
        geometry,
        id: Some(Id::String(descriptor.key.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Multi-polygon parcels keep their member polygons; everything else is
/// exported as one polygon whose first ring is the exterior.
fn to_geometry(descriptor: &RenderDescriptor<'_>) -> Option<geojson::Value> {
    let coordinates = descriptor
        .parcel
        .geometry
        .as_ref()
        .and_then(|geometry| geometry.coordinates.as_ref());

    match coordinates.and_then(infer_shape).map(|shape| shape.kind()) {
        Some(ShapeKind::MultiPolygon) => {
            let polygons = normalize_polygons(coordinates?);
            polygons_to_multi_polygon(&polygons).map(|multi| geojson::Value::from(&multi))
        }
        _ => rings_to_polygon(&descriptor.rings).map(|polygon| geojson::Value::from(&polygon)),
    }
}
