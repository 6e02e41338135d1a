//! Parcel features and site boundaries as `GeoJSON`.
//!
//! Parcel layers exported from the map service arrive as a `GeoJSON`
//! `FeatureCollection` whose features carry the parcel `OBJECTID` as a
//! property. Coordinates are taken as-is in the caller's spatial
//! reference.

use geo::MultiPolygon;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson};
use uic_inventory_boundary_models::{ParcelFeature, ParcelId};
use uic_inventory_site_models::{EsriPolygon, SpatialReference};

use crate::BoundaryError;
use crate::geometry::{from_multi_polygon, to_multi_polygon};

/// Property holding the parcel identifier in the parcel layer.
pub const DEFAULT_ID_PROPERTY: &str = "OBJECTID";

/// Parses parcel features from a `GeoJSON` `FeatureCollection`.
///
/// The parcel id is read from `id_property`, falling back to the feature
/// id. Features without a polygon geometry are skipped.
///
/// # Errors
///
/// Returns [`BoundaryError::GeoJson`] for malformed `GeoJSON` and
/// [`BoundaryError::Parcel`] when a polygon feature has no usable id.
pub fn parcels_from_geojson(
    text: &str,
    spatial_reference: SpatialReference,
    id_property: &str,
) -> Result<Vec<ParcelFeature>, BoundaryError> {
    let geojson: GeoJson = text.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;

    let mut parcels = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let id = parcel_id(&feature, id_property);

        let Some(multi_polygon) = feature_polygons(feature) else {
            log::debug!("Skipping feature {index}: not a polygon");
            continue;
        };
        let Some(geometry) = from_multi_polygon(&multi_polygon, spatial_reference) else {
            log::debug!("Skipping feature {index}: empty polygon");
            continue;
        };

        let id = id.ok_or_else(|| BoundaryError::Parcel {
            message: format!("feature {index} has no '{id_property}' or feature id"),
        })?;
        parcels.push(ParcelFeature { id, geometry });
    }

    log::debug!("Loaded {} parcels", parcels.len());
    Ok(parcels)
}

/// Renders a site boundary as a `GeoJSON` geometry string.
///
/// # Errors
///
/// Returns [`BoundaryError::Geometry`] if the boundary has a degenerate
/// ring.
pub fn boundary_to_geojson(boundary: &EsriPolygon) -> Result<String, BoundaryError> {
    let multi_polygon = to_multi_polygon(boundary)?;
    let geometry = geojson::Geometry::new(geojson::Value::from(&multi_polygon));
    Ok(GeoJson::Geometry(geometry).to_string())
}

fn parcel_id(feature: &Feature, id_property: &str) -> Option<ParcelId> {
    let from_property = feature.property(id_property).and_then(|value| {
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    });

    let from_feature = || match feature.id.as_ref()? {
        Id::Number(n) => n.as_i64(),
        Id::String(s) => s.trim().parse().ok(),
    };

    from_property.or_else(from_feature).map(ParcelId)
}

fn feature_polygons(feature: Feature) -> Option<MultiPolygon<f64>> {
    let geometry: geo::Geometry<f64> = feature.geometry?.try_into().ok()?;
    match geometry {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(features: &[serde_json::Value]) -> String {
        json!({ "type": "FeatureCollection", "features": features }).to_string()
    }

    fn polygon_feature(properties: serde_json::Value) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": properties,
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]
            }
        })
    }

    #[test]
    fn reads_object_id_and_orients_rings() {
        let text = collection(&[polygon_feature(json!({ "OBJECTID": 501 }))]);
        let parcels =
            parcels_from_geojson(&text, SpatialReference::WEB_MERCATOR, DEFAULT_ID_PROPERTY)
                .unwrap();

        assert_eq!(parcels.len(), 1);
        assert_eq!(parcels[0].id, ParcelId(501));
        assert_eq!(parcels[0].geometry.rings.len(), 1);
        assert!(
            parcels[0]
                .geometry
                .spatial_reference
                .is_equivalent(&SpatialReference::WEB_MERCATOR)
        );
    }

    #[test]
    fn falls_back_to_feature_id() {
        let mut feature = polygon_feature(json!({}));
        feature["id"] = json!("77");
        let text = collection(&[feature]);

        let parcels =
            parcels_from_geojson(&text, SpatialReference::WEB_MERCATOR, DEFAULT_ID_PROPERTY)
                .unwrap();
        assert_eq!(parcels[0].id, ParcelId(77));
    }

    #[test]
    fn skips_non_polygon_features() {
        let point = json!({
            "type": "Feature",
            "properties": { "OBJECTID": 1 },
            "geometry": { "type": "Point", "coordinates": [1.0, 2.0] }
        });
        let text = collection(&[point, polygon_feature(json!({ "OBJECTID": 2 }))]);

        let parcels =
            parcels_from_geojson(&text, SpatialReference::WEB_MERCATOR, DEFAULT_ID_PROPERTY)
                .unwrap();
        assert_eq!(parcels.len(), 1);
        assert_eq!(parcels[0].id, ParcelId(2));
    }

    #[test]
    fn polygon_without_id_is_an_error() {
        let text = collection(&[polygon_feature(json!({ "NAME": "lot" }))]);
        let err = parcels_from_geojson(&text, SpatialReference::WEB_MERCATOR, DEFAULT_ID_PROPERTY)
            .unwrap_err();
        assert!(matches!(err, BoundaryError::Parcel { .. }));
    }

    #[test]
    fn malformed_geojson_is_an_error() {
        let err = parcels_from_geojson("{", SpatialReference::WEB_MERCATOR, DEFAULT_ID_PROPERTY)
            .unwrap_err();
        assert!(matches!(err, BoundaryError::GeoJson(_)));
    }

    #[test]
    fn boundary_renders_as_multipolygon() {
        let boundary = EsriPolygon::new(
            vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]],
            SpatialReference::WEB_MERCATOR,
        );

        let text = boundary_to_geojson(&boundary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "MultiPolygon");
        assert_eq!(value["coordinates"][0][0].as_array().unwrap().len(), 5);
    }
}
