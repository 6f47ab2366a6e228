//! GeoJSON import and export.

use geo::Geometry;
use geoedit_core::GeometryError;
use geojson::{FeatureCollection, GeoJson};
use serde_json::{json, Value};

use crate::model::{Feature, Properties};

fn invalid(reason: impl Into<String>) -> GeometryError {
    GeometryError::InvalidGeoJson {
        reason: reason.into(),
    }
}

/// Reads a GeoJSON Geometry, Feature or FeatureCollection into
/// `(geometry, properties)` pairs. Features without a geometry are skipped.
pub fn parse_features(value: &Value) -> Result<Vec<(Geometry<f64>, Properties)>, GeometryError> {
    let parsed = GeoJson::from_json_value(value.clone()).map_err(|e| invalid(e.to_string()))?;

    match parsed {
        GeoJson::Geometry(geometry) => Ok(vec![(convert(geometry)?, Properties::new())]),
        GeoJson::Feature(feature) => Ok(feature_parts(feature)?.into_iter().collect()),
        GeoJson::FeatureCollection(collection) => {
            let mut out = Vec::with_capacity(collection.features.len());
            for feature in collection.features {
                if let Some(parts) = feature_parts(feature)? {
                    out.push(parts);
                }
            }
            Ok(out)
        }
    }
}

/// Reads only the geometries of a GeoJSON value.
pub fn parse_geometries(value: &Value) -> Result<Vec<Geometry<f64>>, GeometryError> {
    Ok(parse_features(value)?.into_iter().map(|(g, _)| g).collect())
}

fn feature_parts(
    feature: geojson::Feature,
) -> Result<Option<(Geometry<f64>, Properties)>, GeometryError> {
    let Some(geometry) = feature.geometry else {
        tracing::debug!("Skipping feature without geometry");
        return Ok(None);
    };
    Ok(Some((convert(geometry)?, feature.properties.unwrap_or_default())))
}

fn convert(geometry: geojson::Geometry) -> Result<Geometry<f64>, GeometryError> {
    Geometry::<f64>::try_from(geometry).map_err(|e| invalid(e.to_string()))
}

/// Converts a feature into a GeoJSON feature carrying its id.
pub fn to_geojson_feature(feature: &Feature) -> geojson::Feature {
    geojson::Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(
            &feature.geometry,
        ))),
        id: Some(geojson::feature::Id::Number(feature.id.0.into())),
        properties: Some(feature.properties.clone()),
        foreign_members: None,
    }
}

/// Serializes features as a FeatureCollection annotated with a named CRS.
pub fn feature_collection<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
    crs: &str,
) -> Result<String, GeometryError> {
    let mut foreign_members = serde_json::Map::new();
    foreign_members.insert(
        "crs".to_string(),
        json!({ "type": "name", "properties": { "name": crs } }),
    );

    let collection = FeatureCollection {
        bbox: None,
        features: features.into_iter().map(to_geojson_feature).collect(),
        foreign_members: Some(foreign_members),
    };

    serde_json::to_string(&GeoJson::FeatureCollection(collection))
        .map_err(|e| invalid(e.to_string()))
}
