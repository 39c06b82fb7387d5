//! Quick structural summary of a `GeoJSON` document, used to sanity-check
//! uploads before they are stored.

use geojson::GeoJson;
use serde::{Deserialize, Serialize};

/// What a `GeoJSON` document contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoJsonSummary {
    /// Top-level type (`FeatureCollection`, `Feature`, or a geometry type).
    #[serde(rename = "type")]
    pub geojson_type: String,
    /// Whether the document is a feature collection.
    pub is_feature_collection: bool,
    /// Number of features (zero for a bare geometry).
    pub feature_count: usize,
    /// Distinct geometry types, in first-seen order.
    pub geometry_types: Vec<String>,
}

/// Summarizes a parsed `GeoJSON` document.
#[must_use]
pub fn inspect(geojson: &GeoJson) -> GeoJsonSummary {
    match geojson {
        GeoJson::FeatureCollection(collection) => {
            let mut geometry_types: Vec<String> = Vec::new();
            for geometry in collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
                let name = geometry_type_name(&geometry.value);
                if !geometry_types.iter().any(|t| t == name) {
                    geometry_types.push(name.to_string());
                }
            }

            GeoJsonSummary {
                geojson_type: "FeatureCollection".to_string(),
                is_feature_collection: true,
                feature_count: collection.features.len(),
                geometry_types,
            }
        }
        GeoJson::Feature(feature) => GeoJsonSummary {
            geojson_type: "Feature".to_string(),
            is_feature_collection: false,
            feature_count: 1,
            geometry_types: feature
                .geometry
                .iter()
                .map(|g| geometry_type_name(&g.value).to_string())
                .collect(),
        },
        GeoJson::Geometry(geometry) => GeoJsonSummary {
            geojson_type: geometry_type_name(&geometry.value).to_string(),
            is_feature_collection: false,
            feature_count: 0,
            geometry_types: vec![geometry_type_name(&geometry.value).to_string()],
        },
    }
}

/// The `GeoJSON` `type` member for a geometry value.
#[must_use]
pub const fn geometry_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}
