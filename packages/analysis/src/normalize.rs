//! Converts raw `GeoJSON` payloads into one canonical [`MultiPolygon`].
//!
//! The payload's geometry type is resolved exactly once into a
//! [`PolygonShape`]; later stages only ever see `geo` types.

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, Geometry, PolygonType, Position};

use crate::AnalysisError;

/// Consecutive vertices closer than this (in degrees) are merged.
pub const VERTEX_EPSILON_DEG: f64 = 1e-12;

/// A polygon-family geometry, classified from its `GeoJSON` type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolygonShape<'a> {
    /// A single exterior ring.
    Polygon(&'a PolygonType),
    /// An exterior ring plus one or more holes.
    PolygonWithHoles(&'a PolygonType),
    /// Several polygons.
    MultiPolygon(&'a [PolygonType]),
    /// Anything else, carrying the `GeoJSON` type name.
    Unsupported(&'static str),
}

impl<'a> PolygonShape<'a> {
    /// Classifies a `GeoJSON` geometry value.
    #[must_use]
    pub fn classify(value: &'a geojson::Value) -> Self {
        match value {
            geojson::Value::Polygon(rings) if rings.len() > 1 => Self::PolygonWithHoles(rings),
            geojson::Value::Polygon(rings) => Self::Polygon(rings),
            geojson::Value::MultiPolygon(polygons) => Self::MultiPolygon(polygons),
            geojson::Value::Point(_) => Self::Unsupported("Point"),
            geojson::Value::MultiPoint(_) => Self::Unsupported("MultiPoint"),
            geojson::Value::LineString(_) => Self::Unsupported("LineString"),
            geojson::Value::MultiLineString(_) => Self::Unsupported("MultiLineString"),
            geojson::Value::GeometryCollection(_) => Self::Unsupported("GeometryCollection"),
        }
    }

    /// Whether this is one of the polygon variants.
    #[must_use]
    pub const fn is_polygonal(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Converts the shape into a [`MultiPolygon`].
    ///
    /// The parts of a multi-polygon are unioned, so overlapping parts are
    /// only counted once.
    ///
    /// # Errors
    ///
    /// * [`AnalysisError::UnsupportedGeometryType`] for non-polygon shapes
    /// * [`AnalysisError::InvalidPolygonInput`] if any ring is malformed
    pub fn to_multi_polygon(self) -> Result<MultiPolygon<f64>, AnalysisError> {
        match self {
            Self::Polygon(rings) | Self::PolygonWithHoles(rings) => {
                Ok(MultiPolygon::new(vec![build_polygon(rings)?]))
            }
            Self::MultiPolygon(polygons) => {
                let parts = polygons
                    .iter()
                    .map(|rings| build_polygon(rings).map(|p| MultiPolygon::new(vec![p])))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(union_all(parts))
            }
            Self::Unsupported(geometry_type) => Err(AnalysisError::UnsupportedGeometryType {
                geometry_type: geometry_type.to_string(),
            }),
        }
    }
}

/// Normalizes a geometry, feature, or feature collection into the union of
/// all of its polygons.
///
/// A lone polygon is returned as-is. Non-polygon
/// members of a collection (and features without geometry) are skipped.
///
/// # Errors
///
/// * [`AnalysisError::NoPolygonGeometry`] if nothing polygonal is present
/// * [`AnalysisError::UnsupportedGeometryType`] for a non-polygon top-level
///   geometry or feature
/// * [`AnalysisError::InvalidPolygonInput`] if any ring is malformed
pub fn normalize(geojson: &GeoJson) -> Result<MultiPolygon<f64>, AnalysisError> {
    match geojson {
        GeoJson::Geometry(geometry) => PolygonShape::classify(&geometry.value).to_multi_polygon(),
        GeoJson::Feature(feature) => {
            let geometry = feature
                .geometry
                .as_ref()
                .ok_or(AnalysisError::NoPolygonGeometry)?;
            PolygonShape::classify(&geometry.value).to_multi_polygon()
        }
        GeoJson::FeatureCollection(collection) => normalize_features(&collection.features),
    }
}

fn normalize_features(features: &[Feature]) -> Result<MultiPolygon<f64>, AnalysisError> {
    let shapes: Vec<PolygonShape<'_>> = features
        .iter()
        .filter_map(|feature| feature.geometry.as_ref())
        .map(|geometry: &Geometry| PolygonShape::classify(&geometry.value))
        .filter(PolygonShape::is_polygonal)
        .collect();

    log::debug!(
        "Normalizing {} polygon geometries out of {} features",
        shapes.len(),
        features.len()
    );

    match shapes.len() {
        0 => Err(AnalysisError::NoPolygonGeometry),
        1 => shapes[0].to_multi_polygon(),
        _ => {
            let parts = shapes
                .into_iter()
                .map(PolygonShape::to_multi_polygon)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(union_all(parts))
        }
    }
}

fn union_all(parts: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    parts
        .into_iter()
        .reduce(|merged, part| merged.union(&part))
        .unwrap_or_else(|| MultiPolygon::new(vec![]))
}

fn build_polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>, AnalysisError> {
    let Some((exterior, interiors)) = rings.split_first() else {
        return Err(AnalysisError::invalid_polygon("polygon has no rings"));
    };

    let exterior = build_ring(exterior)?;
    let interiors = interiors
        .iter()
        .map(|ring| build_ring(ring))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Validates a closed ring and merges near-duplicate consecutive vertices.
fn build_ring(ring: &[Position]) -> Result<LineString<f64>, AnalysisError> {
    if ring.len() < 4 {
        return Err(AnalysisError::invalid_polygon(format!(
            "ring has {} positions, at least 4 are required",
            ring.len()
        )));
    }

    let mut coords = ring
        .iter()
        .map(|position| to_coord(position))
        .collect::<Result<Vec<_>, _>>()?;

    if coords.first() != coords.last() {
        return Err(AnalysisError::invalid_polygon("ring is not closed"));
    }

    coords.dedup_by(|current, previous| nearly_equal(*current, *previous));

    // The closing vertex may have been merged into its neighbour, so count
    // distinct vertices on the open ring.
    let distinct = if coords.len() > 1 && coords.first() == coords.last() {
        coords.len() - 1
    } else {
        coords.len()
    };

    if distinct < 3 {
        return Err(AnalysisError::invalid_polygon(format!(
            "ring has {distinct} distinct vertices, at least 3 are required"
        )));
    }

    Ok(LineString::new(coords))
}

fn to_coord(position: &[f64]) -> Result<Coord<f64>, AnalysisError> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
        [_, _, ..] => Err(AnalysisError::invalid_polygon("non-finite coordinate")),
        _ => Err(AnalysisError::invalid_polygon(format!(
            "position has {} ordinates, at least 2 are required",
            position.len()
        ))),
    }
}

fn nearly_equal(a: Coord<f64>, b: Coord<f64>) -> bool {
    (a.x - b.x).abs() <= VERTEX_EPSILON_DEG && (a.y - b.y).abs() <= VERTEX_EPSILON_DEG
}

#[cfg(test)]
mod tests {
    use geo::Area;
    use serde_json::json;

    use super::*;

    fn parse(value: &serde_json::Value) -> GeoJson {
        GeoJson::from_json_value(value.clone()).unwrap()
    }

    fn square(x: f64, y: f64, size: f64) -> serde_json::Value {
        json!([[
            [x, y],
            [x + size, y],
            [x + size, y + size],
            [x, y + size],
            [x, y]
        ]])
    }

    fn polygon_feature(coordinates: &serde_json::Value) -> serde_json::Value {
        json!({
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "Polygon", "coordinates": coordinates }
        })
    }

    #[test]
    fn bare_polygon_is_identity() {
        let geojson = parse(&json!({ "type": "Polygon", "coordinates": square(0.0, 0.0, 1.0) }));

        let normalized = normalize(&geojson).unwrap();

        assert_eq!(normalized.0.len(), 1);
        assert!((normalized.unsigned_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn classifies_polygon_with_holes() {
        let value = geojson::Value::Polygon(vec![
            vec![
                vec![0.0, 0.0],
                vec![4.0, 0.0],
                vec![4.0, 4.0],
                vec![0.0, 4.0],
                vec![0.0, 0.0],
            ],
            vec![
                vec![1.0, 1.0],
                vec![1.0, 2.0],
                vec![2.0, 2.0],
                vec![2.0, 1.0],
                vec![1.0, 1.0],
            ],
        ]);

        let shape = PolygonShape::classify(&value);
        assert!(matches!(shape, PolygonShape::PolygonWithHoles(_)));

        let normalized = shape.to_multi_polygon().unwrap();
        assert_eq!(normalized.0[0].interiors().len(), 1);
        assert!((normalized.unsigned_area() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn feature_wrapping_polygon() {
        let geojson = parse(&polygon_feature(&square(10.0, 10.0, 2.0)));

        let normalized = normalize(&geojson).unwrap();

        assert!((normalized.unsigned_area() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn collection_unions_overlapping_polygons() {
        let geojson = parse(&json!({
            "type": "FeatureCollection",
            "features": [
                polygon_feature(&square(0.0, 0.0, 2.0)),
                polygon_feature(&square(1.0, 0.0, 2.0)),
            ]
        }));

        let normalized = normalize(&geojson).unwrap();

        // Two 2x2 squares overlapping by 1x2 cover 6 units, not 8.
        assert!((normalized.unsigned_area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn multi_polygon_parts_are_unioned() {
        let geojson = parse(&json!({
            "type": "MultiPolygon",
            "coordinates": [square(0.0, 0.0, 2.0), square(1.0, 0.0, 2.0)]
        }));

        let normalized = normalize(&geojson).unwrap();

        assert_eq!(normalized.0.len(), 1);
        assert!((normalized.unsigned_area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn single_multi_polygon_feature_in_collection_is_unioned() {
        let geojson = parse(&json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)]
                }
            }]
        }));

        let normalized = normalize(&geojson).unwrap();

        // 4 + 4 minus the 1x1 overlap.
        assert!((normalized.unsigned_area() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_multi_polygon_keeps_every_part() {
        let geojson = parse(&json!({
            "type": "MultiPolygon",
            "coordinates": [square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]
        }));

        let normalized = normalize(&geojson).unwrap();

        assert_eq!(normalized.0.len(), 2);
        assert!((normalized.unsigned_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn collection_skips_non_polygon_features() {
        let geojson = parse(&json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } },
                { "type": "Feature", "properties": {}, "geometry": null },
                polygon_feature(&square(0.0, 0.0, 1.0)),
            ]
        }));

        let normalized = normalize(&geojson).unwrap();

        assert_eq!(normalized.0.len(), 1);
    }

    #[test]
    fn collection_without_polygons_fails() {
        let geojson = parse(&json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [0.0, 0.0] } },
                { "type": "Feature", "properties": {}, "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] } },
            ]
        }));

        assert!(matches!(
            normalize(&geojson),
            Err(AnalysisError::NoPolygonGeometry)
        ));
    }

    #[test]
    fn bare_point_is_unsupported() {
        let geojson = parse(&json!({ "type": "Point", "coordinates": [121.0, 14.0] }));

        let err = normalize(&geojson).unwrap_err();

        assert!(
            matches!(&err, AnalysisError::UnsupportedGeometryType { geometry_type } if geometry_type == "Point"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn feature_wrapping_line_is_unsupported() {
        let geojson = parse(&json!({
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "LineString", "coordinates": [[121.0, 14.0], [121.1, 14.1]] }
        }));

        assert!(matches!(
            normalize(&geojson),
            Err(AnalysisError::UnsupportedGeometryType { geometry_type }) if geometry_type == "LineString"
        ));
    }

    #[test]
    fn feature_without_geometry_has_no_polygon() {
        let geojson = parse(&json!({
            "type": "Feature",
            "properties": {},
            "geometry": null
        }));

        assert!(matches!(
            normalize(&geojson),
            Err(AnalysisError::NoPolygonGeometry)
        ));
    }

    #[test]
    fn geometry_collection_is_unsupported() {
        let geojson = parse(&json!({
            "type": "GeometryCollection",
            "geometries": [{ "type": "Polygon", "coordinates": square(0.0, 0.0, 1.0) }]
        }));

        assert!(matches!(
            normalize(&geojson),
            Err(AnalysisError::UnsupportedGeometryType { geometry_type }) if geometry_type == "GeometryCollection"
        ));
    }

    #[test]
    fn unclosed_ring_is_invalid() {
        let value = geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
        ]]);

        assert!(matches!(
            PolygonShape::classify(&value).to_multi_polygon(),
            Err(AnalysisError::InvalidPolygonInput { .. })
        ));
    }

    #[test]
    fn ring_collapsing_to_two_vertices_is_invalid() {
        let value = geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1e-14],
            vec![0.0, 0.0],
        ]]);

        assert!(matches!(
            PolygonShape::classify(&value).to_multi_polygon(),
            Err(AnalysisError::InvalidPolygonInput { .. })
        ));
    }

    #[test]
    fn near_duplicate_vertices_are_merged() {
        let value = geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1e-13],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]]);

        let normalized = PolygonShape::classify(&value).to_multi_polygon().unwrap();

        assert_eq!(normalized.0[0].exterior().0.len(), 5);
    }
}
