//! Polygon set difference between a baseline and a comparison coastline.
//!
//! Clipping runs in native longitude/latitude. Each baseline part is only
//! clipped against the comparison parts whose bounding boxes touch it, so
//! disjoint parts pass straight through without a boolean operation.

use geo::{Area, BooleanOps, BoundingRect, CoordsIter, LineString, MultiPolygon, Polygon};
use rstar::{AABB, RTree, RTreeObject};

use crate::AnalysisError;

/// Result polygons smaller than this (in square degrees) are treated as
/// floating-point slivers and dropped.
pub const SLIVER_AREA_DEG2: f64 = 1e-14;

/// Area lost and gained between two coastlines.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceResult {
    /// Present in the baseline, absent in the comparison.
    pub loss: MultiPolygon<f64>,
    /// Present in the comparison, absent in the baseline.
    pub gain: MultiPolygon<f64>,
}

impl DifferenceResult {
    fn empty() -> Self {
        Self {
            loss: MultiPolygon::new(vec![]),
            gain: MultiPolygon::new(vec![]),
        }
    }
}

/// A comparison part stored in the R-tree.
struct PartEntry<'a> {
    envelope: AABB<[f64; 2]>,
    polygon: &'a Polygon<f64>,
}

impl RTreeObject for PartEntry<'_> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Computes `loss = baseline - comparison` and `gain = comparison - baseline`.
///
/// # Errors
///
/// * [`AnalysisError::InvalidPolygonInput`] if either side is empty or has a
///   ring with fewer than 3 distinct vertices
/// * [`AnalysisError::GeometryTooComplex`] if the combined vertex count
///   exceeds `max_vertices`
pub fn difference(
    baseline: &MultiPolygon<f64>,
    comparison: &MultiPolygon<f64>,
    max_vertices: usize,
) -> Result<DifferenceResult, AnalysisError> {
    validate(baseline)?;
    validate(comparison)?;

    let vertices = baseline.coords_count() + comparison.coords_count();
    if vertices > max_vertices {
        return Err(AnalysisError::GeometryTooComplex {
            vertices,
            limit: max_vertices,
        });
    }

    if baseline == comparison {
        log::debug!("Baseline and comparison geometries are identical");
        return Ok(DifferenceResult::empty());
    }

    let loss = subtract(baseline, comparison);
    let gain = subtract(comparison, baseline);

    log::debug!(
        "Difference produced {} loss parts and {} gain parts from {vertices} vertices",
        loss.0.len(),
        gain.0.len()
    );

    Ok(DifferenceResult { loss, gain })
}

/// Rejects empty geometries and degenerate rings.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidPolygonInput`] describing the first
/// problem found.
pub fn validate(geometry: &MultiPolygon<f64>) -> Result<(), AnalysisError> {
    if geometry.0.is_empty() {
        return Err(AnalysisError::invalid_polygon("geometry is empty"));
    }

    for polygon in &geometry.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            let distinct = distinct_vertices(ring);
            if distinct < 3 {
                return Err(AnalysisError::invalid_polygon(format!(
                    "ring has {distinct} distinct vertices, at least 3 are required"
                )));
            }
        }
    }

    Ok(())
}

fn distinct_vertices(ring: &LineString<f64>) -> usize {
    if ring.is_closed() {
        ring.0.len().saturating_sub(1)
    } else {
        ring.0.len()
    }
}

fn subtract(minuend: &MultiPolygon<f64>, subtrahend: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    let tree = RTree::bulk_load(
        subtrahend
            .0
            .iter()
            .filter_map(|polygon| {
                envelope(polygon).map(|envelope| PartEntry { envelope, polygon })
            })
            .collect(),
    );

    let mut parts = Vec::new();

    for polygon in &minuend.0 {
        let Some(query) = envelope(polygon) else {
            continue;
        };

        let overlapping: Vec<Polygon<f64>> = tree
            .locate_in_envelope_intersecting(&query)
            .map(|entry| entry.polygon.clone())
            .collect();

        if overlapping.is_empty() {
            parts.push(polygon.clone());
            continue;
        }

        let clipped = polygon.difference(&MultiPolygon::new(overlapping));
        parts.extend(
            clipped
                .0
                .into_iter()
                .filter(|part| part.unsigned_area() > SLIVER_AREA_DEG2),
        );
    }

    MultiPolygon::new(parts)
}

fn envelope(polygon: &Polygon<f64>) -> Option<AABB<[f64; 2]>> {
    polygon
        .bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    const LIMIT: usize = 1_000_000;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x0, y: y0),
            (x: x1, y: y0),
            (x: x1, y: y1),
            (x: x0, y: y1),
            (x: x0, y: y0),
        ]])
    }

    #[test]
    fn identical_inputs_produce_empty_results() {
        let a = rect(121.0, 14.0, 121.1, 14.1);

        let result = difference(&a, &a.clone(), LIMIT).unwrap();

        assert!(result.loss.0.is_empty());
        assert!(result.gain.0.is_empty());
    }

    #[test]
    fn disjoint_inputs_pass_through_whole() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(5.0, 5.0, 7.0, 6.0);

        let result = difference(&a, &b, LIMIT).unwrap();

        assert_eq!(result.loss, a);
        assert_eq!(result.gain, b);
    }

    #[test]
    fn partial_overlap_splits_into_loss_and_gain() {
        let a = rect(0.0, 0.0, 2.0, 1.0);
        let b = rect(1.0, 0.0, 3.0, 1.0);

        let result = difference(&a, &b, LIMIT).unwrap();

        assert!((result.loss.unsigned_area() - 1.0).abs() < 1e-9);
        assert!((result.gain.unsigned_area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn contained_comparison_is_pure_loss() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(0.0, 0.0, 1.0, 0.9);

        let result = difference(&a, &b, LIMIT).unwrap();

        assert!((result.loss.unsigned_area() - 0.1).abs() < 1e-9);
        assert!(result.gain.0.is_empty());
    }

    #[test]
    fn only_overlapping_parts_are_clipped() {
        let mut a = rect(0.0, 0.0, 1.0, 1.0);
        a.0.extend(rect(10.0, 10.0, 11.0, 11.0).0);
        let b = rect(0.5, 0.0, 1.5, 1.0);

        let result = difference(&a, &b, LIMIT).unwrap();

        // Half of the first square plus the untouched second square.
        assert!((result.loss.unsigned_area() - 1.5).abs() < 1e-9);
        assert!((result.gain.unsigned_area() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn self_touching_ring_does_not_fail() {
        // Two triangles meeting at a single vertex, drawn as one ring.
        let bowtie = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 0.5, y: 0.5),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
            (x: 0.5, y: 0.5),
            (x: 0.0, y: 0.0),
        ]]);
        let other = rect(0.0, 0.0, 1.0, 0.25);

        let result = difference(&bowtie, &other, LIMIT).unwrap();

        assert!(result.loss.unsigned_area() > 0.0);
        assert!(result.gain.unsigned_area() > 0.0);
    }

    #[test]
    fn empty_geometry_is_rejected() {
        let empty = MultiPolygon::new(vec![]);
        let a = rect(0.0, 0.0, 1.0, 1.0);

        assert!(matches!(
            difference(&empty, &a, LIMIT),
            Err(AnalysisError::InvalidPolygonInput { .. })
        ));
        assert!(matches!(
            difference(&a, &empty, LIMIT),
            Err(AnalysisError::InvalidPolygonInput { .. })
        ));
    }

    #[test]
    fn degenerate_ring_is_rejected() {
        let sliver = MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        )]);
        let a = rect(0.0, 0.0, 1.0, 1.0);

        assert!(matches!(
            difference(&sliver, &a, LIMIT),
            Err(AnalysisError::InvalidPolygonInput { .. })
        ));
    }

    #[test]
    fn vertex_limit_is_enforced() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(0.5, 0.5, 1.5, 1.5);

        assert!(matches!(
            difference(&a, &b, 6),
            Err(AnalysisError::GeometryTooComplex { vertices: 10, limit: 6 })
        ));
    }
}
