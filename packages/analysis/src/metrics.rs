//! Area, length, and rate metrics for a coastline comparison.
//!
//! Coordinates are WGS84 longitude/latitude, so areas and lengths are
//! measured on the ellipsoid rather than on raw degrees.

use geo::orient::Direction;
use geo::{Geodesic, GeodesicArea, Length, MultiPolygon, Orient};
use shoreline_analysis_models::AnalysisResult;

use crate::AnalysisError;
use crate::difference::DifferenceResult;

const SQ_METERS_PER_SQ_KM: f64 = 1_000_000.0;
const METERS_PER_KM: f64 = 1_000.0;

/// Baseline areas at or below this many km² cannot be used as a divisor.
pub const MIN_BASELINE_AREA_KM2: f64 = 1e-12;

/// Full-precision change metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeMetrics {
    /// Baseline area in km².
    pub baseline_area: f64,
    /// Comparison area in km².
    pub comparison_area: f64,
    /// Lost area in km².
    pub land_loss_area: f64,
    /// Gained area in km².
    pub land_gain_area: f64,
    /// `land_gain_area - land_loss_area`.
    pub net_change: f64,
    /// `(comparison_area - baseline_area) / baseline_area * 100`.
    pub percentage_change: f64,
    /// `net_change` per year, zero for a non-positive year span.
    pub average_annual_change: f64,
    /// Baseline boundary length in km.
    pub affected_length: f64,
}

impl ChangeMetrics {
    /// Rounds for presentation: areas and rate to 4 decimals, percentage
    /// and length to 2.
    #[must_use]
    pub fn rounded(&self) -> AnalysisResult {
        AnalysisResult {
            land_loss_area: round_to(self.land_loss_area, 4),
            land_gain_area: round_to(self.land_gain_area, 4),
            net_change: round_to(self.net_change, 4),
            percentage_change: round_to(self.percentage_change, 2),
            average_annual_change: round_to(self.average_annual_change, 4),
            affected_length: round_to(self.affected_length, 2),
        }
    }
}

/// Computes change metrics for a comparison.
///
/// A year span of zero or less yields an `average_annual_change` of zero.
///
/// # Errors
///
/// Returns [`AnalysisError::DivisionByZeroArea`] if the baseline has no
/// measurable area.
pub fn compute(
    baseline: &MultiPolygon<f64>,
    comparison: &MultiPolygon<f64>,
    diff: &DifferenceResult,
    baseline_year: i32,
    comparison_year: i32,
) -> Result<ChangeMetrics, AnalysisError> {
    let baseline_area = area_km2(baseline);
    if baseline_area <= MIN_BASELINE_AREA_KM2 {
        return Err(AnalysisError::DivisionByZeroArea);
    }

    let comparison_area = area_km2(comparison);
    let land_loss_area = area_km2(&diff.loss);
    let land_gain_area = area_km2(&diff.gain);
    let net_change = land_gain_area - land_loss_area;
    let percentage_change = (comparison_area - baseline_area) / baseline_area * 100.0;

    let span = comparison_year.saturating_sub(baseline_year);
    let average_annual_change = if span > 0 {
        net_change / f64::from(span)
    } else {
        log::warn!(
            "Non-positive year span ({baseline_year} -> {comparison_year}); \
             reporting zero annual change"
        );
        0.0
    };

    Ok(ChangeMetrics {
        baseline_area,
        comparison_area,
        land_loss_area,
        land_gain_area,
        net_change,
        percentage_change,
        average_annual_change,
        affected_length: boundary_length_km(baseline),
    })
}

/// Geodesic area of a multi-polygon in km².
#[must_use]
pub fn area_km2(geometry: &MultiPolygon<f64>) -> f64 {
    geometry
        .0
        .iter()
        .map(|polygon| polygon.orient(Direction::Default).geodesic_area_unsigned())
        .fold(0.0, |total, area| total + area)
        / SQ_METERS_PER_SQ_KM
}

/// Geodesic length of every ring (holes included) in km.
#[must_use]
pub fn boundary_length_km(geometry: &MultiPolygon<f64>) -> f64 {
    geometry
        .0
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
        .map(|ring| Geodesic.length(ring))
        .fold(0.0, |total, length| total + length)
        / METERS_PER_KM
}

/// Rounds half away from zero to `places` decimals, never returning `-0.0`.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}
