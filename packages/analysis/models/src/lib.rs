#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coastline change analysis result types.
//!
//! These are the records produced by comparing a baseline coastline with a
//! later comparison coastline. They serialize to camelCase JSON so they can
//! be handed to a store or an API layer unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shoreline_coastline_models::Location;
use strum_macros::{AsRefStr, Display, EnumString};

/// Qualitative erosion risk tier, ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RiskLevel {
    /// Stable shoreline.
    #[default]
    Low,
    /// Moderate change; keep watching.
    Medium,
    /// Significant change; plan protection.
    High,
    /// Severe change; act now.
    Critical,
}

impl RiskLevel {
    /// All tiers in ascending severity.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

/// Risk tier plus the reasoning shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Assigned tier.
    pub level: RiskLevel,
    /// Conditions that led to the tier.
    pub factors: Vec<String>,
    /// Suggested responses.
    pub recommendations: Vec<String>,
}

/// Scalar change metrics, rounded for presentation.
///
/// Areas are in km², `average_annual_change` in km² per year and
/// `affected_length` in km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Area present in the baseline but not the comparison.
    pub land_loss_area: f64,
    /// Area present in the comparison but not the baseline.
    pub land_gain_area: f64,
    /// `land_gain_area - land_loss_area`; negative means net loss.
    pub net_change: f64,
    /// Change in total area relative to the baseline, in percent.
    pub percentage_change: f64,
    /// Net change divided by the year span (zero for a non-positive span).
    pub average_annual_change: f64,
    /// Length of the baseline boundary.
    pub affected_length: f64,
}

/// Which two coastlines an analysis compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonInfo {
    /// Capture year of the baseline.
    pub baseline_year: i32,
    /// Capture year of the comparison.
    pub comparison_year: i32,
    /// Store identifier of the baseline.
    pub baseline_coastline_id: String,
    /// Store identifier of the comparison.
    pub comparison_coastline_id: String,
}

/// A notable location along the shoreline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePoint {
    /// `[longitude, latitude]`.
    pub coordinates: [f64; 2],
    /// Severity label.
    pub severity: RiskLevel,
    /// Human-readable description.
    pub description: String,
}

/// Loss and gain geometries kept alongside the scalar results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeospatialData {
    /// Area lost, or `None` when nothing was lost.
    pub loss_polygon: Option<geojson::Geometry>,
    /// Area gained, or `None` when nothing was gained.
    pub gain_polygon: Option<geojson::Geometry>,
    /// Notable change points. Detection is not implemented, so this is
    /// always empty for generated analyses.
    #[serde(default)]
    pub change_points: Vec<ChangePoint>,
}

/// A complete analysis record, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Display name.
    pub name: String,
    /// Location, copied from the baseline coastline.
    pub location: Location,
    /// The compared coastlines.
    pub comparison: ComparisonInfo,
    /// Scalar metrics.
    pub results: AnalysisResult,
    /// Loss/gain geometries.
    #[serde(default)]
    pub geospatial_data: GeospatialData,
    /// Risk classification.
    pub risk_assessment: RiskAssessment,
    /// When the analysis was produced.
    pub created_at: DateTime<Utc>,
}

/// Aggregate figures for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStats {
    /// Region name.
    pub region: String,
    /// Number of analyses in the region.
    pub analysis_count: u64,
    /// Summed land loss in km².
    pub total_loss: f64,
    /// Mean percentage change.
    pub average_percentage_change: f64,
}

/// Aggregate figures over a set of analyses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsOverview {
    /// Number of analyses considered.
    pub total_analyses: u64,
    /// Summed land loss in km².
    pub total_land_loss: f64,
    /// Summed land gain in km².
    pub total_land_gain: f64,
    /// Mean annual change, `None` when there are no analyses.
    pub average_annual_change: Option<f64>,
    /// Analyses classified [`RiskLevel::Critical`].
    pub critical_areas: u64,
    /// Analyses classified [`RiskLevel::High`].
    pub high_risk_areas: u64,
    /// Per-region breakdown, largest total loss first.
    pub by_region: Vec<RegionStats>,
}

/// Coastline coverage for one region/province/municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    /// Region name.
    pub region: String,
    /// Province name.
    pub province: String,
    /// Municipality name.
    pub municipality: String,
    /// Number of coastlines at this location.
    pub count: u64,
    /// Distinct capture years, ascending.
    pub years: Vec<i32>,
    /// Earliest capture year.
    pub min_year: i32,
    /// Latest capture year.
    pub max_year: i32,
}
