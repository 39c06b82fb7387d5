#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coastline change analysis engine.
//!
//! Compares a baseline coastline with a later comparison coastline:
//!
//! 1. [`normalize`] turns each `GeoJSON` payload into one multi-polygon
//! 2. [`difference`] computes the area lost and gained
//! 3. [`metrics`] measures areas, boundary length, and rates on the ellipsoid
//! 4. [`risk`] assigns an erosion risk tier
//!
//! [`analyze`] runs the whole pipeline on two resolved coastlines and
//! [`compare`] does the same for identifiers resolved through a
//! [`CoastlineStore`]. Every stage is a pure function of its inputs, so
//! comparisons can run concurrently without coordination.

pub mod difference;
pub mod metrics;
pub mod normalize;
pub mod risk;
pub mod statistics;
pub mod store;

use chrono::Utc;
use geo::MultiPolygon;
use shoreline_analysis_models::{Analysis, ComparisonInfo, GeospatialData};
use shoreline_coastline_models::Coastline;
use thiserror::Error;

pub use store::{CoastlineStore, MemoryStore};

/// Default cap on the combined vertex count of a comparison.
pub const DEFAULT_MAX_VERTICES: usize = 2_000_000;

/// Errors that can occur while analyzing coastline change.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The input contains no polygon or multi-polygon geometry.
    #[error("No polygon geometry found in input")]
    NoPolygonGeometry,

    /// The top-level geometry is not polygon-typed.
    #[error("Unsupported geometry type: {geometry_type}")]
    UnsupportedGeometryType {
        /// The `GeoJSON` type name that was found.
        geometry_type: String,
    },

    /// A ring is malformed or a geometry is empty.
    #[error("Invalid polygon input: {message}")]
    InvalidPolygonInput {
        /// Description of what went wrong.
        message: String,
    },

    /// A coastline identifier did not resolve.
    #[error("Coastline not found: {id}")]
    CoastlineNotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// The baseline has zero area, so percentage change is undefined.
    #[error("Baseline area is zero; percentage change is undefined")]
    DivisionByZeroArea,

    /// The inputs have more vertices than the configured limit.
    #[error("Geometry too complex: {vertices} vertices exceeds the limit of {limit}")]
    GeometryTooComplex {
        /// Combined vertex count of both inputs.
        vertices: usize,
        /// Configured limit.
        limit: usize,
    },

    /// An error attributed to one of the compared coastlines.
    #[error("Coastline {id}: {source}")]
    Dataset {
        /// Identifier of the coastline that failed.
        id: String,
        /// The underlying error.
        source: Box<Self>,
    },
}

impl AnalysisError {
    pub(crate) fn invalid_polygon(message: impl Into<String>) -> Self {
        Self::InvalidPolygonInput {
            message: message.into(),
        }
    }

    fn for_dataset(self, id: &str) -> Self {
        Self::Dataset {
            id: id.to_string(),
            source: Box::new(self),
        }
    }

    /// The underlying error with any dataset attribution removed.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Dataset { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Tunables for a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Maximum combined vertex count of both coastlines.
    pub max_vertices: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_vertices: DEFAULT_MAX_VERTICES,
        }
    }
}

/// Analyzes the change from `baseline` to `comparison` with default options.
///
/// `name` defaults to `"<baseline name> Analysis"`.
///
/// # Errors
///
/// Returns [`AnalysisError`] if either geometry cannot be normalized,
/// differenced, or measured. No partial result is produced.
pub fn analyze(
    baseline: &Coastline,
    comparison: &Coastline,
    name: Option<&str>,
) -> Result<Analysis, AnalysisError> {
    analyze_with(baseline, comparison, name, &AnalysisOptions::default())
}

/// Analyzes the change from `baseline` to `comparison`.
///
/// # Errors
///
/// Returns [`AnalysisError`] if either geometry cannot be normalized,
/// differenced, or measured. No partial result is produced.
pub fn analyze_with(
    baseline: &Coastline,
    comparison: &Coastline,
    name: Option<&str>,
    options: &AnalysisOptions,
) -> Result<Analysis, AnalysisError> {
    let result = run(baseline, comparison, name, options);

    if let Err(e) = &result {
        log::error!(
            "Analysis of coastlines {} -> {} failed: {e}",
            baseline.id,
            comparison.id
        );
    }

    result
}

/// Resolves both coastlines through `store` and analyzes them with default
/// options.
///
/// # Errors
///
/// Returns [`AnalysisError::CoastlineNotFound`] if either identifier does
/// not resolve, or any error from [`analyze`].
pub fn compare(
    store: &dyn CoastlineStore,
    baseline_id: &str,
    comparison_id: &str,
    name: Option<&str>,
) -> Result<Analysis, AnalysisError> {
    compare_with(
        store,
        baseline_id,
        comparison_id,
        name,
        &AnalysisOptions::default(),
    )
}

/// Resolves both coastlines through `store` and analyzes them.
///
/// # Errors
///
/// Returns [`AnalysisError::CoastlineNotFound`] if either identifier does
/// not resolve, or any error from [`analyze_with`].
pub fn compare_with(
    store: &dyn CoastlineStore,
    baseline_id: &str,
    comparison_id: &str,
    name: Option<&str>,
    options: &AnalysisOptions,
) -> Result<Analysis, AnalysisError> {
    let resolve = |id: &str| {
        store.find_coastline(id).ok_or_else(|| {
            log::error!("Coastline {id} not found (comparing {baseline_id} -> {comparison_id})");
            AnalysisError::CoastlineNotFound { id: id.to_string() }
        })
    };

    let baseline = resolve(baseline_id)?;
    let comparison = resolve(comparison_id)?;

    analyze_with(&baseline, &comparison, name, options)
}

fn run(
    baseline: &Coastline,
    comparison: &Coastline,
    name: Option<&str>,
    options: &AnalysisOptions,
) -> Result<Analysis, AnalysisError> {
    log::debug!(
        "Analyzing {} ({}) -> {} ({})",
        baseline.id,
        baseline.year,
        comparison.id,
        comparison.year
    );

    let baseline_shape =
        normalize::normalize(&baseline.geojson).map_err(|e| e.for_dataset(&baseline.id))?;
    let comparison_shape =
        normalize::normalize(&comparison.geojson).map_err(|e| e.for_dataset(&comparison.id))?;

    let diff = difference::difference(&baseline_shape, &comparison_shape, options.max_vertices)?;

    let metrics = metrics::compute(
        &baseline_shape,
        &comparison_shape,
        &diff,
        baseline.year,
        comparison.year,
    )?;
    let results = metrics.rounded();
    let risk_assessment = risk::classify(results.percentage_change, results.average_annual_change);

    log::info!(
        "{} -> {}: loss {} km², gain {} km², {}% ({} risk)",
        baseline.id,
        comparison.id,
        results.land_loss_area,
        results.land_gain_area,
        results.percentage_change,
        risk_assessment.level
    );

    Ok(Analysis {
        name: name.map_or_else(|| format!("{} Analysis", baseline.name), str::to_string),
        location: baseline.location.clone(),
        comparison: ComparisonInfo {
            baseline_year: baseline.year,
            comparison_year: comparison.year,
            baseline_coastline_id: baseline.id.clone(),
            comparison_coastline_id: comparison.id.clone(),
        },
        results,
        geospatial_data: GeospatialData {
            loss_polygon: to_geojson(&diff.loss),
            gain_polygon: to_geojson(&diff.gain),
            change_points: vec![],
        },
        risk_assessment,
        created_at: Utc::now(),
    })
}

fn to_geojson(geometry: &MultiPolygon<f64>) -> Option<geojson::Geometry> {
    if geometry.0.is_empty() {
        None
    } else {
        Some(geojson::Geometry::new(geojson::Value::from(geometry)))
    }
}
