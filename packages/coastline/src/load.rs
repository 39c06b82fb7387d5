//! Builds [`Coastline`] records from `GeoJSON` files on disk.

use std::path::Path;

use chrono::{Datelike, Utc};
use geojson::GeoJson;
use shoreline_coastline_models::{Coastline, CoastlineMetadata, Location};

use crate::filename::metadata_from_filename;
use crate::{CoastlineError, MAX_YEARS_AHEAD, MIN_YEAR};

/// Explicit values that take precedence over anything inferred from the
/// file name.
#[derive(Debug, Clone, Default)]
pub struct CoastlineOverrides {
    /// Record identifier (defaults to the file stem).
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Capture year.
    pub year: Option<i32>,
    /// Region.
    pub region: Option<String>,
    /// Province.
    pub province: Option<String>,
    /// Municipality.
    pub municipality: Option<String>,
    /// Barangay.
    pub barangay: Option<String>,
    /// Provenance.
    pub metadata: CoastlineMetadata,
}

/// Parses `GeoJSON` text, distinguishing malformed JSON from JSON that is
/// not `GeoJSON`.
///
/// # Errors
///
/// * [`CoastlineError::Json`] if the text is not JSON
/// * [`CoastlineError::GeoJson`] if the JSON is not `GeoJSON`
pub fn parse_geojson(text: &str) -> Result<GeoJson, CoastlineError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(GeoJson::from_json_value(value)?)
}

/// Reads and parses a `GeoJSON` file.
///
/// # Errors
///
/// Returns [`CoastlineError`] if the file cannot be read or parsed.
pub fn read_geojson(path: &Path) -> Result<GeoJson, CoastlineError> {
    let text = std::fs::read_to_string(path)?;
    parse_geojson(&text)
}

/// Loads a coastline from a `GeoJSON` file.
///
/// Name and year come from `overrides` when set, otherwise from the file
/// name (see [`metadata_from_filename`]); the year falls back to the current
/// year. Location fields default to `"Unknown"`.
///
/// # Errors
///
/// Returns [`CoastlineError`] if the file cannot be read or parsed, or the
/// year is out of range.
pub fn load_coastline(
    path: &Path,
    overrides: &CoastlineOverrides,
) -> Result<Coastline, CoastlineError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let inferred = metadata_from_filename(&file_name);

    let year = overrides.year.unwrap_or_else(|| inferred.year_or_current());
    validate_year(year)?;

    let geojson = read_geojson(path)?;

    let id = overrides.id.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let unknown = Location::unknown();
    let location = Location {
        region: overrides.region.clone().unwrap_or(unknown.region),
        province: overrides.province.clone().unwrap_or(unknown.province),
        municipality: overrides
            .municipality
            .clone()
            .unwrap_or(unknown.municipality),
        barangay: overrides.barangay.clone(),
    };

    log::debug!("Loaded coastline {id} ({year}) from {}", path.display());

    Ok(Coastline {
        id,
        name: overrides.name.clone().unwrap_or(inferred.name),
        location,
        year,
        geojson,
        metadata: overrides.metadata.clone(),
    })
}

/// Checks that a capture year is between [`MIN_YEAR`] and
/// [`MAX_YEARS_AHEAD`] years from now.
///
/// # Errors
///
/// Returns [`CoastlineError::InvalidYear`] if it is not.
pub fn validate_year(year: i32) -> Result<(), CoastlineError> {
    let max = Utc::now().year() + MAX_YEARS_AHEAD;
    if (MIN_YEAR..=max).contains(&year) {
        Ok(())
    } else {
        Err(CoastlineError::InvalidYear {
            year,
            min: MIN_YEAR,
            max,
        })
    }
}
