#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coastline `GeoJSON` loading and inspection.
//!
//! Reads coastline snapshots from `GeoJSON` files into
//! [`Coastline`](shoreline_coastline_models::Coastline) records, filling in
//! the name and capture year from file names like `Manila_Bay_2010.geojson`
//! when they are not given explicitly.

pub mod filename;
pub mod inspect;
pub mod load;

use thiserror::Error;

/// Earliest accepted capture year.
pub const MIN_YEAR: i32 = 1900;

/// How far past the current year a capture year may be.
pub const MAX_YEARS_AHEAD: i32 = 10;

/// Errors that can occur while loading coastline data.
#[derive(Debug, Error)]
pub enum CoastlineError {
    /// Reading the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The capture year is outside the accepted range.
    #[error("Invalid capture year {year}: expected {min}-{max}")]
    InvalidYear {
        /// The rejected year.
        year: i32,
        /// Earliest accepted year.
        min: i32,
        /// Latest accepted year.
        max: i32,
    },
}
