#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coastline dataset record types.
//!
//! A [`Coastline`] is an immutable snapshot of a shoreline captured in a
//! single year. The raw `GeoJSON` payload is kept as supplied; it is only
//! interpreted by the analysis engine.

use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Administrative location of a coastline segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Region name (e.g. "Region IV-A").
    pub region: String,
    /// Province name.
    pub province: String,
    /// Municipality or city name.
    pub municipality: String,
    /// Barangay, when the segment is that specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barangay: Option<String>,
}

impl Location {
    /// Placeholder location used when nothing better is known.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            region: "Unknown".to_string(),
            province: "Unknown".to_string(),
            municipality: "Unknown".to_string(),
            barangay: None,
        }
    }
}

/// Agency or channel a coastline survey came from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DataSource {
    /// National Mapping and Resource Information Authority.
    #[serde(rename = "NAMRIA")]
    #[strum(serialize = "NAMRIA")]
    Namria,
    /// Nationwide Operational Assessment of Hazards.
    #[serde(rename = "NOAH")]
    #[strum(serialize = "NOAH")]
    Noah,
    /// `OpenStreetMap` coastline extracts.
    OpenStreetMap,
    /// Uploaded by hand.
    #[default]
    #[serde(rename = "Manual Upload")]
    #[strum(serialize = "Manual Upload")]
    ManualUpload,
    /// Anything else.
    Other,
}

/// Positional accuracy of a coastline survey.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Accuracy {
    /// Survey-grade.
    High,
    /// Typical digitized shoreline.
    #[default]
    Medium,
    /// Coarse or generalized.
    Low,
}

/// Provenance details attached to a coastline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoastlineMetadata {
    /// Where the data came from.
    #[serde(default)]
    pub source: DataSource,
    /// How accurate it is.
    #[serde(default)]
    pub accuracy: Accuracy,
    /// Free-form resolution description (e.g. "1:50,000").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Who uploaded the data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    /// Additional notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A shoreline snapshot for one capture year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coastline {
    /// Identifier assigned by whichever store holds the record.
    pub id: String,
    /// Human-readable name (e.g. "Manila Bay").
    pub name: String,
    /// Where the coastline is.
    #[serde(flatten)]
    pub location: Location,
    /// Capture year.
    pub year: i32,
    /// Raw geometry payload: a geometry, feature, or feature collection.
    pub geojson: GeoJson,
    /// Provenance.
    #[serde(default)]
    pub metadata: CoastlineMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_uses_display_names() {
        assert_eq!(DataSource::ManualUpload.to_string(), "Manual Upload");
        assert_eq!(DataSource::Namria.as_ref(), "NAMRIA");
        assert_eq!(
            "OpenStreetMap".parse::<DataSource>().unwrap(),
            DataSource::OpenStreetMap
        );
        assert_eq!(
            serde_json::to_value(DataSource::ManualUpload).unwrap(),
            serde_json::json!("Manual Upload")
        );
    }

    #[test]
    fn coastline_deserializes_with_default_metadata() {
        let value = serde_json::json!({
            "id": "c1",
            "name": "Manila Bay",
            "region": "NCR",
            "province": "Metro Manila",
            "municipality": "Manila",
            "year": 2010,
            "geojson": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
            }
        });

        let coastline: Coastline = serde_json::from_value(value).unwrap();

        assert_eq!(coastline.location.region, "NCR");
        assert_eq!(coastline.location.barangay, None);
        assert_eq!(coastline.metadata.source, DataSource::ManualUpload);
        assert_eq!(coastline.metadata.accuracy, Accuracy::Medium);
        assert!(matches!(coastline.geojson, GeoJson::Geometry(_)));
    }
}
