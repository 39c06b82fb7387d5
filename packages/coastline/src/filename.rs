//! Name and capture year inferred from an uploaded file's name.

use chrono::{Datelike, Utc};
use regex::Regex;

/// Metadata recovered from a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameMetadata {
    /// Readable name, e.g. "Manila Bay" for `Manila_Bay_2010.geojson`.
    pub name: String,
    /// First four-digit run in the name, if any.
    pub year: Option<i32>,
}

impl FilenameMetadata {
    /// The parsed year, or the current UTC year.
    #[must_use]
    pub fn year_or_current(&self) -> i32 {
        self.year.unwrap_or_else(|| Utc::now().year())
    }
}

/// Parses a file name such as `Tacloban_Coastline_2023.geojson`.
///
/// Underscores become spaces and the first four-digit run is taken as the
/// capture year and removed from the name. If nothing readable remains, the
/// name falls back to the extension-less file name.
#[must_use]
pub fn metadata_from_filename(filename: &str) -> FilenameMetadata {
    let ext_re = Regex::new(r"(?i)\.(geojson|json)$").unwrap_or_else(|_| unreachable!());
    let year_re = Regex::new(r"[0-9]{4}").unwrap_or_else(|_| unreachable!());

    let stem = ext_re.replace(filename, "");

    let year = year_re
        .find(&stem)
        .and_then(|m| m.as_str().parse::<i32>().ok());

    let spaced = stem.replace('_', " ");
    let without_year = year_re.replace(&spaced, "");
    let name = without_year.split_whitespace().collect::<Vec<_>>().join(" ");

    FilenameMetadata {
        name: if name.is_empty() {
            stem.into_owned()
        } else {
            name
        },
        year,
    }
}
