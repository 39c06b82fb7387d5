//! Boundary to whatever holds coastline records.

use std::collections::BTreeMap;

use shoreline_coastline_models::Coastline;

/// Resolves coastline identifiers to records.
///
/// Implemented by the persistence layer; the analysis engine never writes
/// through it.
pub trait CoastlineStore: Send + Sync {
    /// Looks up a coastline by identifier.
    fn find_coastline(&self, id: &str) -> Option<Coastline>;
}

/// A [`CoastlineStore`] backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    coastlines: BTreeMap<String, Coastline>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            coastlines: BTreeMap::new(),
        }
    }

    /// Inserts a coastline under its own id, returning any record it
    /// replaced.
    pub fn insert(&mut self, coastline: Coastline) -> Option<Coastline> {
        self.coastlines.insert(coastline.id.clone(), coastline)
    }

    /// Number of stored coastlines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coastlines.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coastlines.is_empty()
    }
}

impl FromIterator<Coastline> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Coastline>>(iter: I) -> Self {
        let mut store = Self::new();
        for coastline in iter {
            store.insert(coastline);
        }
        store
    }
}

impl CoastlineStore for MemoryStore {
    fn find_coastline(&self, id: &str) -> Option<Coastline> {
        self.coastlines.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use geojson::GeoJson;
    use shoreline_coastline_models::{CoastlineMetadata, Location};

    use super::*;

    fn coastline(id: &str, year: i32) -> Coastline {
        Coastline {
            id: id.to_string(),
            name: id.to_string(),
            location: Location::unknown(),
            year,
            geojson: GeoJson::from_json_value(serde_json::json!({
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
            }))
            .unwrap(),
            metadata: CoastlineMetadata::default(),
        }
    }

    #[test]
    fn lookup_by_id() {
        let store: MemoryStore = [coastline("a", 2000), coastline("b", 2010)]
            .into_iter()
            .collect();

        assert_eq!(store.len(), 2);
        assert_eq!(store.find_coastline("b").map(|c| c.year), Some(2010));
        assert!(store.find_coastline("c").is_none());
    }

    #[test]
    fn insert_replaces_same_id() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        assert!(store.insert(coastline("a", 2000)).is_none());
        let replaced = store.insert(coastline("a", 2005));

        assert_eq!(replaced.map(|c| c.year), Some(2000));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_coastline("a").map(|c| c.year), Some(2005));
    }
}
