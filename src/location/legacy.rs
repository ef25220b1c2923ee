//! Legacy city-name aliases.
//!
//! Old query strings identified places by free-text city names. Those names
//! are kept in a static snapshot mapping each name to a geonames id.

use super::types::LocationError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Immutable city name → geonames id table, owned by the resolver.
#[derive(Debug, Clone, Default)]
pub struct LegacyCities {
    ids: HashMap<String, u32>,
}

impl LegacyCities {
    /// Load a JSON snapshot of the form `{"New York": 5128581, ...}`.
    pub fn load(path: &Path) -> Result<Self, LocationError> {
        let data = fs::read_to_string(path).map_err(|e| {
            LocationError::StoreUnavailable(format!(
                "cannot read legacy cities '{}': {}",
                path.display(),
                e
            ))
        })?;
        let cities = Self::from_json_str(&data).map_err(|e| {
            LocationError::StoreUnavailable(format!("{} ({})", e, path.display()))
        })?;
        log::debug!("loaded {} legacy city aliases from {}", cities.len(), path.display());
        Ok(cities)
    }

    pub fn from_json_str(data: &str) -> Result<Self, LocationError> {
        let ids: HashMap<String, u32> = serde_json::from_str(data)
            .map_err(|e| LocationError::StoreUnavailable(format!("invalid legacy cities: {}", e)))?;
        Ok(Self { ids })
    }

    /// Undo the `+`-for-space encoding of old query strings. Nothing else is
    /// normalized; lookups are case and whitespace sensitive.
    pub fn normalize(name: &str) -> String {
        name.replace('+', " ")
    }

    /// Geonames id for an already normalized name.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for LegacyCities {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(|(name, id)| (name.into(), id)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_plus() {
        assert_eq!(LegacyCities::normalize("New+York"), "New York");
        assert_eq!(LegacyCities::normalize("Tel+Aviv+Yafo"), "Tel Aviv Yafo");
        assert_eq!(LegacyCities::normalize("  Boston "), "  Boston ");
    }

    #[test]
    fn test_exact_match_only() {
        let cities: LegacyCities = [("New York", 5128581)].into_iter().collect();
        assert_eq!(cities.get("New York"), Some(5128581));
        assert_eq!(cities.get("new york"), None);
        assert_eq!(cities.get("New York "), None);
    }

    #[test]
    fn test_from_json() {
        let cities = LegacyCities::from_json_str(r#"{"Boston": 4930956, "Jerusalem": 281184}"#).unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities.get("Jerusalem"), Some(281184));
    }

    #[test]
    fn test_from_json_invalid() {
        let err = LegacyCities::from_json_str(r#"{"Boston": "x"}"#).unwrap_err();
        assert!(matches!(err, LocationError::StoreUnavailable(_)));
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.json");
        fs::write(&path, r#"{"Chicago": 4887398}"#).unwrap();
        let cities = LegacyCities::load(&path).unwrap();
        assert_eq!(cities.get("Chicago"), Some(4887398));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = LegacyCities::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LocationError::StoreUnavailable(_)));
    }
}
