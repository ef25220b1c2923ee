//! Resolver configuration: where the data snapshots live.
//!
//! Defaults to `~/.geolookup/` holding `zips.sqlite3`, `geonames.sqlite3`
//! and `legacy-cities.json`.

use std::path::{Path, PathBuf};

pub const ZIPS_FILE: &str = "zips.sqlite3";
pub const GEONAMES_FILE: &str = "geonames.sqlite3";
pub const LEGACY_CITIES_FILE: &str = "legacy-cities.json";
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub zips_db: PathBuf,
    pub geonames_db: PathBuf,
    pub legacy_cities: PathBuf,
    /// Maximum cached locations; 0 disables the cache.
    pub cache_capacity: usize,
}

impl ResolverConfig {
    /// All three data files inside one directory.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            zips_db: dir.join(ZIPS_FILE),
            geonames_db: dir.join(GEONAMES_FILE),
            legacy_cities: dir.join(LEGACY_CITIES_FILE),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".geolookup")
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from_dir(&Self::default_dir())
    }
}
