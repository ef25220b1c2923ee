//! Location resolver: the single entry point for all three identifier kinds.
//!
//! ZIP flow:      cache → ZIP store → timezone normalizer → Location
//! Geoname flow:  cache → geonames store → Location
//! City flow:     `+` → space → legacy alias table → geoname flow

use super::cache::{CacheKey, LocationCache};
use super::legacy::LegacyCities;
use super::providers::{self, GeonameStore, SqliteGeonameStore, SqliteZipStore, ZipStore};
use super::types::{Location, LocationError, LookupKind};
use crate::config::{ResolverConfig, DEFAULT_CACHE_CAPACITY};

/// Owns both store handles, the alias table and the read cache.
///
/// Every lookup takes `&self`; share it across threads behind an `Arc`.
/// Misses are reported immediately, never retried.
pub struct LocationResolver {
    zips: Box<dyn ZipStore>,
    geonames: Box<dyn GeonameStore>,
    legacy: LegacyCities,
    cache: LocationCache,
}

impl LocationResolver {
    /// Open both SQLite stores and load the alias snapshot.
    pub fn open(config: &ResolverConfig) -> Result<Self, LocationError> {
        let legacy = LegacyCities::load(&config.legacy_cities).map_err(log_unavailable)?;
        let zips = SqliteZipStore::open(&config.zips_db).map_err(log_unavailable)?;
        let geonames = match SqliteGeonameStore::open(&config.geonames_db) {
            Ok(store) => store,
            Err(e) => {
                if let Err(close_err) = zips.close() {
                    log::error!("{}", close_err);
                }
                return Err(log_unavailable(e));
            }
        };
        Ok(Self::new(Box::new(zips), Box::new(geonames), legacy)
            .with_cache_capacity(config.cache_capacity))
    }

    /// Build a resolver from already opened stores.
    pub fn new(zips: Box<dyn ZipStore>, geonames: Box<dyn GeonameStore>, legacy: LegacyCities) -> Self {
        Self {
            zips,
            geonames,
            legacy,
            cache: LocationCache::new(DEFAULT_CACHE_CAPACITY),
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = LocationCache::new(capacity);
        self
    }

    pub fn lookup_zip(&self, code: &str) -> Result<Location, LocationError> {
        let key = CacheKey::Zip(code.to_string());
        if let Some(loc) = self.cache.get(&key) {
            log::debug!("cache hit zipcode={}", code);
            return Ok(loc);
        }
        let loc = providers::lookup_zip(self.zips.as_ref(), code).map_err(log_unavailable)?;
        self.cache.put(key, &loc);
        Ok(loc)
    }

    pub fn lookup_geoname(&self, id: u32) -> Result<Location, LocationError> {
        let key = CacheKey::Geoname(id);
        if let Some(loc) = self.cache.get(&key) {
            log::debug!("cache hit geonameid={}", id);
            return Ok(loc);
        }
        let loc = providers::lookup_geoname(self.geonames.as_ref(), id).map_err(log_unavailable)?;
        self.cache.put(key, &loc);
        Ok(loc)
    }

    /// Resolve a city name from an old-style query string ("New+York").
    ///
    /// An alias whose geoname id is gone yields a plain `NotFound`.
    pub fn lookup_legacy_city(&self, name: &str) -> Result<Location, LocationError> {
        let name = LegacyCities::normalize(name);
        match self.legacy.get(&name) {
            Some(id) => self.lookup_geoname(id),
            None => {
                log::warn!("unknown city={}", name);
                Err(LocationError::NotFound {
                    kind: LookupKind::LegacyCity,
                    id: name,
                })
            }
        }
    }

    /// Close both stores. Both are always attempted; the first failure is returned.
    /// Closing again is a no-op.
    pub fn close(&self) -> Result<(), LocationError> {
        let zips = self.zips.close();
        let geonames = self.geonames.close();
        if let Err(e) = &zips {
            log::error!("{}", e);
        }
        if let Err(e) = &geonames {
            log::error!("{}", e);
        }
        zips.and(geonames)
    }

    pub fn legacy_cities(&self) -> &LegacyCities {
        &self.legacy
    }

    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }
}

/// Store failures are surfaced to the caller and logged once here.
fn log_unavailable(e: LocationError) -> LocationError {
    if let LocationError::StoreUnavailable(msg) = &e {
        log::error!("{}", msg);
    }
    e
}
