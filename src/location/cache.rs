//! In-process location cache.
//!
//! The backing stores are immutable snapshots, so entries never expire; the
//! cache only goes away with the process. Size is bounded: once full, new
//! locations are simply not cached.

use super::types::Location;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Zip(String),
    Geoname(u32),
}

/// Bounded read cache shared by concurrent lookups.
///
/// Values are inserted only once fully built. Two callers missing on the same
/// key both compute it; the second insert overwrites an identical value.
pub struct LocationCache {
    capacity: usize,
    entries: RwLock<HashMap<CacheKey, Location>>,
}

impl LocationCache {
    /// A capacity of 0 disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Location> {
        // A poisoned lock only means a writer panicked; the map itself is intact.
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    pub fn put(&self, key: CacheKey, location: &Location) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            return;
        }
        entries.insert(key, location.clone());
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
