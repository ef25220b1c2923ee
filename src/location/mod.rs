//! Location resolution over the ZIP code and GeoNames snapshots.
//!
//! Provides the two read-only store adapters, the legacy city alias table,
//! ZIP timezone normalization and an in-process read cache.

pub mod cache;
pub mod describe;
pub mod legacy;
pub mod providers;
pub mod resolver;
pub mod timezone;
pub mod types;

#[cfg(test)]
mod testdata;

pub use describe::geoname_city_descr;
pub use legacy::LegacyCities;
pub use providers::{GeonameRow, GeonameStore, SqliteGeonameStore, SqliteZipStore, ZipRow, ZipStore};
pub use resolver::LocationResolver;
pub use timezone::us_timezone;
pub use types::{InvalidReason, Location, LocationError, LocationId, LocationSource, LookupKind};
