//! Location providers: read-only adapters over the ZIP code and GeoNames
//! SQLite snapshots.
//!
//! Each store hands back raw rows; the rows validate themselves and are
//! turned into a [`Location`] here, so every adapter applies the same rules.

use super::describe::{geoname_city_descr, zip_city_descr};
use super::timezone::us_timezone;
use super::types::{
    check_coords, InvalidReason, Location, LocationError, LocationId, LocationSource, LookupKind,
};
use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

// ─── Raw rows ───────────────────────────────────────────────────

/// One row of `ZIPCodes_Primary`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipRow {
    pub zip: String,
    pub city: String,
    pub state: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Hours west of UTC as stored in the `TimeZone` column.
    pub utc_offset: Option<f64>,
    pub dst: bool,
}

impl ZipRow {
    pub fn validate(&self) -> Result<(f64, f64), InvalidReason> {
        check_coords(self.latitude, self.longitude)
    }

    pub fn into_location(self) -> Result<Location, InvalidReason> {
        let (latitude, longitude) = self.validate()?;
        let tzid = match self.utc_offset {
            Some(hours) => us_timezone(&self.state, hours, self.dst),
            None => "UTC".to_string(),
        };
        Ok(Location {
            latitude,
            longitude,
            israel: false,
            tzid,
            description: zip_city_descr(&self.city, &self.state, &self.zip),
            country_code: "US".into(),
            id: LocationId::Zip(self.zip),
            source: LocationSource::Zip,
            admin1: Some(self.state),
            asciiname: None,
            jerusalem: false,
        })
    }
}

/// One row of `geoname` joined with `country` and `admin1`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeonameRow {
    pub geonameid: u32,
    pub name: String,
    pub asciiname: Option<String>,
    pub country_code: String,
    /// `country.country`, absent when the join finds nothing.
    pub country_name: Option<String>,
    /// `admin1.name`, absent when the join finds nothing.
    pub admin1: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
}

impl GeonameRow {
    pub fn validate(&self) -> Result<(f64, f64), InvalidReason> {
        let coords = check_coords(self.latitude, self.longitude)?;
        match self.timezone.as_deref() {
            Some(tz) if !tz.is_empty() => Ok(coords),
            _ => Err(InvalidReason::MissingTimezone),
        }
    }

    /// The source data spells the Jerusalem district's main entry "Jerualem";
    /// the prefix below must match that stored value exactly.
    pub fn is_jerusalem(&self) -> bool {
        self.country_code == "IL"
            && self.admin1.as_deref().is_some_and(|a| a.starts_with("Jerusalem"))
            && self.name.starts_with("Jerualem")
    }

    pub fn into_location(self) -> Result<Location, InvalidReason> {
        let (latitude, longitude) = self.validate()?;
        let israel = self.country_code == "IL";
        let jerusalem = israel && self.is_jerusalem();
        let description = geoname_city_descr(
            &self.name,
            self.admin1.as_deref(),
            self.country_name.as_deref(),
        );
        Ok(Location {
            latitude,
            longitude,
            israel,
            tzid: self.timezone.unwrap_or_default(),
            description,
            country_code: self.country_code,
            id: LocationId::Geoname(self.geonameid),
            source: LocationSource::Geoname,
            admin1: self.admin1,
            asciiname: self.asciiname,
            jerusalem,
        })
    }
}

// ─── Store traits ───────────────────────────────────────────────

/// Point lookups against the ZIP code table.
pub trait ZipStore: Send + Sync {
    fn zip_row(&self, code: &str) -> Result<Option<ZipRow>, LocationError>;

    /// Release the store. A second call must be a no-op.
    fn close(&self) -> Result<(), LocationError>;
}

/// Point lookups against the geonames tables.
pub trait GeonameStore: Send + Sync {
    fn geoname_row(&self, id: u32) -> Result<Option<GeonameRow>, LocationError>;

    /// Release the store. A second call must be a no-op.
    fn close(&self) -> Result<(), LocationError>;
}

// ─── Adapter lookups ────────────────────────────────────────────

/// Resolve a ZIP code. No format validation: a malformed code is simply unknown.
pub fn lookup_zip(store: &dyn ZipStore, code: &str) -> Result<Location, LocationError> {
    let row = match store.zip_row(code)? {
        Some(row) => row,
        None => {
            log::warn!("unknown zipcode={}", code);
            return Err(LocationError::NotFound {
                kind: LookupKind::Zip,
                id: code.to_string(),
            });
        }
    };
    row.into_location().map_err(|reason| {
        log::warn!("{} zipcode={}", reason, code);
        LocationError::InvalidData {
            kind: LookupKind::Zip,
            id: code.to_string(),
            reason,
        }
    })
}

pub fn lookup_geoname(store: &dyn GeonameStore, id: u32) -> Result<Location, LocationError> {
    let row = match store.geoname_row(id)? {
        Some(row) => row,
        None => {
            log::warn!("unknown geonameid={}", id);
            return Err(LocationError::NotFound {
                kind: LookupKind::Geoname,
                id: id.to_string(),
            });
        }
    };
    row.into_location().map_err(|reason| {
        log::warn!("{} geonameid={}", reason, id);
        LocationError::InvalidData {
            kind: LookupKind::Geoname,
            id: id.to_string(),
            reason,
        }
    })
}

// ─── SQLite ─────────────────────────────────────────────────────

const ZIPCODE_SQL: &str = "SELECT CityMixedCase, State, Latitude, Longitude, TimeZone, DayLightSaving
     FROM ZIPCodes_Primary
     WHERE ZipCode = ?1";

const GEONAME_SQL: &str = "SELECT g.name, g.asciiname, g.country, c.country, a.name,
            g.latitude, g.longitude, g.timezone
     FROM geoname g
     LEFT JOIN country c ON g.country = c.iso
     LEFT JOIN admin1 a ON g.country || '.' || g.admin1 = a.key
     WHERE g.geonameid = ?1";

/// A read-only connection that can be closed exactly once.
///
/// `rusqlite::Connection` is `Send` but not `Sync`, so concurrent callers
/// take turns through the mutex. `None` means the handle was closed.
struct SqliteHandle {
    label: &'static str,
    conn: Mutex<Option<Connection>>,
}

impl SqliteHandle {
    fn open(label: &'static str, path: &Path, required_table: &str) -> Result<Self, LocationError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            LocationError::StoreUnavailable(format!(
                "failed to open {} db '{}': {}",
                label,
                path.display(),
                e
            ))
        })?;

        // Opening is lazy; probe the schema so a missing or corrupt file fails here.
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1",
                [required_table],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| {
                LocationError::StoreUnavailable(format!(
                    "failed to read {} db '{}': {}",
                    label,
                    path.display(),
                    e
                ))
            })?;
        if found.is_none() {
            return Err(LocationError::StoreUnavailable(format!(
                "{} db '{}' has no table {}",
                label,
                path.display(),
                required_table
            )));
        }

        log::debug!("opened {} db {}", label, path.display());
        Ok(Self {
            label,
            conn: Mutex::new(Some(conn)),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, LocationError> {
        let guard = self.conn.lock().map_err(|e| {
            LocationError::StoreUnavailable(format!("{} db lock poisoned: {}", self.label, e))
        })?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| LocationError::StoreUnavailable(format!("{} db is closed", self.label)))?;
        f(conn).map_err(|e| {
            LocationError::StoreUnavailable(format!("{} db query failed: {}", self.label, e))
        })
    }

    fn close(&self) -> Result<(), LocationError> {
        let mut guard = self.conn.lock().map_err(|e| {
            LocationError::StoreUnavailable(format!("{} db lock poisoned: {}", self.label, e))
        })?;
        match guard.take() {
            Some(conn) => conn.close().map_err(|(_, e)| {
                LocationError::StoreUnavailable(format!("failed to close {} db: {}", self.label, e))
            }),
            None => Ok(()),
        }
    }
}

/// `ZIPCodes_Primary` in a read-only SQLite file.
pub struct SqliteZipStore {
    handle: SqliteHandle,
}

impl SqliteZipStore {
    pub fn open(path: &Path) -> Result<Self, LocationError> {
        Ok(Self {
            handle: SqliteHandle::open("zips", path, "ZIPCodes_Primary")?,
        })
    }
}

impl ZipStore for SqliteZipStore {
    fn zip_row(&self, code: &str) -> Result<Option<ZipRow>, LocationError> {
        self.handle.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(ZIPCODE_SQL)?;
            stmt.query_row([code], |row| {
                Ok(ZipRow {
                    zip: code.to_string(),
                    city: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    state: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    latitude: number(row, 2)?,
                    longitude: number(row, 3)?,
                    utc_offset: number(row, 4)?,
                    dst: flag(row, 5)?,
                })
            })
            .optional()
        })
    }

    fn close(&self) -> Result<(), LocationError> {
        self.handle.close()
    }
}

/// `geoname`, `country` and `admin1` in a read-only SQLite file.
pub struct SqliteGeonameStore {
    handle: SqliteHandle,
}

impl SqliteGeonameStore {
    pub fn open(path: &Path) -> Result<Self, LocationError> {
        Ok(Self {
            handle: SqliteHandle::open("geonames", path, "geoname")?,
        })
    }
}

impl GeonameStore for SqliteGeonameStore {
    fn geoname_row(&self, id: u32) -> Result<Option<GeonameRow>, LocationError> {
        self.handle.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(GEONAME_SQL)?;
            stmt.query_row([i64::from(id)], |row| {
                Ok(GeonameRow {
                    geonameid: id,
                    name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    asciiname: row.get(1)?,
                    country_code: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    country_name: row.get(3)?,
                    admin1: row.get(4)?,
                    latitude: number(row, 5)?,
                    longitude: number(row, 6)?,
                    timezone: row.get(7)?,
                })
            })
            .optional()
        })
    }

    fn close(&self) -> Result<(), LocationError> {
        self.handle.close()
    }
}

/// Numeric column that some snapshots store as text.
fn number(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<f64>> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Integer(i) => Some(i as f64),
        Value::Real(r) => Some(r),
        Value::Text(s) => s.trim().parse().ok(),
        Value::Null | Value::Blob(_) => None,
    })
}

/// Boolean-like column: 'Y', '1', 'true' or a non-zero number.
fn flag(row: &Row<'_>, idx: usize) -> rusqlite::Result<bool> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Integer(i) => i != 0,
        Value::Real(r) => r != 0.0,
        Value::Text(s) => matches!(s.trim(), "Y" | "y" | "1" | "true" | "TRUE" | "True"),
        Value::Null | Value::Blob(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::testdata;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn zip_store() -> (SqliteZipStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = testdata::zips_db(dir.path());
        (SqliteZipStore::open(&path).unwrap(), dir)
    }

    fn geoname_store() -> (SqliteGeonameStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = testdata::geonames_db(dir.path());
        (SqliteGeonameStore::open(&path).unwrap(), dir)
    }

    #[test]
    fn test_zip_lookup() {
        let (store, _dir) = zip_store();
        let loc = lookup_zip(&store, "02138").unwrap();
        assert_eq!(loc.description, "Cambridge, MA 02138");
        assert_eq!(loc.tzid, "America/New_York");
        assert_eq!(loc.country_code, "US");
        assert!(!loc.israel);
        assert!(!loc.jerusalem);
        assert_eq!(loc.id, LocationId::Zip("02138".into()));
        assert_eq!(loc.admin1.as_deref(), Some("MA"));
        assert_relative_eq!(loc.latitude, 42.377, epsilon = 1e-6);
        assert_relative_eq!(loc.longitude, -71.1256, epsilon = 1e-6);
    }

    #[test]
    fn test_zip_arizona_no_dst() {
        let (store, _dir) = zip_store();
        // Arizona outside the Navajo Nation skips DST
        let loc = lookup_zip(&store, "85001").unwrap();
        assert_eq!(loc.tzid, "America/Phoenix");
    }

    #[test]
    fn test_zip_unknown() {
        let (store, _dir) = zip_store();
        let err = lookup_zip(&store, "99999").unwrap_err();
        assert!(matches!(err, LocationError::NotFound { kind: LookupKind::Zip, .. }));
    }

    #[test]
    fn test_zip_no_format_validation() {
        let (store, _dir) = zip_store();
        assert!(lookup_zip(&store, "abc").unwrap_err().is_not_found());
        assert!(lookup_zip(&store, "").unwrap_err().is_not_found());
    }

    #[test]
    fn test_zip_zero_coordinates() {
        let (store, _dir) = zip_store();
        for _ in 0..2 {
            let err = lookup_zip(&store, "00000").unwrap_err();
            assert!(matches!(
                err,
                LocationError::InvalidData { reason: InvalidReason::ZeroCoordinates, .. }
            ));
            assert!(err.is_not_found());
        }
    }

    #[test]
    fn test_zip_null_coordinates() {
        let (store, _dir) = zip_store();
        let err = lookup_zip(&store, "00001").unwrap_err();
        assert!(matches!(
            err,
            LocationError::InvalidData { reason: InvalidReason::ZeroCoordinates, .. }
        ));
    }

    #[test]
    fn test_geoname_lookup() {
        let (store, _dir) = geoname_store();
        let loc = lookup_geoname(&store, 5128581).unwrap();
        assert_eq!(loc.description, "New York City, New York, USA");
        assert_eq!(loc.tzid, "America/New_York");
        assert_eq!(loc.country_code, "US");
        assert!(!loc.israel);
        assert_eq!(loc.id, LocationId::Geoname(5128581));
        assert_eq!(loc.asciiname.as_deref(), Some("New York City"));
    }

    #[test]
    fn test_geoname_missing_joins() {
        let (store, _dir) = geoname_store();
        let loc = lookup_geoname(&store, 9999001).unwrap();
        assert_eq!(loc.description, "Nowhere Town");
        assert!(loc.admin1.is_none());
    }

    #[test]
    fn test_geoname_israel_flag() {
        let (store, _dir) = geoname_store();
        let loc = lookup_geoname(&store, 293397).unwrap();
        assert!(loc.israel);
        assert_eq!(loc.country_code, "IL");
        assert_eq!(loc.description, "Tel Aviv, Israel");
        assert!(!loc.jerusalem);
    }

    #[test]
    fn test_geoname_jerusalem_override() {
        let (store, _dir) = geoname_store();
        let misspelled = lookup_geoname(&store, 281184).unwrap();
        assert!(misspelled.jerusalem);
        let correct = lookup_geoname(&store, 281185).unwrap();
        assert!(!correct.jerusalem);
    }

    #[test]
    fn test_geoname_unknown() {
        let (store, _dir) = geoname_store();
        let err = lookup_geoname(&store, 1).unwrap_err();
        assert!(matches!(err, LocationError::NotFound { kind: LookupKind::Geoname, .. }));
    }

    #[test]
    fn test_jerusalem_rule_needs_israel() {
        let row = GeonameRow {
            geonameid: 1,
            name: "Jerualem".into(),
            asciiname: None,
            country_code: "PS".into(),
            country_name: None,
            admin1: Some("Jerusalem District".into()),
            latitude: Some(31.78),
            longitude: Some(35.22),
            timezone: Some("Asia/Hebron".into()),
        };
        assert!(!row.is_jerusalem());
        assert!(!row.clone().into_location().unwrap().jerusalem);

        let il = GeonameRow { country_code: "IL".into(), ..row.clone() };
        assert!(il.is_jerusalem());
        let other_region = GeonameRow { admin1: Some("Central District".into()), ..il };
        assert!(!other_region.is_jerusalem());
    }

    #[test]
    fn test_geoname_missing_timezone() {
        let row = GeonameRow {
            geonameid: 7,
            name: "Somewhere".into(),
            asciiname: None,
            country_code: "FR".into(),
            country_name: Some("France".into()),
            admin1: None,
            latitude: Some(45.0),
            longitude: Some(2.0),
            timezone: Some(String::new()),
        };
        assert_eq!(row.into_location().unwrap_err(), InvalidReason::MissingTimezone);
    }

    #[test]
    fn test_close_is_idempotent() {
        let (store, _dir) = zip_store();
        store.close().unwrap();
        store.close().unwrap();
        let err = store.zip_row("02138").unwrap_err();
        assert!(matches!(err, LocationError::StoreUnavailable(_)));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = SqliteZipStore::open(&dir.path().join("missing.sqlite3"));
        assert!(matches!(result, Err(LocationError::StoreUnavailable(_))));
    }

    #[test]
    fn test_open_wrong_schema() {
        let dir = TempDir::new().unwrap();
        // a geonames file is not a zips file
        let path = testdata::geonames_db(dir.path());
        assert!(matches!(SqliteZipStore::open(&path), Err(LocationError::StoreUnavailable(_))));
    }

    #[test]
    fn test_open_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corrupt.sqlite3");
        std::fs::write(&path, b"this is not a database, just some bytes padding it out").unwrap();
        assert!(matches!(SqliteGeonameStore::open(&path), Err(LocationError::StoreUnavailable(_))));
    }
}
