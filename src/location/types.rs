//! Core types for the location subsystem.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backing store a location was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Zip,
    Geoname,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zip => write!(f, "zip"),
            Self::Geoname => write!(f, "geoname"),
        }
    }
}

/// The identifier a location was resolved from, kept for round-tripping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationId {
    Zip(String),
    Geoname(u32),
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zip(code) => write!(f, "{}", code),
            Self::Geoname(id) => write!(f, "{}", id),
        }
    }
}

/// A fully resolved location.
///
/// Built only by the store adapters from a row that passed validation, so
/// coordinates are always within range and `tzid` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// True iff the country code is `IL`.
    pub israel: bool,
    pub tzid: String,
    pub description: String,
    /// ISO 3166-1 alpha-2 country code ("US" for ZIP records)
    pub country_code: String,
    pub id: LocationId,
    pub source: LocationSource,
    /// State code for ZIP records, admin-region name for geonames records.
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub asciiname: Option<String>,
    /// Set only for the Jerusalem district entry of the geonames data.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub jerusalem: bool,
}

impl Location {
    /// Description up to the first comma ("Cambridge, MA 02138" → "Cambridge").
    pub fn short_name(&self) -> &str {
        match self.description.find(',') {
            Some(idx) => &self.description[..idx],
            None => &self.description,
        }
    }

    /// Parsed IANA zone, or `None` when `tzid` is not in the tz database.
    pub fn tz(&self) -> Option<Tz> {
        self.tzid.parse().ok()
    }

    pub fn display_line(&self) -> String {
        format!(
            "{} [{} {}] {:.4}, {:.4} ({})",
            self.description, self.source, self.id, self.latitude, self.longitude, self.tzid
        )
    }
}

/// The kind of identifier a lookup was made with. Carried in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Zip,
    Geoname,
    LegacyCity,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zip => write!(f, "zipcode"),
            Self::Geoname => write!(f, "geonameid"),
            Self::LegacyCity => write!(f, "city"),
        }
    }
}

/// Why an existing row could not be turned into a [`Location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    ZeroCoordinates,
    OutOfRange,
    MissingTimezone,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCoordinates => write!(f, "zero lat/long"),
            Self::OutOfRange => write!(f, "lat/long out of range"),
            Self::MissingTimezone => write!(f, "missing timezone"),
        }
    }
}

/// Location resolution errors.
#[derive(Debug)]
pub enum LocationError {
    /// No row for the identifier, no alias, or an alias pointing at a missing id.
    NotFound { kind: LookupKind, id: String },
    /// A row exists but cannot produce a location.
    InvalidData {
        kind: LookupKind,
        id: String,
        reason: InvalidReason,
    },
    /// A backing store or the alias snapshot cannot be opened, queried or closed.
    StoreUnavailable(String),
}

impl LocationError {
    /// True for outcomes callers should treat as "no such location".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidData { .. })
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "unknown {}={}", kind, id),
            Self::InvalidData { kind, id, reason } => write!(f, "{} {}={}", reason, kind, id),
            Self::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for LocationError {}

/// Coordinate validity rule shared by every raw row type.
///
/// Both coordinates zero or absent is "no position"; anything outside the
/// legal degree range is rejected as well.
pub(crate) fn check_coords(lat: Option<f64>, lon: Option<f64>) -> Result<(f64, f64), InvalidReason> {
    let lat = lat.unwrap_or(0.0);
    let lon = lon.unwrap_or(0.0);
    if lat == 0.0 && lon == 0.0 {
        return Err(InvalidReason::ZeroCoordinates);
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(InvalidReason::OutOfRange);
    }
    Ok((lat, lon))
}
