//! Timezone normalization for ZIP code rows.
//!
//! The ZIP data carries a legacy (state, hours west of UTC, DST flag) triplet
//! instead of an IANA zone. Geonames rows already have a zone and skip this.

/// Map a ZIP row's timezone triplet to a timezone identifier. Never fails.
///
/// Offsets 13..=16 are pseudo-offsets the ZIP data uses for Pacific territories.
pub fn us_timezone(state: &str, utc_offset_hours: f64, observes_dst: bool) -> String {
    let hours = match whole_hours(utc_offset_hours) {
        Some(h) => h,
        None => return "UTC".into(),
    };

    let tz = match (hours, state) {
        (10, "AK") => "America/Adak",
        (7, "AZ") if !observes_dst => "America/Phoenix",
        (0, _) => "UTC",
        (4, _) => "America/Puerto_Rico",
        (5, _) => "America/New_York",
        (6, _) => "America/Chicago",
        (7, _) => "America/Denver",
        (8, _) => "America/Los_Angeles",
        (9, _) => "America/Anchorage",
        (10, _) => "Pacific/Honolulu",
        (11, _) => "Pacific/Pago_Pago",
        (13, _) => "Pacific/Funafuti",
        (14, _) => "Pacific/Guam",
        (15, _) => "Pacific/Palau",
        (16, _) => "Pacific/Chuuk",
        // Etc/GMT+n is n hours *behind* UTC, matching the column's sign convention.
        (1..=12, _) => return format!("Etc/GMT+{}", hours),
        _ => "UTC",
    };
    tz.to_string()
}

/// The column is stored unsigned in most snapshots and signed in some.
fn whole_hours(offset: f64) -> Option<u32> {
    if !offset.is_finite() || offset.fract() != 0.0 {
        return None;
    }
    let abs = offset.abs();
    if abs > 16.0 {
        return None;
    }
    Some(abs as u32)
}
