//! Human-readable descriptions for resolved locations.

/// "Cambridge, MA 02138"
pub fn zip_city_descr(city: &str, state: &str, zip: &str) -> String {
    format!("{}, {} {}", city, state, zip)
}

/// Build "City, Region, Country" for a geonames row.
///
/// The region is left out for Israel and when it merely repeats the city name
/// ("Tokyo, Tokyo, Japan" → "Tokyo, Japan").
pub fn geoname_city_descr(name: &str, admin1: Option<&str>, country: Option<&str>) -> String {
    let country = country.filter(|c| !c.is_empty()).map(|c| match c {
        "United States" => "USA",
        "United Kingdom" => "UK",
        other => other,
    });

    let mut descr = name.to_string();
    if let Some(region) = admin1.filter(|a| !a.is_empty()) {
        if country != Some("Israel") && !region.starts_with(name) {
            descr.push_str(", ");
            descr.push_str(region);
        }
    }
    if let Some(country) = country {
        descr.push_str(", ");
        descr.push_str(country);
    }
    descr
}
