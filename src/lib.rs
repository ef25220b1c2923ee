//! Resolve ZIP codes, GeoNames ids and legacy city names into normalized
//! locations with coordinates, timezone and a display description.

pub mod config;
pub mod location;

pub use config::ResolverConfig;
pub use location::{Location, LocationError, LocationResolver};
