//! Coordinate normalization
//!
//! The search and routing endpoints historically return coordinates in
//! different reference systems with no explicit tag in the payload: either
//! geodetic degrees or spherical-Mercator meters. Everything downstream
//! works in degrees, so raw pairs are normalized here before use.

use crate::search::Poi;

/// Half the circumference of the projection sphere (radius 6,378,137 m),
/// in meters. Mercator x/y values are bounded by this constant.
const MERCATOR_HALF_CIRCUMFERENCE: f64 = 20_037_508.34;

/// A geodetic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Invert a spherical-Mercator projected coordinate back to degrees.
pub fn mercator_to_lat_lng(x: f64, y: f64) -> LatLng {
    let lng = (x / MERCATOR_HALF_CIRCUMFERENCE) * 180.0;
    let lat = (y / MERCATOR_HALF_CIRCUMFERENCE) * 180.0;
    let lat = (180.0 / std::f64::consts::PI)
        * (2.0 * (lat * std::f64::consts::PI / 180.0).exp().atan() - std::f64::consts::PI / 2.0);
    LatLng { lat, lng }
}

/// Normalize a raw `[x, y]` pair into geodetic degrees.
///
/// A longitude can never exceed 180 degrees, so `|x| > 180` identifies a
/// projected coordinate. This is a documented heuristic, not a protocol
/// guarantee.
pub fn to_lat_lng(coords: [f64; 2]) -> LatLng {
    if coords[0].abs() > 180.0 {
        mercator_to_lat_lng(coords[0], coords[1])
    } else {
        LatLng {
            lat: coords[1],
            lng: coords[0],
        }
    }
}

/// Get the normalized position of a POI, if it carries one.
pub fn poi_lat_lng(poi: &Poi) -> Option<LatLng> {
    let point = poi.point.as_ref()?;
    if point.coordinates.len() < 2 {
        return None;
    }
    Some(to_lat_lng([point.coordinates[0], point.coordinates[1]]))
}
