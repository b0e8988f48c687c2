//! Route normalization
//!
//! The routing service has served several incompatible response shapes over
//! time. Everything downstream of this module works on one canonical form:
//! an ordered list of `RouteStep`s plus aggregate distance and time. The
//! primary normalizer (`extract`) handles the current a-to-b shape; the
//! legacy normalizer (`legacy`) tolerates the older shapes. Both are kept
//! available because callers may see either, depending on which upstream
//! revision served the request.

pub mod client;
pub mod extract;
pub mod legacy;

pub use client::{build_map_embed_url, FetchedRoute, RoutingClient};
pub use extract::extract_route;
pub use legacy::parse_route_steps;

use crate::search::Poi;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One atomic navigation action, in walking order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Instruction text; never empty in normalized output
    pub text: String,

    /// Length of this maneuver in meters
    pub distance_meters: f64,

    /// Estimated walking time in seconds
    pub duration_seconds: f64,

    /// Floor index, when the shape carried one
    pub floor: Option<i32>,
}

/// Canonical result of normalizing one trip response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedRoute {
    /// Ordered steps; order is walking order
    pub steps: Vec<RouteStep>,

    /// Hard failure description, when normalization produced nothing usable
    pub error: Option<String>,

    /// Sum of per-step distances in meters
    pub total_distance: f64,

    /// Route-level time estimate in seconds
    pub total_time: f64,
}

impl ExtractedRoute {
    /// An empty result carrying only an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            steps: Vec::new(),
            error: Some(error.into()),
            total_distance: 0.0,
            total_time: 0.0,
        }
    }
}

/// The trip-response shapes this module knows how to read, ranked in the
/// order the legacy normalizer tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripFormat {
    /// `trip.legs[*].maneuvers` and a `trip.summary`
    ValhallaTrip,

    /// Top-level `legs` array
    BareLegs,

    /// `routes[0].legs[0]` with parallel `instructions`/`basic` arrays
    AToB,

    /// `routes[0].legs` without the instruction/basic containers
    RoutesLegs,

    /// None of the above
    Unknown,
}

/// Classify a trip payload before parsing.
pub fn classify_trip(trip: &Value) -> TripFormat {
    if trip.pointer("/trip/legs").map_or(false, Value::is_array) {
        return TripFormat::ValhallaTrip;
    }
    if trip.get("legs").map_or(false, Value::is_array) {
        return TripFormat::BareLegs;
    }
    if let Some(route) = trip.pointer("/routes/0") {
        if route.pointer("/legs/0/instructions").is_some()
            || route.pointer("/legs/0/basic").is_some()
        {
            return TripFormat::AToB;
        }
        return TripFormat::RoutesLegs;
    }
    TripFormat::Unknown
}

/// The one step every route degrades to when no instruction survived
/// normalization: a single walkable summary between the chosen endpoints.
pub(crate) fn fallback_step(
    start: &Poi,
    end: &Poi,
    total_distance: f64,
    total_time: f64,
) -> RouteStep {
    let from = if start.title.is_empty() {
        "Start"
    } else {
        start.title.as_str()
    };
    let to = if end.title.is_empty() {
        "Destination"
    } else {
        end.title.as_str()
    };
    RouteStep {
        text: format!("Walk from {} to {}", from, to),
        distance_meters: total_distance,
        duration_seconds: total_time,
        floor: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_valhalla_trip() {
        let trip = json!({ "trip": { "legs": [] } });
        assert_eq!(classify_trip(&trip), TripFormat::ValhallaTrip);
    }

    #[test]
    fn test_classify_bare_legs() {
        let trip = json!({ "legs": [{ "steps": [] }] });
        assert_eq!(classify_trip(&trip), TripFormat::BareLegs);
    }

    #[test]
    fn test_classify_a_to_b() {
        let trip = json!({
            "routes": [{ "legs": [{ "instructions": { "steps": [] }, "basic": { "steps": [] } }] }]
        });
        assert_eq!(classify_trip(&trip), TripFormat::AToB);
    }

    #[test]
    fn test_classify_routes_legs() {
        let trip = json!({ "routes": [{ "legs": [{ "maneuvers": [] }] }] });
        assert_eq!(classify_trip(&trip), TripFormat::RoutesLegs);
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify_trip(&json!({})), TripFormat::Unknown);
        assert_eq!(classify_trip(&json!(null)), TripFormat::Unknown);
    }

    #[test]
    fn test_valhalla_outranks_routes() {
        // A payload carrying both containers parses as the older shape
        let trip = json!({ "trip": { "legs": [] }, "routes": [{}] });
        assert_eq!(classify_trip(&trip), TripFormat::ValhallaTrip);
    }

    #[test]
    fn test_fallback_step_defaults_titles() {
        let start = Poi::default();
        let end = Poi {
            title: "Zenit".into(),
            ..Poi::default()
        };
        let step = fallback_step(&start, &end, 120.0, 90.0);
        assert_eq!(step.text, "Walk from Start to Zenit");
        assert_eq!(step.distance_meters, 120.0);
        assert_eq!(step.duration_seconds, 90.0);
    }
}
