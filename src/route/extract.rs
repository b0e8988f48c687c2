//! Primary route normalizer
//!
//! Reads the a-to-b response shape: `routes[0].legs[0]` holds two parallel
//! arrays, one instruction text per maneuver and one distance/duration entry
//! per maneuver, paired strictly by index. The arrays carry no identity
//! keys, so positional pairing is an inherited upstream assumption: if one
//! array were ever filtered or reordered independently, pairing would
//! silently misalign.

use super::{fallback_step, ExtractedRoute, RouteStep};
use crate::search::Poi;
use serde_json::Value;
use tracing::{debug, warn};

/// Normalize a trip response into the canonical step list.
///
/// Never panics and never returns an unhandled failure: malformed payloads
/// come back as an `error` string, and a structurally valid route that
/// yields no instruction text degrades to a single summary step.
pub fn extract_route(trip: Option<&Value>, start: &Poi, end: &Poi) -> ExtractedRoute {
    let Some(trip) = trip else {
        return ExtractedRoute::failed("No route data received.");
    };

    let Some(route) = trip.pointer("/routes/0").filter(|r| r.is_object()) else {
        return ExtractedRoute::failed("Route data has an unexpected format.");
    };

    let steps = match walk_leg_steps(route) {
        Ok(steps) => steps,
        Err(message) => {
            warn!("route walk failed: {}", message);
            return ExtractedRoute::failed(format!("Failed to parse route steps: {}", message));
        }
    };

    let total_time = route
        .pointer("/properties/timeEstimateSeconds")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    // The per-step sum is computed here rather than trusted from upstream;
    // a reported total can disagree with its own maneuvers.
    let total_distance: f64 = steps.iter().map(|s| s.distance_meters).sum();

    let steps = if steps.is_empty() {
        debug!("no instruction text in route, synthesizing summary step");
        vec![fallback_step(start, end, total_distance, total_time)]
    } else {
        steps
    };

    ExtractedRoute {
        steps,
        error: None,
        total_distance,
        total_time,
    }
}

/// Walk the instruction array of the first leg, pairing each entry with the
/// distance/duration found at the same index of the basic array.
fn walk_leg_steps(route: &Value) -> Result<Vec<RouteStep>, String> {
    let instr_steps = route
        .pointer("/legs/0/instructions/steps")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let basic_steps = route
        .pointer("/legs/0/basic/steps")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut steps = Vec::with_capacity(instr_steps.len());

    for (i, entry) in instr_steps.iter().enumerate() {
        if !entry.is_object() {
            return Err(format!("instruction entry {} is not an object", i));
        }

        let text = match entry.get("instruction") {
            None | Some(Value::Null) => "",
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(format!(
                    "instruction entry {} has a non-text instruction ({})",
                    i,
                    type_name(other)
                ))
            }
        };
        if text.is_empty() {
            continue;
        }

        let properties = basic_steps.get(i).and_then(|b| b.get("properties"));
        let distance_meters = properties
            .and_then(|p| p.get("distance"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let duration_seconds = properties
            .and_then(|p| p.get("timeEstimateSeconds"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        steps.push(RouteStep {
            text: text.to_string(),
            distance_meters,
            duration_seconds,
            floor: None,
        });
    }

    Ok(steps)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn poi(title: &str) -> Poi {
        Poi {
            title: title.into(),
            ..Poi::default()
        }
    }

    fn a_to_b_trip(instructions: Value, basic: Value, total_time: f64) -> Value {
        json!({
            "routes": [{
                "legs": [{
                    "instructions": { "steps": instructions },
                    "basic": { "steps": basic }
                }],
                "properties": { "timeEstimateSeconds": total_time }
            }]
        })
    }

    #[test]
    fn test_none_trip() {
        let route = extract_route(None, &poi("A"), &poi("B"));
        assert_eq!(route.error.as_deref(), Some("No route data received."));
        assert!(route.steps.is_empty());
        assert_eq!(route.total_distance, 0.0);
        assert_eq!(route.total_time, 0.0);
    }

    #[test]
    fn test_missing_route_object() {
        let trip = json!({ "routes": [] });
        let route = extract_route(Some(&trip), &poi("A"), &poi("B"));
        assert_eq!(
            route.error.as_deref(),
            Some("Route data has an unexpected format.")
        );
    }

    #[test]
    fn test_two_aligned_steps() {
        let trip = a_to_b_trip(
            json!([{ "instruction": "Turn left" }, { "instruction": "Arrive" }]),
            json!([
                { "properties": { "distance": 50, "timeEstimateSeconds": 30 } },
                { "properties": { "distance": 10, "timeEstimateSeconds": 5 } }
            ]),
            35.0,
        );
        let route = extract_route(Some(&trip), &poi("A"), &poi("B"));
        assert!(route.error.is_none());
        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.steps[0].text, "Turn left");
        assert_eq!(route.steps[0].distance_meters, 50.0);
        assert_eq!(route.steps[0].duration_seconds, 30.0);
        assert_eq!(route.steps[1].text, "Arrive");
        assert_eq!(route.total_distance, 60.0);
        assert_eq!(route.total_time, 35.0);
    }

    #[test]
    fn test_empty_instruction_texts_synthesize_fallback() {
        let trip = a_to_b_trip(
            json!([{ "instruction": "" }, { "instruction": "" }]),
            json!([]),
            140.0,
        );
        let route = extract_route(Some(&trip), &poi("Kårallen"), &poi("Zenit"));
        assert!(route.error.is_none());
        assert_eq!(route.steps.len(), 1);
        assert_eq!(route.steps[0].text, "Walk from Kårallen to Zenit");
        assert_eq!(route.steps[0].duration_seconds, 140.0);
    }

    #[test]
    fn test_absent_arrays_synthesize_fallback() {
        let trip = json!({ "routes": [{ "properties": { "timeEstimateSeconds": 60 } }] });
        let route = extract_route(Some(&trip), &poi(""), &poi(""));
        assert_eq!(route.steps.len(), 1);
        assert_eq!(route.steps[0].text, "Walk from Start to Destination");
        assert_eq!(route.total_time, 60.0);
    }

    #[test]
    fn test_missing_basic_entry_defaults_to_zero() {
        let trip = a_to_b_trip(
            json!([{ "instruction": "Go straight" }, { "instruction": "Arrive" }]),
            json!([{ "properties": { "distance": 25 } }]),
            0.0,
        );
        let route = extract_route(Some(&trip), &poi("A"), &poi("B"));
        assert_eq!(route.steps[0].distance_meters, 25.0);
        assert_eq!(route.steps[0].duration_seconds, 0.0);
        assert_eq!(route.steps[1].distance_meters, 0.0);
        assert_eq!(route.total_distance, 25.0);
    }

    #[test]
    fn test_malformed_entry_is_caught() {
        let trip = a_to_b_trip(json!([null]), json!([]), 0.0);
        let route = extract_route(Some(&trip), &poi("A"), &poi("B"));
        let error = route.error.unwrap();
        assert!(error.starts_with("Failed to parse route steps:"), "{}", error);
        assert!(route.steps.is_empty());
    }

    #[test]
    fn test_non_string_instruction_is_caught() {
        let trip = a_to_b_trip(json!([{ "instruction": 42 }]), json!([]), 0.0);
        let route = extract_route(Some(&trip), &poi("A"), &poi("B"));
        assert!(route
            .error
            .unwrap()
            .starts_with("Failed to parse route steps:"));
    }

    #[test]
    fn test_total_distance_is_computed_not_trusted() {
        // Upstream reports no distances at the route level; the sum of the
        // per-step values is what comes back.
        let trip = a_to_b_trip(
            json!([{ "instruction": "Walk" }]),
            json!([{ "properties": { "distance": 12.5 } }]),
            10.0,
        );
        let route = extract_route(Some(&trip), &poi("A"), &poi("B"));
        assert_eq!(route.total_distance, 12.5);
    }
}
