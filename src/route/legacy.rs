//! Legacy-compatible route normalizer
//!
//! Older routing revisions served trips as `trip.legs`, a bare `legs`
//! array, or `routes[0].legs`, with maneuvers under `maneuvers`, `steps` or
//! `instructions` and several competing field names per maneuver. This
//! parser tries each known container in rank order and reads every field
//! through its priority chain. Distances may arrive as `length` in
//! kilometers (converted) or `distance` already in meters.

use super::{fallback_step, RouteStep};
use crate::search::Poi;
use serde_json::Value;
use tracing::debug;

/// Result of the legacy normalization pass.
#[derive(Debug, Clone, Default)]
pub struct LegacyRoute {
    /// Steps that carried instruction text, in walking order
    pub steps: Vec<RouteStep>,

    /// Distance accumulated over every maneuver, textless ones included
    pub total_distance: f64,

    /// Time accumulated over every maneuver
    pub total_time: f64,
}

/// Normalize a trip in any of the legacy shapes.
///
/// Maneuvers without usable text still contribute to the totals; when none
/// of them yields text at all, aggregate figures are taken from the trip
/// summary (when present) and a single summary step is synthesized.
pub fn parse_route_steps(trip: &Value, start: &Poi, end: &Poi) -> LegacyRoute {
    let mut route = LegacyRoute::default();

    let legs = trip
        .pointer("/trip/legs")
        .or_else(|| trip.get("legs"))
        .or_else(|| trip.pointer("/routes/0/legs"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    for leg in legs {
        let maneuvers = leg
            .get("maneuvers")
            .or_else(|| leg.get("steps"))
            .or_else(|| leg.get("instructions"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for maneuver in maneuvers {
            let distance_meters = match maneuver.get("length").and_then(Value::as_f64) {
                // `length` is kilometers in every shape that carries it
                Some(km) => km * 1000.0,
                None => maneuver
                    .get("distance")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
            };
            let duration_seconds = maneuver
                .get("time")
                .and_then(Value::as_f64)
                .or_else(|| maneuver.get("duration").and_then(Value::as_f64))
                .unwrap_or(0.0);

            route.total_distance += distance_meters;
            route.total_time += duration_seconds;

            let text = step_text(maneuver);
            if let Some(text) = text {
                let floor = maneuver
                    .get("floor")
                    .and_then(Value::as_i64)
                    .or_else(|| maneuver.get("z").and_then(Value::as_i64))
                    .map(|f| f as i32);

                route.steps.push(RouteStep {
                    text,
                    distance_meters,
                    duration_seconds,
                    floor,
                });
            }
        }
    }

    if route.steps.is_empty() {
        debug!("no legacy maneuver carried text, using summary aggregate");
        let summary = trip
            .pointer("/trip/summary")
            .or_else(|| trip.get("summary"))
            .filter(|s| s.is_object());

        if let Some(summary) = summary {
            route.total_distance = match summary.get("length").and_then(Value::as_f64) {
                Some(km) => km * 1000.0,
                None => summary
                    .get("distance")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
            };
            route.total_time = summary
                .get("time")
                .and_then(Value::as_f64)
                .or_else(|| summary.get("duration").and_then(Value::as_f64))
                .unwrap_or(0.0);
        }

        route.steps.push(fallback_step(
            start,
            end,
            route.total_distance,
            route.total_time,
        ));
    }

    route
}

/// Read maneuver text through the legacy priority chain: `instruction`,
/// `text`, `description`, `name`, and as a last resort `action`.
fn step_text(maneuver: &Value) -> Option<String> {
    for field in ["instruction", "text", "description", "name"] {
        if let Some(text) = maneuver.get(field).and_then(Value::as_str) {
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    maneuver
        .get("action")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
