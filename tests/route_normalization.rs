//! End-to-end normalization properties: both normalizer paths, the
//! transform fallback contract and the export rendering, exercised through
//! the public API only.

use serde_json::json;
use wayfinder::export;
use wayfinder::narrate;
use wayfinder::route::{classify_trip, extract_route, parse_route_steps, TripFormat};
use wayfinder::search::Poi;

fn poi(title: &str) -> Poi {
    Poi {
        title: title.into(),
        ..Poi::default()
    }
}

#[test]
fn null_trip_yields_the_no_data_error() {
    let route = extract_route(None, &poi("A"), &poi("B"));
    assert_eq!(route.error.as_deref(), Some("No route data received."));
    assert!(route.steps.is_empty());
}

#[test]
fn aligned_arrays_pair_by_index() {
    let trip = json!({
        "routes": [{
            "legs": [{
                "instructions": { "steps": [
                    { "instruction": "Turn left" },
                    { "instruction": "Arrive" }
                ]},
                "basic": { "steps": [
                    { "properties": { "distance": 50, "timeEstimateSeconds": 30 } },
                    { "properties": { "distance": 10, "timeEstimateSeconds": 5 } }
                ]}
            }],
            "properties": { "timeEstimateSeconds": 35 }
        }]
    });
    assert_eq!(classify_trip(&trip), TripFormat::AToB);

    let route = extract_route(Some(&trip), &poi("Kårallen"), &poi("Zenit"));
    assert!(route.error.is_none());
    assert_eq!(
        route.steps.iter().map(|s| s.text.as_str()).collect::<Vec<_>>(),
        vec!["Turn left", "Arrive"]
    );
    assert_eq!(route.total_distance, 60.0);
    assert_eq!(route.total_time, 35.0);
}

#[test]
fn empty_instructions_degrade_to_one_fallback_step() {
    let trip = json!({
        "routes": [{
            "legs": [{
                "instructions": { "steps": [{ "instruction": "" }] },
                "basic": { "steps": [] }
            }],
            "properties": { "timeEstimateSeconds": 90 }
        }]
    });
    let route = extract_route(Some(&trip), &poi("Kårallen"), &poi("Zenit"));
    assert!(route.error.is_none());
    assert_eq!(route.steps.len(), 1);
    assert!(route.steps[0].text.contains("Kårallen"));
    assert!(route.steps[0].text.contains("Zenit"));
}

#[test]
fn both_normalizers_read_their_own_shapes() {
    // The same logical route served in the current and in a legacy shape
    let modern = json!({
        "routes": [{
            "legs": [{
                "instructions": { "steps": [{ "instruction": "Head east" }] },
                "basic": { "steps": [{ "properties": { "distance": 120, "timeEstimateSeconds": 100 } }] }
            }],
            "properties": { "timeEstimateSeconds": 100 }
        }]
    });
    let legacy = json!({
        "trip": {
            "legs": [{ "maneuvers": [{ "instruction": "Head east", "length": 0.12, "time": 100 }] }]
        }
    });

    let from_modern = extract_route(Some(&modern), &poi("A"), &poi("B"));
    let from_legacy = parse_route_steps(&legacy, &poi("A"), &poi("B"));

    assert_eq!(from_modern.steps[0].text, from_legacy.steps[0].text);
    assert!((from_modern.total_distance - from_legacy.total_distance).abs() < 1e-9);
}

#[test]
fn transform_length_mismatch_keeps_originals() {
    let original = vec!["A".to_string(), "B".to_string()];
    let applied = narrate::apply_response(&original, "1. Only one clue came back");
    assert_eq!(applied, original);
}

#[test]
fn transform_round_trip_preserves_order() {
    let original = vec!["Turn left".to_string(), "Arrive".to_string()];
    let reply = "1. Hard to port, matey!\n2. X marks the spot!";
    let applied = narrate::apply_response(&original, reply);
    assert_eq!(applied[0], "Hard to port, matey!");
    assert_eq!(applied[1], "X marks the spot!");
}

#[test]
fn extracted_route_renders_to_a_document() {
    let trip = json!({
        "routes": [{
            "legs": [{
                "instructions": { "steps": [{ "instruction": "Cross the bridge" }] },
                "basic": { "steps": [{ "properties": { "distance": 200, "timeEstimateSeconds": 150 } }] }
            }],
            "properties": { "timeEstimateSeconds": 150 }
        }]
    });
    let route = extract_route(Some(&trip), &poi("Studenthuset"), &poi("C1"));
    let doc = export::render_document(
        "Studenthuset",
        "C1",
        &route.steps,
        route.total_distance,
        route.total_time,
    );
    assert!(doc.contains(" 1. Cross the bridge (200 m)"));
    assert!(doc.contains("Walking time: ~3 min"));
    assert_eq!(
        export::export_filename("Studenthuset", "C1"),
        "route-Studenthuset-to-C1.txt"
    );
}
