//! Plain-text rendering of a route
//!
//! Formats the canonical steps into a printable document and derives the
//! suggested filename for saving it. Also holds the small display labels
//! shared by the views: metric distance, themed distance and walking time.

use crate::route::RouteStep;

/// Human distance label, `None` for a zero distance.
pub fn distance_label(meters: f64) -> Option<String> {
    if meters == 0.0 {
        return None;
    }
    if meters >= 1000.0 {
        Some(format!("{:.1} km", meters / 1000.0))
    } else {
        Some(format!("{} m", meters.round() as i64))
    }
}

/// Distance label in treasure-hunt units: paces, or leagues past a
/// kilometer.
pub fn paces_label(meters: f64) -> Option<String> {
    if meters == 0.0 {
        return None;
    }
    if meters >= 1000.0 {
        Some(format!("{:.1} leagues", meters / 1000.0))
    } else {
        Some(format!("{} paces", meters.round() as i64))
    }
}

/// Walking time rounded up to whole minutes, never less than one.
pub fn walking_minutes(total_time_seconds: f64) -> u64 {
    ((total_time_seconds / 60.0).ceil() as u64).max(1)
}

/// Render the instruction list as a plain-text document for save or print.
pub fn render_document(
    from: &str,
    to: &str,
    steps: &[RouteStep],
    total_distance: f64,
    total_time: f64,
) -> String {
    let mut doc = String::new();
    doc.push_str("Route Instructions\n");
    doc.push_str(&format!("From: {}\n", from));
    doc.push_str(&format!("To: {}\n\n", to));

    for (i, step) in steps.iter().enumerate() {
        match distance_label(step.distance_meters) {
            Some(label) => doc.push_str(&format!("{:>2}. {} ({})\n", i + 1, step.text, label)),
            None => doc.push_str(&format!("{:>2}. {}\n", i + 1, step.text)),
        }
    }

    doc.push('\n');
    if let Some(label) = distance_label(total_distance) {
        doc.push_str(&format!("Total distance: {}\n", label));
    }
    doc.push_str(&format!("Walking time: ~{} min\n", walking_minutes(total_time)));
    doc
}

/// Suggested filename for a saved route, whitespace dashed.
pub fn export_filename(from: &str, to: &str) -> String {
    format!("route-{}-to-{}.txt", dash_whitespace(from), dash_whitespace(to))
}

fn dash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(text: &str, meters: f64) -> RouteStep {
        RouteStep {
            text: text.into(),
            distance_meters: meters,
            duration_seconds: 0.0,
            floor: None,
        }
    }

    #[test]
    fn test_distance_labels() {
        assert_eq!(distance_label(0.0), None);
        assert_eq!(distance_label(49.6).as_deref(), Some("50 m"));
        assert_eq!(distance_label(999.0).as_deref(), Some("999 m"));
        assert_eq!(distance_label(1250.0).as_deref(), Some("1.3 km"));
    }

    #[test]
    fn test_paces_labels() {
        assert_eq!(paces_label(0.0), None);
        assert_eq!(paces_label(80.0).as_deref(), Some("80 paces"));
        assert_eq!(paces_label(1500.0).as_deref(), Some("1.5 leagues"));
    }

    #[test]
    fn test_walking_minutes_rounds_up_with_floor_of_one() {
        assert_eq!(walking_minutes(0.0), 1);
        assert_eq!(walking_minutes(59.0), 1);
        assert_eq!(walking_minutes(61.0), 2);
        assert_eq!(walking_minutes(600.0), 10);
    }

    #[test]
    fn test_render_document() {
        let steps = vec![step("Turn left", 50.0), step("Arrive", 0.0)];
        let doc = render_document("Kårallen", "Zenit", &steps, 50.0, 95.0);
        assert!(doc.starts_with("Route Instructions\n"));
        assert!(doc.contains("From: Kårallen\n"));
        assert!(doc.contains("To: Zenit\n"));
        assert!(doc.contains(" 1. Turn left (50 m)\n"));
        assert!(doc.contains(" 2. Arrive\n"));
        assert!(doc.contains("Total distance: 50 m\n"));
        assert!(doc.contains("Walking time: ~2 min\n"));
    }

    #[test]
    fn test_export_filename_dashes_whitespace() {
        assert_eq!(
            export_filename("Studenthuset entré", "Key 1"),
            "route-Studenthuset-entré-to-Key-1.txt"
        );
    }
}
