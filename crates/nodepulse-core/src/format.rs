//! Display formatting and status-to-style mapping helpers.
//!
//! Pure functions, no side effects. The numeric conventions mirror the
//! panel's wire units: speeds arrive in Mbps, pings in milliseconds.

use chrono::{DateTime, Local, Utc};

use nodepulse_api::{Node, NodeStatus, TestStatus};

/// Semantic style token. Shells map these to whatever their medium offers
/// (terminal colors, table badges); unrecognized statuses always land on
/// `Muted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Danger,
    Warn,
    Info,
    Muted,
}

/// Format a speed in Mbps: values under 1 are rescaled to Kbps, both to two
/// decimal places. Absent input renders as a placeholder dash.
pub fn format_speed(speed: Option<f64>) -> String {
    match speed {
        None => "-".into(),
        Some(mbps) if mbps < 1.0 => format!("{:.2} Kbps", mbps * 1000.0),
        Some(mbps) => format!("{mbps:.2} Mbps"),
    }
}

/// Format a ping in milliseconds to two decimal places, or a dash.
pub fn format_ping(ping: Option<f64>) -> String {
    match ping {
        None => "-".into(),
        Some(ms) => format!("{ms:.2} ms"),
    }
}

/// Render a timestamp in local time; absent input renders empty.
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        None => String::new(),
        Some(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    }
}

/// Style token for a node status.
pub fn node_status_tone(status: NodeStatus) -> Tone {
    match status {
        NodeStatus::Online => Tone::Ok,
        NodeStatus::Offline => Tone::Danger,
        NodeStatus::Unknown => Tone::Muted,
    }
}

/// Style token for a speed-test status.
pub fn test_status_tone(status: TestStatus) -> Tone {
    match status {
        TestStatus::Completed => Tone::Ok,
        TestStatus::Pending => Tone::Warn,
        TestStatus::Running => Tone::Info,
        TestStatus::Failed | TestStatus::Timeout => Tone::Danger,
        TestStatus::Unknown => Tone::Muted,
    }
}

/// Resolve a node id to its display name from the loaded node list,
/// falling back to the raw id for stale or foreign ids.
pub fn node_name(nodes: &[Node], id: &str) -> String {
    nodes
        .iter()
        .find(|n| n.id == id)
        .map_or_else(|| id.to_owned(), |n| n.name.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str) -> Node {
        serde_json::from_value(serde_json::json!({
            "id": id, "name": name, "ip": "192.0.2.1"
        }))
        .unwrap()
    }

    #[test]
    fn speed_rescales_below_one_mbps() {
        assert_eq!(format_speed(Some(0.5)), "500.00 Kbps");
        assert_eq!(format_speed(Some(12.3)), "12.30 Mbps");
        assert_eq!(format_speed(Some(1.0)), "1.00 Mbps");
        assert_eq!(format_speed(None), "-");
    }

    #[test]
    fn ping_has_two_decimals_or_dash() {
        assert_eq!(format_ping(Some(42.0)), "42.00 ms");
        assert_eq!(format_ping(Some(3.456)), "3.46 ms");
        assert_eq!(format_ping(None), "-");
    }

    #[test]
    fn date_renders_empty_for_none() {
        assert_eq!(format_date(None), "");
        assert!(!format_date(Some(Utc::now())).is_empty());
    }

    #[test]
    fn node_status_maps_to_tones() {
        assert_eq!(node_status_tone(NodeStatus::Online), Tone::Ok);
        assert_eq!(node_status_tone(NodeStatus::Offline), Tone::Danger);
        assert_eq!(node_status_tone(NodeStatus::Unknown), Tone::Muted);
    }

    #[test]
    fn test_status_maps_to_tones() {
        assert_eq!(test_status_tone(TestStatus::Completed), Tone::Ok);
        assert_eq!(test_status_tone(TestStatus::Pending), Tone::Warn);
        assert_eq!(test_status_tone(TestStatus::Running), Tone::Info);
        assert_eq!(test_status_tone(TestStatus::Failed), Tone::Danger);
        assert_eq!(test_status_tone(TestStatus::Timeout), Tone::Danger);
        assert_eq!(test_status_tone(TestStatus::Unknown), Tone::Muted);
    }

    #[test]
    fn node_name_falls_back_to_raw_id() {
        let nodes = vec![node("n1", "tokyo-1")];
        assert_eq!(node_name(&nodes, "n1"), "tokyo-1");
        assert_eq!(node_name(&nodes, "gone"), "gone");
    }
}
