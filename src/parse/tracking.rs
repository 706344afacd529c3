//! Parsers for chronyc's key/value reports (`tracking` and `activity`).

use std::collections::HashMap;

/// Parse a `tracking` report into a field-name → field-value mapping.
///
/// Each line is split on its first `:` with both sides trimmed; lines without
/// a colon are ignored. The daemon is not expected to repeat keys, but if it
/// does the last line wins.
pub fn parse_tracking(report: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in report.lines() {
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    fields
}

/// Parse an `activity` report into online/offline source counts.
///
/// The report is lines like `200 sources online` / `1 sources offline`. Only
/// the online and offline counts are extracted; burst-state lines pass
/// through unrecognized.
pub fn parse_activity(report: &str) -> HashMap<String, String> {
    let mut counts = HashMap::new();
    for line in report.lines() {
        if !line.contains("sources") {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }
        match fields[2] {
            "online" => {
                counts.insert("ok_count".to_string(), fields[0].to_string());
            }
            "offline" => {
                counts.insert("failed_count".to_string(), fields[0].to_string());
            }
            _ => {}
        }
    }
    counts
}
