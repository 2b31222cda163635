/// Utility functions
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Naive layouts accepted for UTC timestamps, tried in order
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f UTC",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a UTC timestamp from RFC 3339 or the `2023-01-25 14:04:00.152582 UTC`
/// layout used by the status exports.
pub fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Extract the report id from an artifact file name `report-<id>.csv`
pub fn report_id_from_file_name(name: &str) -> Option<&str> {
    name.strip_prefix("report-")?.strip_suffix(".csv")
}
