use serde::Serializer;
use time::{format_description::well_known, Duration, OffsetDateTime};

/// Formats 'utc_date' into a string like "2024-09-01T05:10:44Z".
/// This is the format that GPX files contain.
pub fn format_utc_date(utc_date: &OffsetDateTime) -> String {
    utc_date
        .format(&well_known::Rfc3339)
        .unwrap_or_else(|_| utc_date.to_string())
}

/// Formats a duration as "H:MM:SS", prefixed with the number of whole days
/// when there are any, e.g. "1 day, 2:03:04" or "3 days, 0:00:00".
/// Fractional seconds are truncated.
pub fn format_duration(duration: Duration) -> String {
    let sign = if duration.is_negative() { "-" } else { "" };
    let total = duration.whole_seconds().unsigned_abs();

    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    match days {
        0 => format!("{sign}{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("{sign}1 day, {hours}:{minutes:02}:{seconds:02}"),
        d => format!("{sign}{d} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}

/// Formats an optional elevation for display, "None" when it is missing.
pub fn format_elevation(ele: Option<f64>) -> String {
    match ele {
        Some(ele) => ele.to_string(),
        None => "None".to_string(),
    }
}

pub(crate) fn serialize_duration<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}
