//! Duration parsing and display.
//!
//! The backend reports durations in several shapes: plain seconds, `"mm:ss"`
//! and `"hh:mm:ss"` strings, or nothing at all. Everything here collapses
//! those into non-negative seconds; anything unparseable becomes `0.0`.

use serde::{Deserialize, Serialize};

/// A duration exactly as it arrived from the backend.
///
/// Deserializes from either a JSON number or a JSON string.
///
/// # Examples
///
/// ```
/// use ridecast_domain::common::RawDuration;
///
/// assert_eq!(RawDuration::Seconds(90.0).seconds(), 90.0);
/// assert_eq!(RawDuration::Text("1:30".into()).seconds(), 90.0);
/// assert_eq!(RawDuration::Text("soon".into()).seconds(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDuration {
    Seconds(f64),
    Text(String),
}

impl RawDuration {
    /// Normalized seconds, never negative and never NaN.
    pub fn seconds(&self) -> f64 {
        match self {
            RawDuration::Seconds(value) => sanitize_seconds(*value),
            RawDuration::Text(text) => parse_duration(text),
        }
    }

    /// Seconds for an optional field; a missing duration is zero.
    pub fn seconds_or_zero(raw: Option<&RawDuration>) -> f64 {
        raw.map(RawDuration::seconds).unwrap_or(0.0)
    }
}

impl From<f64> for RawDuration {
    fn from(value: f64) -> Self {
        RawDuration::Seconds(value)
    }
}

impl From<&str> for RawDuration {
    fn from(value: &str) -> Self {
        RawDuration::Text(value.to_string())
    }
}

/// Clamps a raw seconds value into `[0, +inf)`, mapping NaN and infinities to zero.
///
/// # Examples
///
/// ```
/// use ridecast_domain::common::sanitize_seconds;
///
/// assert_eq!(sanitize_seconds(12.5), 12.5);
/// assert_eq!(sanitize_seconds(-3.0), 0.0);
/// assert_eq!(sanitize_seconds(f64::NAN), 0.0);
/// ```
pub fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parses `"mm:ss"` or `"hh:mm:ss"` into seconds.
///
/// Any non-numeric component or an unexpected number of components yields `0.0`.
///
/// # Examples
///
/// ```
/// use ridecast_domain::common::parse_duration;
///
/// assert_eq!(parse_duration("05:07"), 307.0);
/// assert_eq!(parse_duration("1:02:03"), 3723.0);
/// assert_eq!(parse_duration("12"), 0.0);
/// assert_eq!(parse_duration("ab:cd"), 0.0);
/// ```
pub fn parse_duration(input: &str) -> f64 {
    let components: Option<Vec<f64>> = input.split(':').map(parse_component).collect();
    let Some(components) = components else {
        return 0.0;
    };

    let total = match components.as_slice() {
        [minutes, seconds] => minutes * 60.0 + seconds,
        [hours, minutes, seconds] => hours * 3600.0 + minutes * 60.0 + seconds,
        _ => 0.0,
    };

    sanitize_seconds(total)
}

fn parse_component(part: &str) -> Option<f64> {
    let trimmed = part.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Formats seconds as `m:ss`, or `h:mm:ss` once an hour is reached.
///
/// Fractional seconds are truncated.
///
/// # Examples
///
/// ```
/// use ridecast_domain::common::format_duration;
///
/// assert_eq!(format_duration(307.0), "5:07");
/// assert_eq!(format_duration(3723.9), "1:02:03");
/// assert_eq!(format_duration(-1.0), "0:00");
/// ```
pub fn format_duration(seconds: f64) -> String {
    let total = sanitize_seconds(seconds).floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
