//! Display formatting for durations, distances, altitudes and timestamps.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Time zone used when rendering event timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampZone {
    #[default]
    Local,
    Utc,
}

impl std::str::FromStr for TimestampZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(TimestampZone::Local),
            "utc" => Ok(TimestampZone::Utc),
            _ => Err(format!("Invalid timestamp zone: {}", s)),
        }
    }
}

impl std::fmt::Display for TimestampZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampZone::Local => f.write_str("local"),
            TimestampZone::Utc => f.write_str("utc"),
        }
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Seconds as `HH:MM:SS`. Fractions are truncated; hours keep counting past 24.
/// Non-finite or negative input renders as `00:00:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Inverse of [`format_time`]
pub fn parse_time(text: &str) -> Option<u64> {
    let mut parts = text.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}

/// Kilometres with two decimals
pub fn format_distance(km: f64) -> String {
    format!("{:.2} km", km)
}

/// Altitude stored in kilometres, shown in whole metres
pub fn format_altitude(km: f64) -> String {
    format!("{:.0} m", km * 1000.0)
}

pub fn format_speed(kmh: f64) -> String {
    format!("{:.2} km/h", kmh)
}

/// Whole number followed by a unit
pub fn format_integer(value: f64, unit: &str) -> String {
    format!("{} {}", value.round() as i64, unit)
}

/// Date and 12-hour clock time
pub fn format_timestamp(timestamp: &DateTime<Utc>, zone: TimestampZone) -> String {
    const PATTERN: &str = "%Y/%m/%d %I:%M:%S %p";
    match zone {
        TimestampZone::Utc => timestamp.format(PATTERN).to_string(),
        TimestampZone::Local => timestamp.with_timezone(&Local).format(PATTERN).to_string(),
    }
}
