//! The closed sets of plotted metrics and x-axis bases, and the single
//! metric → (name, unit) lookup table.

use serde::{Deserialize, Serialize};

use crate::models::Record;

/// Quantity plotted for every file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    HeartRate,
    Speed,
    Cadence,
    Altitude,
}

/// Basis of the x-axis labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    #[default]
    Time,
    Distance,
}

/// Display language for metric names and table headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

/// Localized name and unit of a metric for a given sport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricLabel {
    pub name: &'static str,
    pub unit: &'static str,
}

pub fn is_running(sport: &str) -> bool {
    sport.eq_ignore_ascii_case("running")
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::HeartRate,
        Metric::Speed,
        Metric::Cadence,
        Metric::Altitude,
    ];

    /// Stable identifier used in exported file names and JSON keys
    pub fn key(&self) -> &'static str {
        match self {
            Metric::HeartRate => "heartRate",
            Metric::Speed => "speed",
            Metric::Cadence => "cadence",
            Metric::Altitude => "altitude",
        }
    }

    /// Raw record value, before display rounding and unit conversion
    pub fn value(&self, record: &Record) -> Option<f64> {
        match self {
            Metric::HeartRate => record.heart_rate,
            Metric::Speed => record.speed,
            Metric::Cadence => record.cadence,
            Metric::Altitude => record.altitude,
        }
    }

    pub fn unit(&self, sport: &str) -> &'static str {
        match self {
            Metric::HeartRate => "bpm",
            Metric::Speed => "km/h",
            Metric::Cadence if is_running(sport) => "spm",
            Metric::Cadence => "rpm",
            Metric::Altitude => "m",
        }
    }

    pub fn name(&self, sport: &str, locale: Locale) -> &'static str {
        let running = is_running(sport);
        match (locale, self) {
            (Locale::En, Metric::HeartRate) => "Heart rate",
            (Locale::En, Metric::Speed) => "Speed",
            (Locale::En, Metric::Cadence) if running => "Step cadence",
            (Locale::En, Metric::Cadence) => "Cadence",
            (Locale::En, Metric::Altitude) => "Altitude",
            (Locale::Zh, Metric::HeartRate) => "心率",
            (Locale::Zh, Metric::Speed) => "速度",
            (Locale::Zh, Metric::Cadence) if running => "步频",
            (Locale::Zh, Metric::Cadence) => "踏频",
            (Locale::Zh, Metric::Altitude) => "海拔",
        }
    }

    pub fn label(&self, sport: &str, locale: Locale) -> MetricLabel {
        MetricLabel {
            name: self.name(sport, locale),
            unit: self.unit(sport),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heartrate" | "heart_rate" | "hr" => Ok(Metric::HeartRate),
            "speed" => Ok(Metric::Speed),
            "cadence" => Ok(Metric::Cadence),
            "altitude" => Ok(Metric::Altitude),
            _ => Err(format!("Invalid metric: {}", s)),
        }
    }
}

impl std::fmt::Display for CoordinateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateMode::Time => f.write_str("time"),
            CoordinateMode::Distance => f.write_str("distance"),
        }
    }
}

impl std::str::FromStr for CoordinateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time" => Ok(CoordinateMode::Time),
            "distance" | "dist" => Ok(CoordinateMode::Distance),
            _ => Err(format!("Invalid coordinate mode: {}", s)),
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::En => f.write_str("en"),
            Locale::Zh => f.write_str("zh"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "zh" | "zh-cn" | "chinese" => Ok(Locale::Zh),
            _ => Err(format!("Invalid locale: {}", s)),
        }
    }
}
