use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A decoded activity file: sessions with their laps and records, plus the
/// document-level event and device streams.
///
/// Units follow the decoder settings: distances and altitudes in kilometres,
/// speeds in km/h, durations in seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityDocument {
    pub sessions: Vec<Session>,
    pub events: Vec<Event>,
    pub device_infos: Vec<DeviceInfo>,
}

/// One contiguous recording within a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Sport tag as reported by the device ("running", "cycling", ...)
    pub sport: Option<String>,

    pub start_time: Option<DateTime<Utc>>,

    /// Total elapsed time in seconds
    pub total_elapsed_time: Option<f64>,

    /// Total distance in kilometres
    pub total_distance: Option<f64>,

    /// Total ascent in kilometres
    pub total_ascent: Option<f64>,

    /// Total descent in kilometres
    pub total_descent: Option<f64>,

    pub total_calories: Option<f64>,
    pub max_cadence: Option<f64>,
    pub avg_cadence: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub avg_heart_rate: Option<f64>,

    /// Speeds in km/h
    pub max_speed: Option<f64>,
    pub avg_speed: Option<f64>,

    /// Power in watts
    pub max_power: Option<f64>,
    pub avg_power: Option<f64>,
    pub normalized_power: Option<f64>,

    pub laps: Vec<Lap>,
}

/// A sub-segment of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub start_time: Option<DateTime<Utc>>,
    pub timestamp: Option<DateTime<Utc>>,
    pub total_elapsed_time: Option<f64>,
    pub total_distance: Option<f64>,
    pub records: Vec<Record>,
}

/// Individual sample in the time-series recording
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: Option<DateTime<Utc>>,

    /// Seconds since the first record of the file
    pub elapsed_time: f64,

    /// Cumulative distance in kilometres
    pub distance: Option<f64>,

    /// Heart rate in beats per minute
    pub heart_rate: Option<f64>,

    /// Speed in km/h
    pub speed: Option<f64>,

    /// Steps per minute for running, revolutions per minute otherwise
    pub cadence: Option<f64>,

    /// Altitude in kilometres
    pub altitude: Option<f64>,
}

/// Lifecycle marker (timer start, stop, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: Option<DateTime<Utc>>,
    pub event: Option<String>,
    pub event_type: Option<String>,
}

/// Recording device description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub manufacturer: Option<String>,
    pub product_name: Option<String>,
}

impl ActivityDocument {
    /// The session that describes the file in the summary table
    pub fn primary_session(&self) -> Option<&Session> {
        self.sessions.first()
    }

    /// Sport of the first session, empty when unknown
    pub fn sport(&self) -> &str {
        self.primary_session()
            .and_then(|s| s.sport.as_deref())
            .unwrap_or("")
    }

    /// First event with the given `event_type`
    pub fn first_event(&self, event_type: &str) -> Option<&Event> {
        self.events
            .iter()
            .find(|e| e.event_type.as_deref() == Some(event_type))
    }

    pub fn record_count(&self) -> usize {
        self.sessions
            .iter()
            .flat_map(|s| s.laps.iter())
            .map(|l| l.records.len())
            .sum()
    }
}

impl Record {
    pub fn at(elapsed_time: f64) -> Self {
        Record {
            elapsed_time,
            ..Default::default()
        }
    }
}
