//! FIT decoding glue around `fitparser`.
//!
//! `fitparser` yields a flat stream of messages. Devices write every record
//! of a lap before the lap message, and every lap of a session before the
//! session message, so the hierarchy is rebuilt by buffering: pending records
//! are claimed by the next lap, pending laps by the next session.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use fitparser::de::{from_bytes_with_options, DecodeOption};
use fitparser::profile::MesgNum;
use fitparser::{FitDataRecord, Value};
use tracing::{debug, instrument};

use crate::error::DecodeError;
use crate::import::ActivityDecoder;
use crate::models::{ActivityDocument, DeviceInfo, Event, Lap, Record, Session};

const M_TO_KM: f64 = 1.0 / 1000.0;
const MPS_TO_KMH: f64 = 3.6;

/// Decoded message relevant to the activity hierarchy
#[derive(Debug, Clone, PartialEq)]
pub enum FitMessage {
    Record(Record),
    /// Lap totals; records are attached by [`cascade`]
    Lap(Lap),
    /// Session totals; laps are attached by [`cascade`]
    Session(Session),
    Event(Event),
    DeviceInfo(DeviceInfo),
}

/// FIT importer backed by `fitparser`
#[derive(Debug, Clone)]
pub struct FitDecoder {
    /// Skip header and data CRC checks, accepting files with bad checksums
    pub lenient: bool,
}

impl FitDecoder {
    pub fn new() -> Self {
        Self { lenient: true }
    }

    pub fn strict() -> Self {
        Self { lenient: false }
    }
}

impl Default for FitDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityDecoder for FitDecoder {
    fn can_decode(&self, file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("fit"))
            .unwrap_or(false)
    }

    #[instrument(skip(self), fields(lenient = self.lenient))]
    fn decode_file(&self, file_path: &Path) -> Result<ActivityDocument, DecodeError> {
        if !file_path.exists() {
            return Err(DecodeError::FileNotFound {
                path: file_path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(file_path).map_err(|e| DecodeError::Unreadable {
            path: file_path.to_path_buf(),
            reason: e.to_string(),
        })?;

        decode_bytes(&bytes, self.lenient)
    }

    fn format_name(&self) -> &'static str {
        "FIT"
    }
}

/// Decode raw FIT bytes into an activity document
pub fn decode_bytes(bytes: &[u8], lenient: bool) -> Result<ActivityDocument, DecodeError> {
    let options: HashSet<DecodeOption> = if lenient {
        [
            DecodeOption::SkipHeaderCrcValidation,
            DecodeOption::SkipDataCrcValidation,
        ]
        .into_iter()
        .collect()
    } else {
        HashSet::new()
    };

    let records: Vec<FitDataRecord> =
        from_bytes_with_options(bytes, &options).map_err(|e| DecodeError::Corrupted {
            reason: e.to_string(),
        })?;

    debug!(messages = records.len(), bytes = bytes.len(), "Decoded FIT stream");
    Ok(cascade(records.iter().filter_map(to_message)))
}

/// Rebuild the session → lap → record hierarchy from a flat message stream.
///
/// Elapsed time is measured from the first timestamped record. Records and
/// laps left over after the last session message belong to no session and
/// are dropped.
pub fn cascade<I>(messages: I) -> ActivityDocument
where
    I: IntoIterator<Item = FitMessage>,
{
    let mut document = ActivityDocument::default();
    let mut pending_records: Vec<Record> = Vec::new();
    let mut pending_laps: Vec<Lap> = Vec::new();
    let mut origin: Option<DateTime<Utc>> = None;
    let mut last_elapsed = 0.0;

    for message in messages {
        match message {
            FitMessage::Record(mut record) => {
                record.elapsed_time = match record.timestamp {
                    Some(ts) => {
                        let base = *origin.get_or_insert(ts);
                        (ts - base).num_milliseconds() as f64 / 1000.0
                    }
                    None => last_elapsed,
                };
                last_elapsed = record.elapsed_time;
                pending_records.push(record);
            }
            FitMessage::Lap(mut lap) => {
                lap.records = std::mem::take(&mut pending_records);
                pending_laps.push(lap);
            }
            FitMessage::Session(mut session) => {
                if !pending_records.is_empty() {
                    // Records after the last lap message form an implicit lap
                    pending_laps.push(Lap {
                        records: std::mem::take(&mut pending_records),
                        ..Default::default()
                    });
                }
                session.laps = std::mem::take(&mut pending_laps);
                document.sessions.push(session);
            }
            FitMessage::Event(event) => document.events.push(event),
            FitMessage::DeviceInfo(info) => document.device_infos.push(info),
        }
    }

    if !pending_records.is_empty() || !pending_laps.is_empty() {
        debug!(
            records = pending_records.len(),
            laps = pending_laps.len(),
            "Dropping data without a closing session message"
        );
    }

    document
}

/// A decoded field as (profile name, value)
type Field<'a> = (&'a str, &'a Value);

fn to_message(record: &FitDataRecord) -> Option<FitMessage> {
    let fields = record.fields().iter().map(|f| (f.name(), f.value()));
    match record.kind() {
        MesgNum::Record => Some(FitMessage::Record(record_from(fields))),
        MesgNum::Lap => Some(FitMessage::Lap(lap_from(fields))),
        MesgNum::Session => Some(FitMessage::Session(session_from(fields))),
        MesgNum::Event => Some(FitMessage::Event(event_from(fields))),
        MesgNum::DeviceInfo => Some(FitMessage::DeviceInfo(device_info_from(fields))),
        _ => None,
    }
}

fn record_from<'a>(fields: impl IntoIterator<Item = Field<'a>>) -> Record {
    let mut record = Record::default();
    for (name, value) in fields {
        match name {
            "timestamp" => record.timestamp = timestamp(value),
            "distance" => record.distance = number(value).map(|v| v * M_TO_KM),
            "heart_rate" => record.heart_rate = number(value),
            "cadence" => record.cadence = number(value),
            "speed" => {
                record.speed = record.speed.or(number(value).map(|v| v * MPS_TO_KMH));
            }
            "enhanced_speed" => {
                record.speed = number(value).map(|v| v * MPS_TO_KMH).or(record.speed);
            }
            "altitude" => {
                record.altitude = record.altitude.or(number(value).map(|v| v * M_TO_KM));
            }
            "enhanced_altitude" => {
                record.altitude = number(value).map(|v| v * M_TO_KM).or(record.altitude);
            }
            _ => {}
        }
    }
    record
}

fn lap_from<'a>(fields: impl IntoIterator<Item = Field<'a>>) -> Lap {
    let mut lap = Lap::default();
    for (name, value) in fields {
        match name {
            "start_time" => lap.start_time = timestamp(value),
            "timestamp" => lap.timestamp = timestamp(value),
            "total_elapsed_time" => lap.total_elapsed_time = number(value),
            "total_distance" => lap.total_distance = number(value).map(|v| v * M_TO_KM),
            _ => {}
        }
    }
    lap
}

fn session_from<'a>(fields: impl IntoIterator<Item = Field<'a>>) -> Session {
    let mut session = Session::default();
    for (name, value) in fields {
        match name {
            "sport" => session.sport = text(value),
            "start_time" => session.start_time = timestamp(value),
            "total_elapsed_time" => session.total_elapsed_time = number(value),
            "total_distance" => session.total_distance = number(value).map(|v| v * M_TO_KM),
            "total_ascent" => session.total_ascent = number(value).map(|v| v * M_TO_KM),
            "total_descent" => session.total_descent = number(value).map(|v| v * M_TO_KM),
            "total_calories" => session.total_calories = number(value),
            "max_cadence" => session.max_cadence = number(value),
            "avg_cadence" => session.avg_cadence = number(value),
            "max_heart_rate" => session.max_heart_rate = number(value),
            "avg_heart_rate" => session.avg_heart_rate = number(value),
            "max_speed" => {
                session.max_speed = session.max_speed.or(number(value).map(|v| v * MPS_TO_KMH));
            }
            "enhanced_max_speed" => {
                session.max_speed = number(value).map(|v| v * MPS_TO_KMH).or(session.max_speed);
            }
            "avg_speed" => {
                session.avg_speed = session.avg_speed.or(number(value).map(|v| v * MPS_TO_KMH));
            }
            "enhanced_avg_speed" => {
                session.avg_speed = number(value).map(|v| v * MPS_TO_KMH).or(session.avg_speed);
            }
            "max_power" => session.max_power = number(value),
            "avg_power" => session.avg_power = number(value),
            "normalized_power" => session.normalized_power = number(value),
            _ => {}
        }
    }
    session
}

fn event_from<'a>(fields: impl IntoIterator<Item = Field<'a>>) -> Event {
    let mut event = Event::default();
    for (name, value) in fields {
        match name {
            "timestamp" => event.timestamp = timestamp(value),
            "event" => event.event = text(value),
            "event_type" => event.event_type = text(value),
            _ => {}
        }
    }
    event
}

fn device_info_from<'a>(fields: impl IntoIterator<Item = Field<'a>>) -> DeviceInfo {
    let mut info = DeviceInfo::default();
    let mut garmin_product = None;
    for (name, value) in fields {
        match name {
            "manufacturer" => info.manufacturer = text(value),
            "product_name" => info.product_name = text(value),
            "garmin_product" => garmin_product = text(value),
            _ => {}
        }
    }
    // Garmin devices usually report only the product enum
    info.product_name = info.product_name.or(garmin_product);
    info
}

fn number(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Float32(v) => *v as f64,
        Value::Float64(v) => *v,
        Value::SInt8(v) => *v as f64,
        Value::UInt8(v) => *v as f64,
        Value::UInt8z(v) => *v as f64,
        Value::Byte(v) => *v as f64,
        Value::SInt16(v) => *v as f64,
        Value::UInt16(v) => *v as f64,
        Value::UInt16z(v) => *v as f64,
        Value::SInt32(v) => *v as f64,
        Value::UInt32(v) => *v as f64,
        Value::UInt32z(v) => *v as f64,
        Value::SInt64(v) => *v as f64,
        Value::UInt64(v) => *v as f64,
        Value::UInt64z(v) => *v as f64,
        Value::Array(values) => return values.iter().find_map(number),
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim_end_matches('\0').to_string()),
        Value::Timestamp(_) | Value::Array(_) => None,
        other => Some(other.to_string()),
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Timestamp(ts) => Some(ts.with_timezone(&Utc)),
        _ => None,
    }
}
