//! One display row per file, projected from the first session.

use serde::{Deserialize, Serialize};

use crate::error::SummaryError;
use crate::format::{
    format_altitude, format_distance, format_integer, format_speed, format_time,
    format_timestamp, TimestampZone,
};
use crate::metric::{Locale, Metric};
use crate::models::ActivityDocument;
use crate::numeric::finite_or_zero;

/// Formatted summary of a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub file_name: String,
    pub sport: String,
    pub start_time: String,
    pub end_time: String,
    pub total_time: String,
    pub total_distance: String,
    pub total_ascent: String,
    pub total_descent: String,
    pub total_calories: String,
    pub max_cadence: String,
    pub avg_cadence: String,
    pub max_heart_rate: String,
    pub avg_heart_rate: String,
    pub max_speed: String,
    pub avg_speed: String,
    pub max_power: String,
    pub avg_power: String,
    pub normalized_power: String,
    pub device: String,
}

/// Fails only when the document has no session at all
pub fn project_summary(
    document: &ActivityDocument,
    file_name: &str,
    zone: TimestampZone,
) -> Result<SummaryRow, SummaryError> {
    let session = document
        .primary_session()
        .ok_or_else(|| SummaryError::MissingSession {
            file_name: file_name.to_string(),
        })?;

    let sport = session.sport.clone().unwrap_or_default();
    let cadence_unit = Metric::Cadence.unit(&sport);
    let event_time = |event_type: &str| {
        document
            .first_event(event_type)
            .and_then(|e| e.timestamp.as_ref())
            .map(|ts| format_timestamp(ts, zone))
            .unwrap_or_default()
    };

    Ok(SummaryRow {
        file_name: file_name.to_string(),
        start_time: event_time("start"),
        end_time: event_time("stop_all"),
        total_time: format_time(finite_or_zero(session.total_elapsed_time)),
        total_distance: format_distance(finite_or_zero(session.total_distance)),
        total_ascent: format_altitude(finite_or_zero(session.total_ascent)),
        total_descent: format_altitude(finite_or_zero(session.total_descent)),
        total_calories: format_integer(finite_or_zero(session.total_calories), "kcal"),
        max_cadence: format_integer(finite_or_zero(session.max_cadence), cadence_unit),
        avg_cadence: format_integer(finite_or_zero(session.avg_cadence), cadence_unit),
        max_heart_rate: format_integer(finite_or_zero(session.max_heart_rate), "bpm"),
        avg_heart_rate: format_integer(finite_or_zero(session.avg_heart_rate), "bpm"),
        max_speed: format_speed(finite_or_zero(session.max_speed)),
        avg_speed: format_speed(finite_or_zero(session.avg_speed)),
        max_power: format_integer(finite_or_zero(session.max_power), "w"),
        avg_power: format_integer(finite_or_zero(session.avg_power), "w"),
        normalized_power: format_integer(finite_or_zero(session.normalized_power), "w"),
        device: document
            .device_infos
            .first()
            .and_then(|d| d.product_name.clone())
            .unwrap_or_default(),
        sport,
    })
}

/// Column headers matching [`SummaryRow::cells`]
pub fn headers(locale: Locale) -> [&'static str; 19] {
    match locale {
        Locale::En => [
            "File", "Sport", "Start", "End", "Total time", "Distance", "Ascent", "Descent",
            "Calories", "Max cadence", "Avg cadence", "Max HR", "Avg HR", "Max speed",
            "Avg speed", "Max power", "Avg power", "Normalized power", "Device",
        ],
        Locale::Zh => [
            "文件名", "运动类型", "开始时间", "结束时间", "总时间", "总距离", "总上升高度",
            "总下降高度", "总卡路里", "最大步频/踏频", "平均步频/踏频", "最大心率", "平均心率",
            "最大速度", "平均速度", "最大功率", "平均功率", "标准化功率", "设备信息",
        ],
    }
}

impl SummaryRow {
    /// Fields in table column order
    pub fn cells(&self) -> [&str; 19] {
        [
            self.file_name.as_str(),
            self.sport.as_str(),
            self.start_time.as_str(),
            self.end_time.as_str(),
            self.total_time.as_str(),
            self.total_distance.as_str(),
            self.total_ascent.as_str(),
            self.total_descent.as_str(),
            self.total_calories.as_str(),
            self.max_cadence.as_str(),
            self.avg_cadence.as_str(),
            self.max_heart_rate.as_str(),
            self.avg_heart_rate.as_str(),
            self.max_speed.as_str(),
            self.avg_speed.as_str(),
            self.max_power.as_str(),
            self.avg_power.as_str(),
            self.normalized_power.as_str(),
            self.device.as_str(),
        ]
    }
}
