//! Flattening of the session/lap/record hierarchy and construction of the
//! chart-ready per-file series.

use serde::{Deserialize, Serialize};

use crate::format::{format_distance, format_time, round_to};
use crate::metric::{CoordinateMode, Metric};
use crate::models::{ActivityDocument, Record};

/// All records of the document, session by session and lap by lap
pub fn extract_records(document: &ActivityDocument) -> Vec<&Record> {
    document
        .sessions
        .iter()
        .flat_map(|session| session.laps.iter())
        .flat_map(|lap| lap.records.iter())
        .collect()
}

/// One x-axis label per record
pub fn build_labels(records: &[&Record], mode: CoordinateMode) -> Vec<String> {
    records
        .iter()
        .map(|record| match mode {
            CoordinateMode::Time => format_time(record.elapsed_time),
            CoordinateMode::Distance => record.distance.map(format_distance).unwrap_or_default(),
        })
        .collect()
}

/// The four plotted series of one file, index-aligned with its labels.
/// Missing samples are `NaN`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub heart_rate: Vec<f64>,
    pub speed: Vec<f64>,
    pub cadence: Vec<f64>,
    pub altitude: Vec<f64>,
}

impl MetricSeries {
    pub fn from_records(records: &[&Record]) -> Self {
        let column = |metric: Metric| -> Vec<f64> {
            records
                .iter()
                .map(|record| display_value(metric, metric.value(record)))
                .collect()
        };

        MetricSeries {
            heart_rate: column(Metric::HeartRate),
            speed: column(Metric::Speed),
            cadence: column(Metric::Cadence),
            altitude: column(Metric::Altitude),
        }
    }

    pub fn get(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::HeartRate => &self.heart_rate,
            Metric::Speed => &self.speed,
            Metric::Cadence => &self.cadence,
            Metric::Altitude => &self.altitude,
        }
    }
}

/// Converts a raw record value to the plotted value
fn display_value(metric: Metric, raw: Option<f64>) -> f64 {
    let Some(value) = raw else {
        return f64::NAN;
    };
    match metric {
        Metric::Speed => round_to(value, 2),
        Metric::Altitude => round_to(value * 1000.0, 0),
        Metric::HeartRate | Metric::Cadence => value,
    }
}

/// Labels and metric series for one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerFileSeriesSet {
    pub file_name: String,
    pub sport: String,
    pub mode: CoordinateMode,
    pub labels: Vec<String>,
    pub metrics: MetricSeries,
}

impl PerFileSeriesSet {
    pub fn build(
        file_name: impl Into<String>,
        sport: impl Into<String>,
        records: &[&Record],
        mode: CoordinateMode,
    ) -> Self {
        PerFileSeriesSet {
            file_name: file_name.into(),
            sport: sport.into(),
            mode,
            labels: build_labels(records, mode),
            metrics: MetricSeries::from_records(records),
        }
    }

    pub fn series(&self, metric: Metric) -> &[f64] {
        self.metrics.get(metric)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
