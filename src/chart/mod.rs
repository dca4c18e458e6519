//! Chart layout and the registry of rendered charts.
//!
//! Layout (titles, vertical ranges, line segments, file names) is plain data
//! and always available. SVG rendering lives in [`svg`] behind the `charts`
//! feature.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::comparison::OverlayCollection;
use crate::metric::{Locale, Metric};
use crate::numeric::{finite_bounds, ValueBounds};
use crate::series::PerFileSeriesSet;

#[cfg(feature = "charts")]
pub mod svg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// All metrics of one file
    PerFile,
    /// One metric across all files
    Comparison,
}

/// A chart written to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartHandle {
    pub title: String,
    pub path: PathBuf,
    pub kind: ChartKind,
    pub metric: Option<Metric>,
}

/// Every chart produced by one render pass, in render order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartRegistry {
    charts: Vec<ChartHandle>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handle: ChartHandle) {
        self.charts.push(handle);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartHandle> {
        self.charts.iter()
    }

    pub fn of_kind(&self, kind: ChartKind) -> impl Iterator<Item = &ChartHandle> {
        self.charts.iter().filter(move |c| c.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

pub fn comparison_title(overlay: &OverlayCollection, locale: Locale) -> String {
    let name = overlay.metric.name(&overlay.sport, locale);
    match locale {
        Locale::En => format!("Comparison: {}", name),
        Locale::Zh => format!("总对比：{}", name),
    }
}

/// Legend entry for a metric line, e.g. `Heart rate (bpm)`
pub fn series_caption(metric: Metric, sport: &str, locale: Locale) -> String {
    let label = metric.label(sport, locale);
    format!("{} ({})", label.name, label.unit)
}

/// Vertical range of a per-file chart: the finite values of every metric
pub fn per_file_bounds(set: &PerFileSeriesSet) -> Option<ValueBounds> {
    Metric::ALL
        .iter()
        .filter_map(|&m| finite_bounds(set.series(m)))
        .reduce(ValueBounds::union)
}

/// Vertical range of a comparison chart: the finite values of every file.
/// This always contains the overlay's suggested bounds, which come from the
/// first file.
pub fn comparison_bounds(overlay: &OverlayCollection) -> Option<ValueBounds> {
    overlay
        .series
        .iter()
        .filter_map(|s| finite_bounds(&s.values))
        .reduce(ValueBounds::union)
}

/// Drawable y-range with a margin; flat or empty data still gets a span
pub fn y_range(bounds: Option<ValueBounds>) -> (f64, f64) {
    match bounds {
        None => (0.0, 1.0),
        Some(b) if b.max - b.min < f64::EPSILON => (b.min - 1.0, b.max + 1.0),
        Some(b) => {
            let margin = (b.max - b.min) * 0.05;
            (b.min.min(0.0).min(b.min - margin), b.max + margin)
        }
    }
}

/// Split a series into runs of finite points keyed by sample index. A
/// missing value ends the current run.
pub fn segments(values: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, &v) in values.iter().enumerate() {
        if v.is_finite() {
            current.push((i as f64, v));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Axis label for a fractional sample index
pub fn label_at(labels: &[String], index: f64) -> String {
    if index < 0.0 {
        return String::new();
    }
    labels
        .get(index.round() as usize)
        .cloned()
        .unwrap_or_default()
}

/// File stem safe to use in an output path
pub fn file_stem(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .filter(|s| !s.is_empty())
        .unwrap_or(file_name);
    stem.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
