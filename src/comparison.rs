//! Cross-file overlays: one collection per metric holding every file's series
//! against a shared reference label axis.

use serde::{Deserialize, Serialize};

use crate::metric::Metric;
use crate::numeric::{finite_bounds, ValueBounds};
use crate::series::PerFileSeriesSet;

/// How overlay series shorter than the reference axis are handed to the
/// presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlayAlignment {
    /// Series keep their own length and end before the axis does
    #[default]
    Ragged,
    /// Series are padded with `NaN` gaps up to the axis length
    PadWithGaps,
}

impl std::str::FromStr for OverlayAlignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ragged" => Ok(OverlayAlignment::Ragged),
            "pad" | "pad-with-gaps" | "gaps" => Ok(OverlayAlignment::PadWithGaps),
            _ => Err(format!("Invalid overlay alignment: {}", s)),
        }
    }
}

impl std::fmt::Display for OverlayAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayAlignment::Ragged => f.write_str("ragged"),
            OverlayAlignment::PadWithGaps => f.write_str("pad-with-gaps"),
        }
    }
}

/// One file's contribution to an overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySeries {
    pub file_name: String,
    pub values: Vec<f64>,
}

impl OverlaySeries {
    /// Values padded with `NaN` to `len`. Never truncates.
    pub fn aligned_to(&self, len: usize) -> Vec<f64> {
        let mut values = self.values.clone();
        if values.len() < len {
            values.resize(len, f64::NAN);
        }
        values
    }
}

/// All files' series for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayCollection {
    pub metric: Metric,

    /// Sport of the first file, used for the metric's name and unit
    pub sport: String,

    /// Labels of the longest file
    pub labels: Vec<String>,

    pub series: Vec<OverlaySeries>,

    /// Vertical scale hint from the first file's finite values; `None` means
    /// auto-scale
    pub suggested_bounds: Option<ValueBounds>,
}

impl OverlayCollection {
    /// Copy with every series padded to the reference axis length
    pub fn aligned(&self) -> OverlayCollection {
        let len = self.labels.len();
        OverlayCollection {
            series: self
                .series
                .iter()
                .map(|s| OverlaySeries {
                    file_name: s.file_name.clone(),
                    values: s.aligned_to(len),
                })
                .collect(),
            ..self.clone()
        }
    }

    pub fn with_alignment(self, alignment: OverlayAlignment) -> OverlayCollection {
        match alignment {
            OverlayAlignment::Ragged => self,
            OverlayAlignment::PadWithGaps => self.aligned(),
        }
    }
}

/// Labels of the file with the most labels; the earliest file wins ties
pub fn reference_axis(sets: &[PerFileSeriesSet]) -> &[String] {
    sets.iter()
        .fold(None::<&PerFileSeriesSet>, |best, set| match best {
            Some(b) if b.labels.len() >= set.labels.len() => Some(b),
            _ => Some(set),
        })
        .map(|set| set.labels.as_slice())
        .unwrap_or(&[])
}

pub fn aggregate(sets: &[PerFileSeriesSet], metric: Metric) -> OverlayCollection {
    let series: Vec<OverlaySeries> = sets
        .iter()
        .map(|set| OverlaySeries {
            file_name: set.file_name.clone(),
            values: set.series(metric).to_vec(),
        })
        .collect();

    let suggested_bounds = series.first().and_then(|s| finite_bounds(&s.values));

    OverlayCollection {
        metric,
        sport: sets.first().map(|s| s.sport.clone()).unwrap_or_default(),
        labels: reference_axis(sets).to_vec(),
        series,
        suggested_bounds,
    }
}

/// One overlay per metric, in [`Metric::ALL`] order
pub fn aggregate_all(sets: &[PerFileSeriesSet]) -> Vec<OverlayCollection> {
    Metric::ALL
        .iter()
        .map(|&metric| aggregate(sets, metric))
        .collect()
}
