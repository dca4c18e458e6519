use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::metric::Locale;
use crate::pipeline::ComparisonRun;

pub mod csv;
pub mod json;
pub mod text;

/// Output format of a comparison run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Summary table printed to the terminal
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" | "txt" => Ok(ExportFormat::Table),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("Nothing to export: {0}")]
    InsufficientData(String),
}

/// Write a run in the given format into `output_dir`, returning the files
/// written. `Table` writes `summary.txt`.
pub fn export_run(
    run: &ComparisonRun,
    format: ExportFormat,
    output_dir: &Path,
    locale: Locale,
) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(output_dir)?;

    match format {
        ExportFormat::Table => {
            let path = output_dir.join("summary.txt");
            std::fs::write(&path, text::render_run(run, locale))?;
            Ok(vec![path])
        }
        ExportFormat::Json => {
            let path = output_dir.join("comparison.json");
            json::export_json(run, &path)?;
            Ok(vec![path])
        }
        ExportFormat::Csv => {
            let mut written = Vec::new();
            let summary_path = output_dir.join("summary.csv");
            csv::export_summaries(&run.summaries, locale, &summary_path)?;
            written.push(summary_path);

            for overlay in &run.overlays {
                let path = output_dir.join(format!("overlay_{}.csv", overlay.metric.key()));
                csv::export_overlay(overlay, &path)?;
                written.push(path);
            }
            Ok(written)
        }
    }
}
