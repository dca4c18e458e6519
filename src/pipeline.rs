//! Batch driver for a comparison run.
//!
//! Each decoded file goes through summary projection, record extraction and
//! series building on its own. File-level problems become [`FileDiagnostic`]s;
//! only a batch where no file yields anything is an error.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::comparison::{aggregate_all, OverlayAlignment, OverlayCollection};
use crate::error::{FileIssue, FitCompareError, Result, SummaryError};
use crate::format::TimestampZone;
use crate::import::parallel::DecodedFile;
use crate::metric::CoordinateMode;
use crate::series::{extract_records, PerFileSeriesSet};
use crate::summary::{project_summary, SummaryRow};

/// Inputs of a comparison run besides the files themselves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    pub mode: CoordinateMode,
    pub zone: TimestampZone,
    pub alignment: OverlayAlignment,
}

/// A file left out of part or all of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiagnostic {
    pub file_name: String,
    pub issue: FileIssue,
}

/// Everything the presentation layer needs for one comparison
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRun {
    pub mode: CoordinateMode,

    /// Chartable files, in input order
    pub files: Vec<PerFileSeriesSet>,

    /// One overlay per metric; empty when no file is chartable
    pub overlays: Vec<OverlayCollection>,

    /// One row per file with a session, in input order
    pub summaries: Vec<SummaryRow>,

    pub diagnostics: Vec<FileDiagnostic>,

    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl ComparisonRun {
    pub fn has_charts(&self) -> bool {
        !self.files.is_empty()
    }
}

/// Outcome of the per-file stage
struct FileOutcome {
    summary: Option<SummaryRow>,
    series: Option<PerFileSeriesSet>,
    issue: Option<FileIssue>,
}

fn process_file(file: &DecodedFile, options: &CompareOptions) -> FileOutcome {
    let document = match &file.document {
        Ok(document) => document,
        Err(e) => {
            return FileOutcome {
                summary: None,
                series: None,
                issue: Some(FileIssue::DecodeFailure {
                    reason: e.to_string(),
                }),
            }
        }
    };

    let summary = match project_summary(document, &file.file_name, options.zone) {
        Ok(row) => row,
        Err(SummaryError::MissingSession { .. }) => {
            return FileOutcome {
                summary: None,
                series: None,
                issue: Some(FileIssue::MissingSession),
            }
        }
    };

    let records = extract_records(document);
    if records.is_empty() {
        return FileOutcome {
            summary: Some(summary),
            series: None,
            issue: Some(FileIssue::EmptyRecordSet),
        };
    }

    let series = PerFileSeriesSet::build(&file.file_name, document.sport(), &records, options.mode);
    debug!(file = %file.file_name, records = series.len(), "Built series");

    FileOutcome {
        summary: Some(summary),
        series: Some(series),
        issue: None,
    }
}

/// Run the comparison over already decoded files
pub fn compare_documents(files: &[DecodedFile], options: &CompareOptions) -> Result<ComparisonRun> {
    let _span = info_span!("compare", files = files.len(), mode = %options.mode).entered();
    let start = Instant::now();

    let mut series_sets = Vec::new();
    let mut summaries = Vec::new();
    let mut diagnostics = Vec::new();

    for file in files {
        let outcome = process_file(file, options);
        if let Some(issue) = outcome.issue {
            warn!(file = %file.file_name, "{}", issue);
            diagnostics.push(FileDiagnostic {
                file_name: file.file_name.clone(),
                issue,
            });
        }
        summaries.extend(outcome.summary);
        series_sets.extend(outcome.series);
    }

    if summaries.is_empty() && series_sets.is_empty() {
        return Err(FitCompareError::NoUsableFiles);
    }

    let overlays = if series_sets.is_empty() {
        Vec::new()
    } else {
        aggregate_all(&series_sets)
            .into_iter()
            .map(|overlay| overlay.with_alignment(options.alignment))
            .collect()
    };

    let elapsed = start.elapsed();
    info!(
        charted = series_sets.len(),
        summarized = summaries.len(),
        skipped = diagnostics.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Comparison complete"
    );

    Ok(ComparisonRun {
        mode: options.mode,
        files: series_sets,
        overlays,
        summaries,
        diagnostics,
        elapsed,
    })
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
