//! Unified error hierarchy for fitcompare
//!
//! File-level problems are reported as [`FileIssue`] diagnostics and never
//! abort a batch; [`FitCompareError`] is reserved for failures of the whole
//! operation.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for all fitcompare operations
#[derive(Debug, Error)]
pub enum FitCompareError {
    /// FIT decoding errors
    #[error("FIT decoding error: {0}")]
    Decode(#[from] DecodeError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] crate::export::ExportError),

    /// Every input file failed
    #[error("No usable activity files")]
    NoUsableFiles,
}

/// Errors raised while turning file bytes into an activity document
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeError {
    /// File not found at specified path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// File could not be read
    #[error("Unable to read {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    /// Bytes are not a decodable FIT stream
    #[error("Corrupted file: {reason}")]
    Corrupted { reason: String },
}

/// Errors raised by the summary projection
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("{file_name} contains no session")]
    MissingSession { file_name: String },
}

/// Why a file was left out of part or all of a comparison run
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileIssue {
    /// Decoding failed; the file is absent from table and charts
    #[error("decode failure: {reason}")]
    DecodeFailure { reason: String },

    /// No session; the file is absent from table and charts
    #[error("no session found")]
    MissingSession,

    /// No records; the file keeps its summary row but has no charts
    #[error("no records found")]
    EmptyRecordSet,
}

impl FileIssue {
    /// Whether the file still contributes a summary row
    pub fn keeps_summary(&self) -> bool {
        matches!(self, FileIssue::EmptyRecordSet)
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FileIssue::DecodeFailure { .. } => ErrorSeverity::Error,
            FileIssue::MissingSession => ErrorSeverity::Error,
            FileIssue::EmptyRecordSet => ErrorSeverity::Warning,
        }
    }
}

/// Result type alias for fitcompare operations
pub type Result<T> = std::result::Result<T, FitCompareError>;

impl FitCompareError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FitCompareError::Decode(DecodeError::FileNotFound { .. }) => ErrorSeverity::Warning,
            FitCompareError::Decode(_) => ErrorSeverity::Error,
            FitCompareError::Export(_) => ErrorSeverity::Error,
            FitCompareError::NoUsableFiles => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FitCompareError::Decode(DecodeError::FileNotFound { path }) => {
                format!("Could not find activity file: {}", path.display())
            }
            FitCompareError::Decode(DecodeError::Corrupted { reason }) => {
                format!("Activity file is corrupted: {}", reason)
            }
            FitCompareError::NoUsableFiles => {
                "None of the selected files could be compared. Please check that they are valid FIT activities."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Failure of the whole operation
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
