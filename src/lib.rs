// Library interface for fitcompare
// The binary and the integration tests both build on these modules

pub mod chart;
pub mod comparison;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod import;
pub mod logging;
pub mod metric;
pub mod models;
pub mod numeric;
pub mod pipeline;
pub mod series;
pub mod summary;

// Re-export commonly used types for convenience
pub use chart::{ChartHandle, ChartKind, ChartRegistry};
pub use comparison::{aggregate, aggregate_all, OverlayAlignment, OverlayCollection, OverlaySeries};
pub use config::AppConfig;
pub use error::{DecodeError, FileIssue, FitCompareError, Result, SummaryError};
pub use format::TimestampZone;
pub use import::fit::FitDecoder;
pub use import::parallel::{BatchConfig, BatchDecoder, DecodedFile};
pub use logging::{LogConfig, LogFormat, LogLevel, RunReport};
pub use metric::{CoordinateMode, Locale, Metric};
pub use models::*;
pub use pipeline::{compare_documents, CompareOptions, ComparisonRun, FileDiagnostic};
pub use series::{build_labels, extract_records, PerFileSeriesSet};
pub use summary::{project_summary, SummaryRow};
