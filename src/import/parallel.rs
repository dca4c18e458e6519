//! Parallel decoding of a batch of activity files using rayon
//!
//! Every file is read and decoded independently; a failure is recorded in
//! that file's result and never stops the rest of the batch. Results come
//! back in input order.

use std::path::{Path, PathBuf};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::fit::FitDecoder;
use super::{file_name_of, ActivityDecoder};
use crate::error::DecodeError;
use crate::models::ActivityDocument;

/// Configuration for batch decoding
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Worker threads; `None` uses the rayon default (number of CPUs)
    pub num_threads: Option<usize>,
    /// Show progress bar while decoding
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            show_progress: true,
        }
    }
}

/// Outcome of decoding one file
#[derive(Debug, Clone)]
pub struct DecodedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub document: Result<ActivityDocument, DecodeError>,
    pub duration_ms: u128,
}

impl DecodedFile {
    /// Wrap an already decoded (or failed) document
    pub fn new(file_name: impl Into<String>, document: Result<ActivityDocument, DecodeError>) -> Self {
        let file_name = file_name.into();
        Self {
            path: PathBuf::from(&file_name),
            file_name,
            document,
            duration_ms: 0,
        }
    }
}

/// Summary of a batch decode
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub total_duration_ms: u128,
}

impl BatchSummary {
    fn from_results(results: &[DecodedFile], total_duration_ms: u128) -> Self {
        let successful_files = results.iter().filter(|r| r.document.is_ok()).count();
        Self {
            total_files: results.len(),
            successful_files,
            failed_files: results.len() - successful_files,
            total_duration_ms,
        }
    }

    /// Get throughput (files per second)
    pub fn throughput_files_per_sec(&self) -> f64 {
        if self.total_duration_ms == 0 {
            return 0.0;
        }
        (self.successful_files as f64 / self.total_duration_ms as f64) * 1000.0
    }

    pub fn is_fully_successful(&self) -> bool {
        self.failed_files == 0
    }

    pub fn to_string_pretty(&self) -> String {
        format!(
            "Batch Decode Summary\n  \
             Total Files: {}\n  \
             Successful: {}\n  \
             Failed: {}\n  \
             Total Time: {:.2}s\n  \
             Throughput: {:.2} files/sec",
            self.total_files,
            self.successful_files,
            self.failed_files,
            self.total_duration_ms as f64 / 1000.0,
            self.throughput_files_per_sec()
        )
    }
}

/// Parallel batch decoder
pub struct BatchDecoder {
    pub config: BatchConfig,
    decoder: Box<dyn ActivityDecoder>,
}

impl BatchDecoder {
    pub fn new() -> Self {
        Self::with_config(BatchConfig::default())
    }

    pub fn with_config(config: BatchConfig) -> Self {
        Self::with_decoder(config, Box::new(FitDecoder::new()))
    }

    pub fn with_decoder(config: BatchConfig, decoder: Box<dyn ActivityDecoder>) -> Self {
        Self { config, decoder }
    }

    /// Decode all files, preserving input order in the result
    pub fn decode_files(&self, file_paths: &[PathBuf]) -> anyhow::Result<(Vec<DecodedFile>, BatchSummary)> {
        let start_time = Instant::now();
        info!("Decoding {} files", file_paths.len());

        let progress = self.config.show_progress.then(|| {
            let bar = ProgressBar::new(file_paths.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({msg})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            bar
        });

        let results = match self.config.num_threads {
            Some(num_threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(num_threads)
                    .build()
                    .map_err(|e| anyhow::anyhow!("Failed to create thread pool: {}", e))?;
                pool.install(|| self.decode_parallel(file_paths, progress.as_ref()))
            }
            None => self.decode_parallel(file_paths, progress.as_ref()),
        };

        if let Some(pb) = progress {
            pb.finish_with_message("Complete");
        }

        let summary = BatchSummary::from_results(&results, start_time.elapsed().as_millis());
        info!("{}", summary.to_string_pretty());

        Ok((results, summary))
    }

    fn decode_parallel(&self, file_paths: &[PathBuf], progress: Option<&ProgressBar>) -> Vec<DecodedFile> {
        file_paths
            .par_iter()
            .map(|path| {
                let result = self.decode_one(path);
                if let Some(pb) = progress {
                    pb.set_message(result.file_name.clone());
                    pb.inc(1);
                }
                result
            })
            .collect()
    }

    fn decode_one(&self, path: &Path) -> DecodedFile {
        let file_start = Instant::now();
        let document = self.decoder.decode_file(path);
        let duration_ms = file_start.elapsed().as_millis();

        match &document {
            Ok(doc) => debug!(
                "Decoded {:?} ({} sessions, {} records, {}ms)",
                path,
                doc.sessions.len(),
                doc.record_count(),
                duration_ms
            ),
            Err(e) => warn!("Failed to decode {:?}: {} ({}ms)", path, e, duration_ms),
        }

        DecodedFile {
            file_name: file_name_of(path),
            path: path.to_path_buf(),
            document,
            duration_ms,
        }
    }
}

impl Default for BatchDecoder {
    fn default() -> Self {
        Self::new()
    }
}
