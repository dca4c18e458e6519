use crate::error::DecodeError;
use crate::models::ActivityDocument;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub mod fit;
pub mod parallel;

/// Trait for decoding activity documents from different file formats
pub trait ActivityDecoder: Send + Sync {
    /// Check if this decoder can handle the given file
    fn can_decode(&self, file_path: &Path) -> bool;

    /// Decode one file into an activity document
    fn decode_file(&self, file_path: &Path) -> std::result::Result<ActivityDocument, DecodeError>;

    /// Get the format name for this decoder
    fn format_name(&self) -> &'static str;
}

/// Display name of an input file
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Expand directories into the decodable files they contain (sorted by
/// name); plain file arguments are kept as given, in order.
pub fn collect_activity_files(
    inputs: &[PathBuf],
    decoder: &dyn ActivityDecoder,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in std::fs::read_dir(input)? {
                let path = entry?.path();
                if path.is_file() && decoder.can_decode(&path) {
                    found.push(path);
                }
            }
            found.sort();
            tracing::debug!(
                "Found {} {} files in {}",
                found.len(),
                decoder.format_name(),
                input.display()
            );
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }

    Ok(files)
}
