//! Filesystem storage for enriched records.
//!
//! Each run directory carries a `channels.jsonl` file, one channel report
//! per line, from which every report can be rendered again offline.

mod jsonl;

pub use jsonl::{JsonlReader, JsonlWriter};

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::ChannelReport;

/// File name of the enriched records inside a run directory.
pub const RECORDS_FILENAME: &str = "channels.jsonl";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Line {line} of {path}: {source}")]
    InvalidLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolve the records file from either the file itself or its run directory.
pub fn records_path(input: &Path) -> PathBuf {
    if input.is_dir() {
        input.join(RECORDS_FILENAME)
    } else {
        input.to_path_buf()
    }
}

/// Load channel reports written by a previous run.
///
/// Any malformed line fails the whole load.
pub fn load_channel_reports(input: &Path) -> Result<Vec<ChannelReport>, StorageError> {
    let path = records_path(input);
    let reader = JsonlReader::new(path.clone());
    if !reader.exists() {
        return Err(StorageError::PathNotFound(path));
    }
    reader.read_strict()
}
