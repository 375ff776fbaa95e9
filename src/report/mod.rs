//! Report generation.
//!
//! Every report is rendered by a pure function over `&[ChannelReport]`;
//! [`ReportWriter`] places them in a timestamped run directory:
//! - CSV of all videos
//! - Per-channel statistics
//! - Cross-channel engagement trends
//! - Best and latest video URL lists
//! - README.md describing the run
//! - `channels.jsonl` with the enriched records

pub mod csv;
pub mod format;
pub mod links;
pub mod readme;
pub mod stats;
pub mod trends;

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::ChannelReport;
use crate::storage::{JsonlWriter, StorageError, RECORDS_FILENAME};

pub use self::csv::render_csv;
pub use links::{render_best_videos, render_latest_videos};
pub use readme::render_readme;
pub use stats::render_channel_stats;
pub use trends::render_engagement_trends;

/// Timestamp format used in run directory and file names.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp format of the "Generated on" report lines.
pub const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors that can occur while writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No channel data to report")]
    NoData,
}

/// A line of `width` copies of `ch`, newline-terminated.
pub(crate) fn rule(ch: char, width: usize) -> String {
    let mut line: String = std::iter::repeat(ch).take(width).collect();
    line.push('\n');
    line
}

/// The first `n` items in descending order of `compare`.
///
/// The sort is stable: equal items keep their input order.
pub(crate) fn top_by<T, F>(items: &[T], n: usize, compare: F) -> Vec<&T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| compare(b, a));
    sorted.truncate(n);
    sorted
}

/// File names of one run, all sharing the run timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFileNames {
    pub timestamp: String,
    pub csv: String,
    pub stats: String,
    pub trends: String,
    pub best: String,
    pub latest: String,
    pub readme: String,
    pub records: String,
}

impl ReportFileNames {
    pub fn new(timestamp: impl Into<String>) -> Self {
        let timestamp = timestamp.into();
        Self {
            csv: format!("youtube_channels_videos_{}.csv", timestamp),
            stats: format!("youtube_channel_stats_{}.txt", timestamp),
            trends: format!("youtube_engagement_trends_{}.txt", timestamp),
            best: format!("youtube_best_videos_{}.txt", timestamp),
            latest: format!("youtube_latest_videos_{}.txt", timestamp),
            readme: "README.md".to_string(),
            records: RECORDS_FILENAME.to_string(),
            timestamp,
        }
    }
}

/// Paths of the files written for one run.
#[derive(Debug, Clone)]
pub struct ReportFiles {
    pub dir: PathBuf,
    pub names: ReportFileNames,
}

impl ReportFiles {
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

/// Writes all reports for a run.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    top_n: usize,
    generated: NaiveDateTime,
}

impl ReportWriter {
    /// Create a writer stamped with the current local time.
    pub fn new(output_dir: impl Into<PathBuf>, top_n: usize) -> Self {
        Self {
            output_dir: output_dir.into(),
            top_n,
            generated: Local::now().naive_local(),
        }
    }

    /// Builder method to fix the generation time.
    pub fn with_generated(mut self, generated: NaiveDateTime) -> Self {
        self.generated = generated;
        self
    }

    /// Run directory: `<output_dir>/<YYYYmmdd_HHMMSS>/`.
    pub fn run_dir(&self) -> PathBuf {
        self.output_dir.join(self.timestamp())
    }

    fn timestamp(&self) -> String {
        self.generated.format(RUN_TIMESTAMP_FORMAT).to_string()
    }

    /// Render and write every report.
    pub fn write_all(&self, channels: &[ChannelReport]) -> Result<ReportFiles, ReportError> {
        if channels.is_empty() {
            warn!("No data to export");
            return Err(ReportError::NoData);
        }

        let dir = self.run_dir();
        fs::create_dir_all(&dir).map_err(|source| ReportError::Io {
            path: dir.clone(),
            source,
        })?;

        let names = ReportFileNames::new(self.timestamp());
        let video_count: usize = channels.iter().map(|c| c.videos.len()).sum();

        write_file(&dir.join(&names.csv), &render_csv(channels))?;
        info!(
            "Exported {} videos from {} channels to {}",
            video_count,
            channels.len(),
            names.csv
        );

        write_file(
            &dir.join(&names.stats),
            &render_channel_stats(channels, self.generated),
        )?;
        info!("Exported channel statistics for {} channels", channels.len());

        write_file(
            &dir.join(&names.trends),
            &render_engagement_trends(channels, self.generated),
        )?;
        info!("Exported engagement trends analysis");

        write_file(
            &dir.join(&names.best),
            &render_best_videos(channels, self.top_n),
        )?;
        write_file(
            &dir.join(&names.latest),
            &render_latest_videos(channels, self.top_n),
        )?;
        info!("Exported top {} best and latest videos", self.top_n);

        write_file(
            &dir.join(&names.readme),
            &render_readme(channels, &names, self.top_n, self.generated),
        )?;

        JsonlWriter::new(dir.join(&names.records)).write_all(channels)?;

        info!("Reports written to {:?}", dir);
        Ok(ReportFiles { dir, names })
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
