//! Channel analysis orchestrator.
//!
//! Drives a [`ChannelSource`] over a list of channels:
//! 1. Resolve each channel's ID
//! 2. Fetch channel info and the uploads playlist
//! 3. List recent uploads and fill in their statistics
//! 4. Enrich every video with engagement metrics
//!
//! A channel that fails is recorded and skipped; the run carries on.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::calculate::enrich;
use crate::models::{ChannelInfo, ChannelReport, ChannelSpec, RawVideo};
use crate::youtube::{ApiError, ChannelSource};

/// A channel that could not be analyzed.
#[derive(Debug, Clone)]
pub struct ChannelFailure {
    pub spec: ChannelSpec,
    pub error: String,
}

/// Result of an analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    /// Successfully analyzed channels, in input order
    pub channels: Vec<ChannelReport>,
    pub failures: Vec<ChannelFailure>,
    pub duration: Duration,
}

impl AnalysisRun {
    /// Total number of videos across all analyzed channels.
    pub fn video_count(&self) -> usize {
        self.channels.iter().map(|c| c.videos.len()).sum()
    }
}

/// Channel analyzer.
pub struct Analyzer {
    source: Arc<dyn ChannelSource>,
}

impl Analyzer {
    /// Create a new analyzer over a data source.
    pub fn new(source: Arc<dyn ChannelSource>) -> Self {
        Self { source }
    }

    /// Resolve a channel ID: explicit ID, then username, then custom URL.
    pub async fn resolve_channel_id(&self, spec: &ChannelSpec) -> Result<String, ApiError> {
        if let Some(id) = non_blank(&spec.channel_id) {
            return Ok(id.to_string());
        }
        if let Some(username) = non_blank(&spec.username) {
            return self.source.channel_id_for_username(username).await;
        }
        if let Some(custom_url) = non_blank(&spec.custom_url) {
            return self.source.channel_id_for_custom_url(custom_url).await;
        }
        Err(ApiError::NoIdentifier)
    }

    /// Fetch channel info and up to `max_results` of its most recent uploads.
    pub async fn channel_videos(
        &self,
        spec: &ChannelSpec,
        max_results: usize,
    ) -> Result<(ChannelInfo, Vec<RawVideo>), ApiError> {
        let channel_id = self.resolve_channel_id(spec).await?;
        debug!("Resolved {} to {}", spec, channel_id);

        let info = self.source.channel_info(&channel_id).await?;
        let playlist = self.source.uploads_playlist(&channel_id).await?;
        let videos = self.source.playlist_videos(&playlist, max_results).await?;

        if videos.is_empty() {
            return Ok((info, videos));
        }

        let videos = self.source.video_statistics(videos).await?;
        Ok((info, videos))
    }

    /// Analyze a list of channels.
    pub async fn analyze(&self, specs: &[ChannelSpec], max_results: usize) -> AnalysisRun {
        let start = Instant::now();
        let mut channels = Vec::with_capacity(specs.len());
        let mut failures = Vec::new();

        for spec in specs {
            match self.channel_videos(spec, max_results).await {
                Ok((info, videos)) => {
                    let enriched = enrich(&videos, info.subscribers_or_zero());
                    info!("Retrieved {} videos from {}", enriched.len(), info.title);
                    channels.push(ChannelReport::new(info, enriched));
                }
                Err(e) => {
                    warn!("Error retrieving channel {}: {}", spec, e);
                    failures.push(ChannelFailure {
                        spec: spec.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if !failures.is_empty() {
            warn!("Failed to retrieve {} channels", failures.len());
        }

        AnalysisRun {
            channels,
            failures,
            duration: start.elapsed(),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
