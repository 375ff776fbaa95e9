//! Video records, before and after metric enrichment.

use serde::{Deserialize, Serialize};

/// Duration assumed when the API doesn't report one.
pub const DEFAULT_DURATION: &str = "PT0S";

fn default_duration() -> String {
    DEFAULT_DURATION.to_string()
}

/// Build the public watch URL for a video ID.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// A video as returned by acquisition: identity, raw counters and raw duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawVideo {
    /// Platform video ID
    pub id: String,

    /// Video title
    pub title: String,

    /// Publish timestamp (ISO 8601)
    pub published_at: String,

    /// Watch URL
    pub url: String,

    #[serde(default)]
    pub view_count: u64,

    #[serde(default)]
    pub like_count: u64,

    #[serde(default)]
    pub comment_count: u64,

    /// Compact duration notation, e.g. "PT1H2M10S"
    #[serde(default = "default_duration")]
    pub duration: String,
}

impl RawVideo {
    /// Create a video with zeroed counters and an unknown duration.
    pub fn new(id: impl Into<String>, title: impl Into<String>, published_at: impl Into<String>) -> Self {
        let id = id.into();
        let url = watch_url(&id);
        Self {
            id,
            title: title.into(),
            published_at: published_at.into(),
            url,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            duration: default_duration(),
        }
    }

    /// Builder method to set view/like/comment counters.
    pub fn with_counts(mut self, views: u64, likes: u64, comments: u64) -> Self {
        self.view_count = views;
        self.like_count = likes;
        self.comment_count = comments;
        self
    }

    /// Builder method to set the raw duration.
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Date part of `published_at` ("2024-03-01T10:00:00Z" -> "2024-03-01").
    pub fn published_date(&self) -> &str {
        self.published_at
            .split('T')
            .next()
            .unwrap_or(&self.published_at)
    }
}

/// Metrics derived from a video's raw counters.
///
/// Rates are percentages, already rounded (see [`crate::calculate`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    /// (likes + comments) / views * 100
    pub engagement_rate_views: f64,

    /// (likes + comments) / subscribers * 100
    pub engagement_rate_subscribers: f64,

    /// views / subscribers * 100
    pub view_rate: f64,

    /// likes / views * 100
    pub like_rate: f64,

    /// comments / views * 100
    pub comment_rate: f64,

    /// Parsed duration in seconds
    pub duration_seconds: u64,

    /// views / duration in minutes
    pub views_per_minute: f64,
}

/// A raw video paired with its derived metrics.
///
/// Serializes as one flat record carrying both raw and derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedVideo {
    #[serde(flatten)]
    pub video: RawVideo,

    #[serde(flatten)]
    pub metrics: EngagementMetrics,
}

impl EnrichedVideo {
    pub fn new(video: RawVideo, metrics: EngagementMetrics) -> Self {
        Self { video, metrics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_video_defaults() {
        let video = RawVideo::new("abc123", "First upload", "2024-03-01T10:00:00Z");

        assert_eq!(video.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(video.view_count, 0);
        assert_eq!(video.duration, "PT0S");
    }

    #[test]
    fn test_raw_video_builders() {
        let video = RawVideo::new("abc123", "First upload", "2024-03-01T10:00:00Z")
            .with_counts(1000, 50, 10)
            .with_duration("PT10M");

        assert_eq!(video.view_count, 1000);
        assert_eq!(video.like_count, 50);
        assert_eq!(video.comment_count, 10);
        assert_eq!(video.duration, "PT10M");
    }

    #[test]
    fn test_published_date() {
        let video = RawVideo::new("a", "t", "2024-03-01T10:00:00Z");
        assert_eq!(video.published_date(), "2024-03-01");

        let video = RawVideo::new("a", "t", "2024-03-01");
        assert_eq!(video.published_date(), "2024-03-01");
    }

    #[test]
    fn test_raw_video_missing_counters_default() {
        let json = r#"{"id":"x","title":"t","published_at":"2024-01-01T00:00:00Z","url":"u"}"#;
        let video: RawVideo = serde_json::from_str(json).unwrap();

        assert_eq!(video.view_count, 0);
        assert_eq!(video.like_count, 0);
        assert_eq!(video.comment_count, 0);
        assert_eq!(video.duration, "PT0S");
    }

    #[test]
    fn test_enriched_video_serializes_flat() {
        let enriched = EnrichedVideo::new(
            RawVideo::new("x", "t", "2024-01-01T00:00:00Z").with_counts(10, 1, 0),
            EngagementMetrics {
                engagement_rate_views: 10.0,
                duration_seconds: 60,
                ..Default::default()
            },
        );

        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["view_count"], 10);
        assert_eq!(value["engagement_rate_views"], 10.0);
        assert_eq!(value["duration_seconds"], 60);

        let parsed: EnrichedVideo = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, enriched);
    }
}
