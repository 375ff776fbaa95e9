//! Engagement metrics engine.
//!
//! Derives per-video ratios from raw counters and the channel's subscriber
//! count:
//! - Engagement rate against views and against subscribers
//! - View, like and comment rates
//! - Views per minute of runtime
//!
//! Every ratio is guarded: a zero denominator yields 0, never NaN.
//! Rounding is round-half-to-even on the scaled value.

use crate::models::{EngagementMetrics, EnrichedVideo, RawVideo};
use crate::parse_duration;

/// Decimal places for rates against views and for engagement rates.
pub const RATE_PRECISION: i32 = 3;

/// Decimal places for the view rate and views per minute.
pub const COARSE_PRECISION: i32 = 2;

/// Round `value` to `places` decimals, ties to even.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

/// Calculate `numerator / denominator` as a percentage.
pub fn percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// Calculate views per minute of runtime.
pub fn views_per_minute(views: u64, duration_seconds: u64) -> f64 {
    if duration_seconds == 0 {
        0.0
    } else {
        views as f64 / (duration_seconds as f64 / 60.0)
    }
}

/// Calculate the derived metrics for a single video.
pub fn calculate_metrics(video: &RawVideo, subscriber_count: u64) -> EngagementMetrics {
    let views = video.view_count;
    let interactions = video.like_count.saturating_add(video.comment_count);
    let duration_seconds = parse_duration(&video.duration);

    EngagementMetrics {
        engagement_rate_views: round_to(percentage(interactions, views), RATE_PRECISION),
        engagement_rate_subscribers: round_to(
            percentage(interactions, subscriber_count),
            RATE_PRECISION,
        ),
        view_rate: round_to(percentage(views, subscriber_count), COARSE_PRECISION),
        like_rate: round_to(percentage(video.like_count, views), RATE_PRECISION),
        comment_rate: round_to(percentage(video.comment_count, views), RATE_PRECISION),
        duration_seconds,
        views_per_minute: round_to(views_per_minute(views, duration_seconds), COARSE_PRECISION),
    }
}

/// Enrich a channel's videos with engagement metrics.
///
/// Output has the same length and order as `videos`; inputs are untouched.
pub fn enrich(videos: &[RawVideo], subscriber_count: u64) -> Vec<EnrichedVideo> {
    videos
        .iter()
        .map(|video| EnrichedVideo::new(video.clone(), calculate_metrics(video, subscriber_count)))
        .collect()
}

/// Mean of a metric over a slice of videos (0 for an empty slice).
pub fn average<F>(videos: &[EnrichedVideo], metric: F) -> f64
where
    F: Fn(&EnrichedVideo) -> f64,
{
    if videos.is_empty() {
        0.0
    } else {
        videos.iter().map(metric).sum::<f64>() / videos.len() as f64
    }
}
