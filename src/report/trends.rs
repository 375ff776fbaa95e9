//! Cross-channel engagement trends report.

use chrono::NaiveDateTime;

use super::format::{clip, thousands, thousands_rounded};
use super::{rule, top_by, GENERATED_FORMAT};
use crate::calculate::average;
use crate::config::{MEDIUM_VIDEO_MAX, SHORT_VIDEO_MAX};
use crate::models::{ChannelReport, EnrichedVideo};

/// Runtime bucket a video falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBucket {
    Short,
    Medium,
    Long,
}

impl DurationBucket {
    pub fn of(duration_seconds: u64) -> Self {
        if duration_seconds < SHORT_VIDEO_MAX {
            DurationBucket::Short
        } else if duration_seconds < MEDIUM_VIDEO_MAX {
            DurationBucket::Medium
        } else {
            DurationBucket::Long
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DurationBucket::Short => "Short Videos (<5min)",
            DurationBucket::Medium => "Medium Videos (5-15min)",
            DurationBucket::Long => "Long Videos (>15min)",
        }
    }
}

/// Per-channel averages used for the rankings.
#[derive(Debug, Clone)]
struct ChannelSummary<'a> {
    name: &'a str,
    subscribers: u64,
    avg_engagement: f64,
    avg_views: f64,
    avg_view_rate: f64,
}

fn summarize(report: &ChannelReport) -> Option<ChannelSummary<'_>> {
    let videos = &report.videos;
    if videos.is_empty() {
        return None;
    }
    Some(ChannelSummary {
        name: &report.channel.title,
        subscribers: report.channel.subscribers_or_zero(),
        avg_engagement: average(videos, |v| v.metrics.engagement_rate_views),
        avg_views: average(videos, |v| v.video.view_count as f64),
        avg_view_rate: average(videos, |v| v.metrics.view_rate),
    })
}

fn push_global(out: &mut String, videos: &[&EnrichedVideo]) {
    let count = videos.len() as f64;
    let total_views: u64 = videos.iter().map(|v| v.video.view_count).sum();
    let total_likes: u64 = videos.iter().map(|v| v.video.like_count).sum();
    let total_comments: u64 = videos.iter().map(|v| v.video.comment_count).sum();

    out.push_str("GLOBAL STATISTICS ACROSS ALL CHANNELS:\n");
    out.push_str(&rule('-', 50));
    out.push_str(&format!("Total Videos Analyzed: {}\n", thousands(videos.len() as u64)));
    out.push_str(&format!("Total Views: {}\n", thousands(total_views)));
    out.push_str(&format!("Total Likes: {}\n", thousands(total_likes)));
    out.push_str(&format!("Total Comments: {}\n", thousands(total_comments)));
    out.push_str(&format!(
        "Average Views per Video: {}\n",
        thousands_rounded(total_views as f64 / count)
    ));
    out.push_str(&format!(
        "Average Likes per Video: {}\n",
        thousands_rounded(total_likes as f64 / count)
    ));
    out.push_str(&format!(
        "Average Comments per Video: {}\n\n",
        thousands_rounded(total_comments as f64 / count)
    ));
}

fn push_rankings(out: &mut String, channels: &[ChannelReport]) {
    out.push_str("CHANNEL RANKING BY ENGAGEMENT METRICS:\n");
    out.push_str(&rule('-', 50));

    let summaries: Vec<ChannelSummary> = channels.iter().filter_map(summarize).collect();

    out.push_str("BY AVERAGE ENGAGEMENT RATE (Views):\n");
    let by_engagement = top_by(&summaries, 10, |a, b| a.avg_engagement.total_cmp(&b.avg_engagement));
    for (i, channel) in by_engagement.into_iter().enumerate() {
        out.push_str(&format!(
            "{:2}. {:<40} | Engagement: {:6.3}% | Avg Views: {:>8} | Subscribers: {:>8}\n",
            i + 1,
            clip(channel.name, 40),
            channel.avg_engagement,
            thousands_rounded(channel.avg_views),
            thousands(channel.subscribers)
        ));
    }

    out.push_str("\nBY AVERAGE VIEW RATE (Views/Subscribers):\n");
    let by_view_rate = top_by(&summaries, 10, |a, b| a.avg_view_rate.total_cmp(&b.avg_view_rate));
    for (i, channel) in by_view_rate.into_iter().enumerate() {
        out.push_str(&format!(
            "{:2}. {:<40} | View Rate: {:6.2}% | Avg Views: {:>8} | Subscribers: {:>8}\n",
            i + 1,
            clip(channel.name, 40),
            channel.avg_view_rate,
            thousands_rounded(channel.avg_views),
            thousands(channel.subscribers)
        ));
    }
}

fn push_duration_patterns(out: &mut String, videos: &[&EnrichedVideo]) {
    out.push_str("\nCONTENT PERFORMANCE PATTERNS:\n");
    out.push_str(&rule('-', 50));

    for bucket in [DurationBucket::Short, DurationBucket::Medium, DurationBucket::Long] {
        let in_bucket: Vec<f64> = videos
            .iter()
            .filter(|v| DurationBucket::of(v.metrics.duration_seconds) == bucket)
            .map(|v| v.metrics.engagement_rate_views)
            .collect();
        if in_bucket.is_empty() {
            continue;
        }
        let avg = in_bucket.iter().sum::<f64>() / in_bucket.len() as f64;
        out.push_str(&format!(
            "{}: {} videos | Avg Engagement: {:.3}%\n",
            bucket.label(),
            thousands(in_bucket.len() as u64),
            avg
        ));
    }
}

fn push_top_content(out: &mut String, tagged: &[(&str, &EnrichedVideo)]) {
    out.push_str("\nTOP PERFORMING CONTENT ACROSS ALL CHANNELS:\n");
    out.push_str(&rule('-', 50));

    out.push_str("TOP 10 VIDEOS BY ENGAGEMENT RATE:\n");
    let top_engagement = top_by(tagged, 10, |a, b| {
        a.1.metrics
            .engagement_rate_views
            .total_cmp(&b.1.metrics.engagement_rate_views)
    });
    for (i, (channel, video)) in top_engagement.into_iter().enumerate() {
        out.push_str(&format!(
            "{:2}. {} | {}\n",
            i + 1,
            channel,
            clip(&video.video.title, 40)
        ));
        out.push_str(&format!(
            "     Engagement: {:.3}% | Views: {} | Duration: {}s\n",
            video.metrics.engagement_rate_views,
            thousands(video.video.view_count),
            video.metrics.duration_seconds
        ));
    }

    out.push_str("\nTOP 5 VIRAL VIDEOS (High View Rate):\n");
    let viral = top_by(tagged, 5, |a, b| a.1.metrics.view_rate.total_cmp(&b.1.metrics.view_rate));
    for (i, (channel, video)) in viral.into_iter().enumerate() {
        out.push_str(&format!(
            "{}. {} | {}\n",
            i + 1,
            channel,
            clip(&video.video.title, 40)
        ));
        out.push_str(&format!(
            "   View Rate: {:.2}% | Views: {}\n",
            video.metrics.view_rate,
            thousands(video.video.view_count)
        ));
    }
}

/// Render the engagement trends report.
pub fn render_engagement_trends(channels: &[ChannelReport], generated: NaiveDateTime) -> String {
    let mut out = String::new();

    out.push_str(&rule('=', 100));
    out.push_str("YOUTUBE ENGAGEMENT TRENDS ANALYSIS REPORT\n");
    out.push_str(&format!("Generated on: {}\n", generated.format(GENERATED_FORMAT)));
    out.push_str(&rule('=', 100));
    out.push('\n');

    let tagged: Vec<(&str, &EnrichedVideo)> = channels
        .iter()
        .flat_map(|report| {
            report
                .videos
                .iter()
                .map(move |video| (report.channel.title.as_str(), video))
        })
        .collect();

    if tagged.is_empty() {
        out.push_str("No videos found for analysis.\n");
        return out;
    }

    let videos: Vec<&EnrichedVideo> = tagged.iter().map(|(_, video)| *video).collect();

    push_global(&mut out, &videos);
    push_rankings(&mut out, channels);
    push_duration_patterns(&mut out, &videos);
    push_top_content(&mut out, &tagged);

    out.push('\n');
    out.push_str(&rule('=', 100));
    out.push_str("End of Engagement Trends Report\n");
    out.push_str(&rule('=', 100));

    out
}
