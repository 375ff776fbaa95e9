//! Per-channel statistics report.

use chrono::{DateTime, NaiveDateTime};

use super::format::{count_or_na, ellipsize, thousands, thousands_rounded};
use super::{rule, top_by, GENERATED_FORMAT};
use crate::calculate::average;
use crate::models::{ChannelReport, EnrichedVideo};

/// Uploads per 30 days over the span between two ISO 8601 timestamps.
///
/// `None` for fewer than two videos, unparseable dates or a span under a day.
pub fn upload_frequency(video_count: usize, earliest: &str, latest: &str) -> Option<f64> {
    if video_count < 2 {
        return None;
    }
    let start = DateTime::parse_from_rfc3339(earliest).ok()?;
    let end = DateTime::parse_from_rfc3339(latest).ok()?;
    let days = (end - start).num_days();
    if days > 0 {
        Some(video_count as f64 / days as f64 * 30.0)
    } else {
        None
    }
}

fn push_video_line(out: &mut String, rank: usize, video: &EnrichedVideo) {
    out.push_str(&format!("{}. {}\n", rank, ellipsize(&video.video.title, 60)));
    out.push_str(&format!(
        "   Views: {} | Engagement: {:.3}%\n",
        thousands(video.video.view_count),
        video.metrics.engagement_rate_views
    ));
}

fn push_engagement_analysis(out: &mut String, videos: &[EnrichedVideo]) {
    let count = videos.len() as f64;
    let total_views: u64 = videos.iter().map(|v| v.video.view_count).sum();
    let total_likes: u64 = videos.iter().map(|v| v.video.like_count).sum();
    let total_comments: u64 = videos.iter().map(|v| v.video.comment_count).sum();
    let avg_engagement = average(videos, |v| v.metrics.engagement_rate_views);

    out.push_str(&format!(
        "Average Views per Video: {}\n",
        thousands_rounded(total_views as f64 / count)
    ));
    out.push_str(&format!(
        "Average Likes per Video: {}\n",
        thousands_rounded(total_likes as f64 / count)
    ));
    out.push_str(&format!(
        "Average Comments per Video: {}\n",
        thousands_rounded(total_comments as f64 / count)
    ));
    out.push_str(&format!(
        "Average Engagement Rate (by Views): {:.3}%\n",
        avg_engagement
    ));
    out.push_str(&format!(
        "Average Engagement Rate (by Subscribers): {:.3}%\n",
        average(videos, |v| v.metrics.engagement_rate_subscribers)
    ));
    out.push_str(&format!(
        "Average View Rate: {:.2}%\n",
        average(videos, |v| v.metrics.view_rate)
    ));
    out.push_str(&format!(
        "Average Like Rate: {:.3}%\n",
        average(videos, |v| v.metrics.like_rate)
    ));
    out.push_str(&format!(
        "Average Comment Rate: {:.3}%\n",
        average(videos, |v| v.metrics.comment_rate)
    ));

    out.push_str("\nTOP 5 MOST VIEWED VIDEOS:\n");
    let top_viewed = top_by(videos, 5, |a, b| a.video.view_count.cmp(&b.video.view_count));
    for (i, video) in top_viewed.into_iter().enumerate() {
        push_video_line(out, i + 1, video);
    }

    out.push_str("\nTOP 5 HIGHEST ENGAGEMENT VIDEOS:\n");
    let top_engaged = top_by(videos, 5, |a, b| {
        a.metrics
            .engagement_rate_views
            .total_cmp(&b.metrics.engagement_rate_views)
    });
    for (i, video) in top_engaged.into_iter().enumerate() {
        push_video_line(out, i + 1, video);
    }

    let high = videos
        .iter()
        .filter(|v| v.metrics.engagement_rate_views > avg_engagement * 1.5)
        .count();
    let low = videos
        .iter()
        .filter(|v| v.metrics.engagement_rate_views < avg_engagement * 0.5)
        .count();

    out.push_str("\nPERFORMANCE DISTRIBUTION:\n");
    out.push_str(&format!(
        "High Performing Videos (>1.5x avg engagement): {} ({:.1}%)\n",
        high,
        high as f64 / count * 100.0
    ));
    out.push_str(&format!(
        "Low Performing Videos (<0.5x avg engagement): {} ({:.1}%)\n",
        low,
        low as f64 / count * 100.0
    ));
}

fn push_channel(out: &mut String, report: &ChannelReport) {
    let info = &report.channel;
    let videos = &report.videos;

    out.push_str(&rule('-', 80));
    out.push_str(&format!("CHANNEL: {}\n", info.title));
    out.push_str(&rule('-', 80));
    out.push_str(&format!("URL: {}\n", info.url));
    out.push_str(&format!("Subscribers: {}\n", count_or_na(info.subscriber_count)));
    out.push_str(&format!("Total Views: {}\n", count_or_na(info.view_count)));
    out.push_str(&format!("Total Videos: {}\n", count_or_na(info.video_count)));
    out.push_str(&format!("Description: {}\n\n", ellipsize(&info.description, 100)));

    out.push_str(&format!("ANALYZED VIDEOS: {}\n", videos.len()));
    let earliest = videos.iter().map(|v| v.video.published_at.as_str()).min();
    let latest = videos.iter().map(|v| v.video.published_at.as_str()).max();
    if let (Some(earliest), Some(latest)) = (earliest, latest) {
        out.push_str(&format!("Earliest Video Date: {}\n", date_part(earliest)));
        out.push_str(&format!("Latest Video Date: {}\n", date_part(latest)));
        if let Some(per_month) = upload_frequency(videos.len(), earliest, latest) {
            out.push_str(&format!(
                "Estimated Upload Frequency: {:.1} videos per month\n",
                per_month
            ));
        }
    }

    out.push_str("\nENGAGEMENT METRICS ANALYSIS:\n");
    if !videos.is_empty() {
        push_engagement_analysis(out, videos);
    }

    out.push_str("\nRECENT VIDEOS WITH METRICS:\n");
    let recent = top_by(videos, 5, |a, b| a.video.published_at.cmp(&b.video.published_at));
    for (i, video) in recent.into_iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({})\n",
            i + 1,
            ellipsize(&video.video.title, 50),
            video.video.published_date()
        ));
        out.push_str(&format!(
            "   Views: {} | Engagement: {:.3}% | Duration: {}s\n",
            thousands(video.video.view_count),
            video.metrics.engagement_rate_views,
            video.metrics.duration_seconds
        ));
    }

    out.push_str("\n\n");
}

fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}

/// Render the channel statistics report.
pub fn render_channel_stats(channels: &[ChannelReport], generated: NaiveDateTime) -> String {
    let mut out = String::new();

    out.push_str(&rule('=', 80));
    out.push_str("YOUTUBE CHANNEL STATISTICS REPORT\n");
    out.push_str(&format!("Generated on: {}\n", generated.format(GENERATED_FORMAT)));
    out.push_str(&rule('=', 80));
    out.push('\n');

    for report in channels {
        push_channel(&mut out, report);
    }

    out.push_str(&rule('=', 80));
    out.push_str(&format!(
        "End of Report - {} channels analyzed\n",
        channels.len()
    ));
    out.push_str(&rule('=', 80));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::enrich;
    use crate::models::{ChannelInfo, RawVideo};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_upload_frequency() {
        // 3 videos over 30 days -> 3 per month
        let freq = upload_frequency(3, "2024-01-01T00:00:00Z", "2024-01-31T00:00:00Z");
        assert_eq!(freq, Some(3.0));

        assert_eq!(upload_frequency(1, "2024-01-01T00:00:00Z", "2024-02-01T00:00:00Z"), None);
        assert_eq!(upload_frequency(2, "2024-01-01T00:00:00Z", "2024-01-01T20:00:00Z"), None);
        assert_eq!(upload_frequency(2, "not a date", "2024-01-01T00:00:00Z"), None);
    }

    #[test]
    fn test_render_channel_stats() {
        let videos = vec![
            RawVideo::new("a", "Newest", "2024-03-01T10:00:00Z")
                .with_counts(1000, 50, 10)
                .with_duration("PT10M"),
            RawVideo::new("b", "Oldest", "2024-01-31T10:00:00Z")
                .with_counts(3000, 30, 0)
                .with_duration("PT1M"),
        ];
        let mut info = ChannelInfo::new("UC1", "Test Channel").with_subscribers(10_000);
        info.view_count = Some(1_234_567);
        info.description = "About us".to_string();
        let channels = vec![ChannelReport::new(info, enrich(&videos, 10_000))];

        let expected = "\
================================================================================
YOUTUBE CHANNEL STATISTICS REPORT
Generated on: 2024-03-10 12:30:00
================================================================================

--------------------------------------------------------------------------------
CHANNEL: Test Channel
--------------------------------------------------------------------------------
URL: https://www.youtube.com/channel/UC1
Subscribers: 10,000
Total Views: 1,234,567
Total Videos: N/A
Description: About us

ANALYZED VIDEOS: 2
Earliest Video Date: 2024-01-31
Latest Video Date: 2024-03-01
Estimated Upload Frequency: 2.0 videos per month

ENGAGEMENT METRICS ANALYSIS:
Average Views per Video: 2,000
Average Likes per Video: 40
Average Comments per Video: 5
Average Engagement Rate (by Views): 3.500%
Average Engagement Rate (by Subscribers): 0.450%
Average View Rate: 20.00%
Average Like Rate: 3.000%
Average Comment Rate: 0.500%

TOP 5 MOST VIEWED VIDEOS:
1. Oldest
   Views: 3,000 | Engagement: 1.000%
2. Newest
   Views: 1,000 | Engagement: 6.000%

TOP 5 HIGHEST ENGAGEMENT VIDEOS:
1. Newest
   Views: 1,000 | Engagement: 6.000%
2. Oldest
   Views: 3,000 | Engagement: 1.000%

PERFORMANCE DISTRIBUTION:
High Performing Videos (>1.5x avg engagement): 1 (50.0%)
Low Performing Videos (<0.5x avg engagement): 1 (50.0%)

RECENT VIDEOS WITH METRICS:
1. Newest (2024-03-01)
   Views: 1,000 | Engagement: 6.000% | Duration: 600s
2. Oldest (2024-01-31)
   Views: 3,000 | Engagement: 1.000% | Duration: 60s


================================================================================
End of Report - 1 channels analyzed
================================================================================
";

        assert_eq!(render_channel_stats(&channels, generated()), expected);
    }

    #[test]
    fn test_render_channel_without_videos() {
        let channels = vec![ChannelReport::new(ChannelInfo::new("UC2", "Empty"), Vec::new())];
        let text = render_channel_stats(&channels, generated());

        assert!(text.contains("ANALYZED VIDEOS: 0\n\nENGAGEMENT METRICS ANALYSIS:\n\nRECENT VIDEOS WITH METRICS:\n"));
        assert!(!text.contains("Earliest Video Date"));
        assert!(!text.contains("Average Views"));
    }

    #[test]
    fn test_long_titles_truncated() {
        let title = "x".repeat(70);
        let videos = vec![RawVideo::new("a", title, "2024-03-01T10:00:00Z")];
        let channels = vec![ChannelReport::new(ChannelInfo::new("UC1", "C"), enrich(&videos, 0))];
        let text = render_channel_stats(&channels, generated());

        assert!(text.contains(&format!("1. {}...\n", "x".repeat(60))));
        assert!(text.contains(&format!("1. {}... (2024-03-01)\n", "x".repeat(50))));
    }
}
