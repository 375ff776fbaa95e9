//! Plain URL lists: best and latest videos per channel.

use super::top_by;
use crate::models::ChannelReport;

/// Top `top_n` video URLs per channel by engagement rate, one per line.
pub fn render_best_videos(channels: &[ChannelReport], top_n: usize) -> String {
    let mut out = String::new();
    for report in channels {
        let best = top_by(&report.videos, top_n, |a, b| {
            a.metrics
                .engagement_rate_views
                .total_cmp(&b.metrics.engagement_rate_views)
        });
        for video in best {
            out.push_str(&video.video.url);
            out.push('\n');
        }
    }
    out
}

/// Most recent `top_n` video URLs per channel, one per line.
pub fn render_latest_videos(channels: &[ChannelReport], top_n: usize) -> String {
    let mut out = String::new();
    for report in channels {
        let latest = top_by(&report.videos, top_n, |a, b| {
            a.video.published_at.cmp(&b.video.published_at)
        });
        for video in latest {
            out.push_str(&video.video.url);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::enrich;
    use crate::models::{ChannelInfo, RawVideo};
    use pretty_assertions::assert_eq;

    fn channels() -> Vec<ChannelReport> {
        let first = vec![
            RawVideo::new("a1", "A1", "2024-01-01T00:00:00Z").with_counts(100, 1, 0),
            RawVideo::new("a2", "A2", "2024-03-01T00:00:00Z").with_counts(100, 5, 0),
            RawVideo::new("a3", "A3", "2024-02-01T00:00:00Z").with_counts(100, 1, 0),
        ];
        let second = vec![RawVideo::new("b1", "B1", "2024-01-15T00:00:00Z").with_counts(10, 1, 0)];

        vec![
            ChannelReport::new(ChannelInfo::new("UC1", "One"), enrich(&first, 0)),
            ChannelReport::new(ChannelInfo::new("UC2", "Two"), enrich(&second, 0)),
            ChannelReport::new(ChannelInfo::new("UC3", "Empty"), Vec::new()),
        ]
    }

    #[test]
    fn test_best_videos_ties_keep_order() {
        let expected = "\
https://www.youtube.com/watch?v=a2
https://www.youtube.com/watch?v=a1
https://www.youtube.com/watch?v=a3
https://www.youtube.com/watch?v=b1
";
        assert_eq!(render_best_videos(&channels(), 15), expected);
    }

    #[test]
    fn test_latest_videos_limited() {
        let expected = "\
https://www.youtube.com/watch?v=a2
https://www.youtube.com/watch?v=a3
https://www.youtube.com/watch?v=b1
";
        assert_eq!(render_latest_videos(&channels(), 2), expected);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render_best_videos(&[], 15), "");
    }
}
