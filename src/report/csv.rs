//! Flat CSV export: one row per video.

use super::format::decimal;
use crate::models::ChannelReport;

pub const HEADER: [&str; 15] = [
    "Channel",
    "Subscribers",
    "Video Title",
    "Published Date",
    "Video URL",
    "Views",
    "Likes",
    "Comments",
    "Duration (seconds)",
    "Engagement Rate (Views %)",
    "Engagement Rate (Subscribers %)",
    "View Rate (%)",
    "Like Rate (%)",
    "Comment Rate (%)",
    "Views per Minute",
];

const LINE_END: &str = "\r\n";

/// Quote a field when it contains a delimiter, quote or line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let row: Vec<String> = fields.iter().map(|f| escape(f.as_ref())).collect();
    out.push_str(&row.join(","));
    out.push_str(LINE_END);
}

/// Render all videos of all channels as CSV.
pub fn render_csv(channels: &[ChannelReport]) -> String {
    let mut out = String::new();
    push_row(&mut out, &HEADER);

    for report in channels {
        let subscribers = report
            .channel
            .subscriber_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        for enriched in &report.videos {
            let video = &enriched.video;
            let metrics = &enriched.metrics;
            push_row(
                &mut out,
                &[
                    report.channel.title.clone(),
                    subscribers.clone(),
                    video.title.clone(),
                    video.published_at.clone(),
                    video.url.clone(),
                    video.view_count.to_string(),
                    video.like_count.to_string(),
                    video.comment_count.to_string(),
                    metrics.duration_seconds.to_string(),
                    decimal(metrics.engagement_rate_views),
                    decimal(metrics.engagement_rate_subscribers),
                    decimal(metrics.view_rate),
                    decimal(metrics.like_rate),
                    decimal(metrics.comment_rate),
                    decimal(metrics.views_per_minute),
                ],
            );
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

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a, b"), "\"a, b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_render_csv() {
        let videos = vec![RawVideo::new("abc", "Hello, world", "2024-03-01T10:00:00Z")
            .with_counts(1000, 50, 10)
            .with_duration("PT10M0S")];
        let channels = vec![
            ChannelReport::new(
                ChannelInfo::new("UC1", "Chan").with_subscribers(10_000),
                enrich(&videos, 10_000),
            ),
            ChannelReport::new(ChannelInfo::new("UC2", "Hidden"), enrich(&videos, 0)),
        ];

        let csv = render_csv(&channels);
        let lines: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(lines[0], HEADER.join(","));
        assert_eq!(
            lines[1],
            "Chan,10000,\"Hello, world\",2024-03-01T10:00:00Z,https://www.youtube.com/watch?v=abc,\
             1000,50,10,600,6.0,0.6,10.0,5.0,1.0,100.0"
        );
        assert!(lines[2].starts_with("Hidden,N/A,"));
        assert!(lines[2].ends_with(",6.0,0.0,0.0,5.0,1.0,100.0"));
        assert_eq!(lines[3], "");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_render_csv_header_only() {
        let csv = render_csv(&[]);
        assert_eq!(csv, format!("{}\r\n", HEADER.join(",")));
    }
}
