//! README.md describing a run directory.

use chrono::NaiveDateTime;

use super::format::count_or_na;
use super::ReportFileNames;
use crate::models::ChannelReport;

const METRICS_TABLE: &str = "\
| Metric | Formula | Interpretation |
|--------|---------|----------------|
| **Engagement Rate (Views)** | `(likes + comments) / views × 100` | Higher = more audience interaction |
| **Engagement Rate (Subscribers)** | `(likes + comments) / subscribers × 100` | Engagement relative to channel size |
| **View Rate** | `views / subscribers × 100` | >100% indicates viral potential |
| **Like Rate** | `likes / views × 100` | Viewer satisfaction indicator |
| **Comment Rate** | `comments / views × 100` | Audience discussion level |
| **Views per Minute** | `views / (duration / 60)` | Content efficiency metric |
";

fn push_section(out: &mut String, file: &str, format: &str, body: &str) {
    out.push_str(&format!("### `{}`\n", file));
    out.push_str(&format!("**Format:** {}\n\n", format));
    out.push_str(body);
    out.push_str("---\n\n");
}

/// Render the README for a run directory.
pub fn render_readme(
    channels: &[ChannelReport],
    names: &ReportFileNames,
    top_n: usize,
    generated: NaiveDateTime,
) -> String {
    let total_channels = channels.len();
    let total_videos: usize = channels.iter().map(|c| c.videos.len()).sum();
    let per_channel = if total_channels > 0 {
        total_videos as f64 / total_channels as f64
    } else {
        0.0
    };

    let mut out = String::new();
    out.push_str(&format!("# YouTube Analysis Report - {}\n\n", names.timestamp));
    out.push_str(&format!(
        "Generated on: {}\n\n",
        generated.format("%Y-%m-%d at %H:%M:%S")
    ));

    out.push_str("## Analysis Summary\n\n");
    out.push_str(&format!("- **Channels Analyzed:** {}\n", total_channels));
    out.push_str(&format!("- **Total Videos:** {}\n", total_videos));
    out.push_str(&format!(
        "- **Average Videos per Channel:** {:.1}\n\n",
        per_channel
    ));

    out.push_str("## Generated Files\n\n");

    push_section(
        &mut out,
        &names.csv,
        "CSV (Comma-Separated Values)",
        "**Description:** Raw data export containing all videos from all analyzed channels with complete metrics.\n\n\
         **Columns:**\n\
         - Channel name and subscriber count\n\
         - Video title, published date, and URL\n\
         - Raw statistics: views, likes, comments, duration (seconds)\n\
         - Calculated metrics: engagement rates, view rate, like rate, comment rate, views per minute\n\n\
         **Use Cases:**\n\
         - Import into Excel/Google Sheets for custom analysis\n\
         - Data visualization with BI tools\n\
         - Further processing with pandas/R\n\n",
    );

    push_section(
        &mut out,
        &names.stats,
        "Plain text report",
        "**Description:** Detailed statistics for each analyzed channel including:\n\n\
         **Per Channel:**\n\
         - Channel metadata (subscribers, total views, total videos)\n\
         - Upload frequency analysis\n\
         - Average engagement metrics across all videos\n\
         - Top 5 most viewed videos\n\
         - Top 5 highest engagement videos\n\
         - Performance distribution (high vs. low performing videos)\n\
         - Recent videos with metrics\n\n\
         **Use Cases:**\n\
         - Quick overview of individual channel performance\n\
         - Identify content patterns and trends\n\
         - Compare channel metrics over time\n\n",
    );

    push_section(
        &mut out,
        &names.trends,
        "Plain text report",
        "**Description:** Cross-channel comparison and trend analysis including:\n\n\
         **Global Analysis:**\n\
         - Aggregate statistics across all channels\n\
         - Channel rankings by engagement rate\n\
         - Channel rankings by view rate\n\
         - Content performance by duration (short vs. medium vs. long videos)\n\
         - Top 10 videos by engagement across all channels\n\
         - Top 5 viral videos (highest view rates)\n\n\
         **Use Cases:**\n\
         - Compare channels against each other\n\
         - Identify industry benchmarks\n\
         - Discover viral content patterns\n\
         - Optimize content strategy based on trends\n\n",
    );

    push_section(
        &mut out,
        &names.best,
        "Plain text (URL list)",
        &format!(
            "**Description:** Top {n} videos with highest engagement rate from each channel.\n\n\
             **Content:**\n\
             - One YouTube URL per line\n\
             - Sorted by engagement rate (descending)\n\
             - Up to {n} videos per channel\n\n\
             **Use Cases:**\n\
             - Quick access to best-performing content\n\
             - Content inspiration and research\n\
             - Batch processing URLs with other tools\n\
             - Create playlists or reference libraries\n\n",
            n = top_n
        ),
    );

    push_section(
        &mut out,
        &names.latest,
        "Plain text (URL list)",
        &format!(
            "**Description:** {n} most recent videos from each channel.\n\n\
             **Content:**\n\
             - One YouTube URL per line\n\
             - Sorted by published date (newest first)\n\
             - Up to {n} videos per channel\n\n\
             **Use Cases:**\n\
             - Track recent content from competitors/peers\n\
             - Identify current content trends\n\
             - Monitor channel activity\n\
             - Research latest topics and formats\n\n",
            n = top_n
        ),
    );

    push_section(
        &mut out,
        &names.records,
        "JSON Lines",
        "**Description:** One JSON object per channel: channel metadata plus every analyzed video with raw counters and calculated metrics.\n\n\
         **Use Cases:**\n\
         - Re-render every report offline with `tube-insights render`\n\
         - Load into other tools without re-querying the API\n\n",
    );

    out.push_str("## Engagement Metrics Explained\n\n");
    out.push_str("All reports include the following calculated metrics:\n\n");
    out.push_str(METRICS_TABLE);
    out.push('\n');

    out.push_str("## Channels Analyzed\n\n");
    for (i, report) in channels.iter().enumerate() {
        out.push_str(&format!(
            "{}. **{}** - {} subscribers ({} videos analyzed)\n",
            i + 1,
            report.channel.title,
            count_or_na(report.channel.subscriber_count),
            report.videos.len()
        ));
    }

    out.push_str("\n---\n\n");
    out.push_str("*Generated by tube-insights*\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelInfo, EngagementMetrics, EnrichedVideo, RawVideo};
    use chrono::NaiveDate;

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
    }

    #[test]
    fn test_render_readme() {
        let video = EnrichedVideo::new(
            RawVideo::new("a", "A", "2024-01-01T00:00:00Z"),
            EngagementMetrics::default(),
        );
        let channels = vec![
            ChannelReport::new(
                ChannelInfo::new("UC1", "Alpha").with_subscribers(1_500_000),
                vec![video.clone(), video.clone()],
            ),
            ChannelReport::new(ChannelInfo::new("UC2", "Beta"), vec![video]),
        ];
        let names = ReportFileNames::new("20240310_090500");

        let readme = render_readme(&channels, &names, 15, generated());

        assert!(readme.starts_with(
            "# YouTube Analysis Report - 20240310_090500\n\nGenerated on: 2024-03-10 at 09:05:00\n\n"
        ));
        assert!(readme.contains("- **Channels Analyzed:** 2\n"));
        assert!(readme.contains("- **Total Videos:** 3\n"));
        assert!(readme.contains("- **Average Videos per Channel:** 1.5\n"));
        assert!(readme.contains("### `youtube_channels_videos_20240310_090500.csv`\n"));
        assert!(readme.contains("### `youtube_latest_videos_20240310_090500.txt`\n"));
        assert!(readme.contains("### `channels.jsonl`\n"));
        assert!(readme.contains("- Up to 15 videos per channel\n"));
        assert!(readme.contains("1. **Alpha** - 1,500,000 subscribers (2 videos analyzed)\n"));
        assert!(readme.contains("2. **Beta** - N/A subscribers (1 videos analyzed)\n"));
        assert!(readme.ends_with("\n---\n\n*Generated by tube-insights*\n"));
    }

    #[test]
    fn test_render_readme_empty() {
        let names = ReportFileNames::new("20240310_090500");
        let readme = render_readme(&[], &names, 15, generated());

        assert!(readme.contains("- **Average Videos per Channel:** 0.0\n"));
    }
}
