use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tube_insights::analyze::Analyzer;
use tube_insights::config::{AppConfig, ChannelList};
use tube_insights::models::ChannelReport;
use tube_insights::report::{ReportFiles, ReportWriter};
use tube_insights::storage::load_channel_reports;
use tube_insights::transcript::TranscriptDownloader;
use tube_insights::youtube::YouTubeClient;

#[derive(Parser)]
#[command(name = "tube-insights")]
#[command(about = "YouTube channel engagement analyzer and transcript downloader")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze channels and generate reports
    Channels {
        /// Max videos per channel
        #[arg(long)]
        max_results: Option<usize>,

        /// Base output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Channel list (TOML with [[channel]] entries)
        #[arg(long)]
        channels_file: Option<PathBuf>,
    },

    /// Download a video transcript
    Video {
        /// YouTube video ID (default: VIDEO_ID env var, then config)
        video_id: Option<String>,

        /// Preferred languages, comma separated (e.g. en,es)
        #[arg(long)]
        langs: Option<String>,

        /// Output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Re-render all reports from a previous run's channels.jsonl
    Render {
        /// channels.jsonl file or the run directory holding it
        #[arg(long)]
        input: PathBuf,

        /// Base output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting tube-insights v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Channels {
            max_results,
            output_dir,
            channels_file,
        } => {
            run_channels(config, max_results, output_dir, channels_file).await?;
        }
        Commands::Video {
            video_id,
            langs,
            output_dir,
        } => {
            run_video(config, video_id, langs, output_dir).await?;
        }
        Commands::Render { input, output_dir } => {
            let channels = load_channel_reports(&input)
                .with_context(|| format!("Failed to read records from {}", input.display()))?;
            tracing::info!("Loaded {} channels from {}", channels.len(), input.display());

            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            let files = write_reports(&channels, &output_dir, config.report.top_n)?;
            print_file_list(&files);
        }
    }

    Ok(())
}

async fn run_channels(
    config: AppConfig,
    max_results: Option<usize>,
    output_dir: Option<PathBuf>,
    channels_file: Option<PathBuf>,
) -> Result<()> {
    let channels_file = channels_file.unwrap_or_else(|| config.channels_file.clone());
    let specs = ChannelList::load(&channels_file)
        .with_context(|| format!("Failed to load channels from {}", channels_file.display()))?;

    let max_results = max_results.unwrap_or(config.max_results_per_channel);
    if max_results == 0 {
        bail!("--max-results must be greater than 0");
    }
    let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());

    let client = YouTubeClient::from_config(&config)?;

    println!("Validating YouTube API key...");
    client
        .validate_api_key()
        .await
        .context("API validation error")?;
    println!("API key validated successfully.");

    println!(
        "\nAnalyzing {} channels (max {} videos each)...",
        specs.len(),
        max_results
    );

    let analyzer = Analyzer::new(Arc::new(client));
    let run = analyzer.analyze(&specs, max_results).await;

    if !run.failures.is_empty() {
        println!("\nFailed to retrieve {} channels:", run.failures.len());
        for failure in &run.failures {
            println!("  - {}: {}", failure.spec, failure.error);
        }
    }

    if run.channels.is_empty() {
        println!("No channel data retrieved. Exiting.");
        return Ok(());
    }

    tracing::info!(
        "Analyzed {} videos from {} channels in {:?}",
        run.video_count(),
        run.channels.len(),
        run.duration
    );

    let files = write_reports(&run.channels, &output_dir, config.report.top_n)?;
    print_sample(&run.channels);
    print_file_list(&files);

    Ok(())
}

async fn run_video(
    config: AppConfig,
    video_id: Option<String>,
    langs: Option<String>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let video_id = video_id.unwrap_or_else(|| config.default_video_id.clone());
    let languages: Vec<String> = langs
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(String::from)
        .collect();
    let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());

    let downloader = TranscriptDownloader::new(
        &config.transcript,
        Duration::from_secs(config.request_timeout_seconds),
    )?
    .with_languages(languages);

    println!("Downloading transcript for video: {}", video_id);
    println!("Preferred languages: {:?}", downloader.languages());

    let path = downloader
        .save(&video_id, &output_dir)
        .await
        .with_context(|| format!("Failed to download transcript for {}", video_id))?;

    println!("Transcript saved to {}", path.display());
    Ok(())
}

fn write_reports(channels: &[ChannelReport], output_dir: &Path, top_n: usize) -> Result<ReportFiles> {
    let writer = ReportWriter::new(output_dir, top_n);
    println!("Output will be saved to: {}", writer.run_dir().display());

    writer
        .write_all(channels)
        .with_context(|| format!("Failed to write reports under {}", output_dir.display()))
}

fn print_sample(channels: &[ChannelReport]) {
    println!("\nSample results:");
    for report in channels.iter().take(3) {
        let subscribers = report
            .channel
            .subscriber_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        println!("\n{} (Subscribers: {})", report.channel.title, subscribers);
        println!("Recent videos:");

        for (i, enriched) in report.videos.iter().take(3).enumerate() {
            println!(
                "  {}. {} - {}",
                i + 1,
                enriched.video.title,
                enriched.video.published_date()
            );
            println!(
                "     Views: {} | Engagement: {:.3}%",
                tube_insights::report::format::thousands(enriched.video.view_count),
                enriched.metrics.engagement_rate_views
            );
        }
    }
}

fn print_file_list(files: &ReportFiles) {
    let names = &files.names;
    println!("\nReports generated in {}:", files.dir.display());
    println!("  - README.md (explains all files)");
    println!("  - CSV: {}", names.csv);
    println!("  - Channel stats: {}", names.stats);
    println!("  - Engagement trends: {}", names.trends);
    println!("  - Best videos: {}", names.best);
    println!("  - Latest videos: {}", names.latest);
    println!("  - Enriched records: {}", names.records);
}
