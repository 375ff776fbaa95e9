//! YouTube Data API v3 access.
//!
//! `ChannelSource` is the seam between the analyzer and the network:
//! `YouTubeClient` implements it over HTTP, tests implement it in memory.

mod client;
mod types;

pub use client::YouTubeClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ChannelInfo, RawVideo};

/// Errors that can occur while talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YouTube API key required. Set the YOUTUBE_API_KEY environment variable.")]
    MissingApiKey,

    #[error(
        "Invalid YouTube API key. Please check your YOUTUBE_API_KEY.\n\
         Get a valid API key from: https://console.cloud.google.com/apis/credentials"
    )]
    InvalidApiKey,

    #[error(
        "YouTube API key has expired. Please generate a new key at:\n\
         https://console.cloud.google.com/apis/credentials"
    )]
    ApiKeyExpired,

    #[error(
        "YouTube API quota exceeded. Your daily quota limit has been reached.\n\
         Quota resets at midnight Pacific Time. Try again later or request quota increase."
    )]
    QuotaExceeded,

    #[error(
        "YouTube Data API v3 is not enabled for this API key.\n\
         Enable it at: https://console.cloud.google.com/apis/library/youtube.googleapis.com"
    )]
    AccessNotConfigured,

    #[error("API request rejected: {0}")]
    BadRequest(String),

    #[error("API access forbidden: {0}")]
    Forbidden(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("No channel found with {0}")]
    ChannelNotFound(String),

    #[error("Channel {0} has no uploads playlist")]
    NoUploadsPlaylist(String),

    #[error("Must provide channel_id, username, or custom_url")]
    NoIdentifier,
}

impl ApiError {
    /// Map a failed response to a specific error.
    ///
    /// Key and quota problems are recognised from the response body, the
    /// same way for every endpoint.
    pub fn from_response(status: u16, body: &str) -> Self {
        let lower = body.to_lowercase();
        match status {
            400 if body.contains("API key expired") => ApiError::ApiKeyExpired,
            400 if body.contains("API key not valid") || lower.contains("keyinvalid") => {
                ApiError::InvalidApiKey
            }
            400 => ApiError::BadRequest(summarize_body(body)),
            403 if body.contains("quotaExceeded") => ApiError::QuotaExceeded,
            403 if body.contains("accessNotConfigured") => ApiError::AccessNotConfigured,
            403 => ApiError::Forbidden(summarize_body(body)),
            _ => ApiError::HttpStatus {
                status,
                message: summarize_body(body),
            },
        }
    }
}

/// Prefer the API's own error message, fall back to a body preview.
fn summarize_body(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.chars().take(300).collect())
}

/// Source of channel and video data.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    /// Resolve a channel ID from a legacy username.
    async fn channel_id_for_username(&self, username: &str) -> Result<String, ApiError>;

    /// Resolve a channel ID from a handle (leading `@` optional).
    async fn channel_id_for_custom_url(&self, custom_url: &str) -> Result<String, ApiError>;

    /// Fetch channel metadata and statistics.
    async fn channel_info(&self, channel_id: &str) -> Result<ChannelInfo, ApiError>;

    /// Find the playlist holding the channel's uploads.
    async fn uploads_playlist(&self, channel_id: &str) -> Result<String, ApiError>;

    /// List up to `max_results` videos of a playlist, newest first.
    ///
    /// Counters are zero and durations unknown until `video_statistics`.
    async fn playlist_videos(
        &self,
        playlist_id: &str,
        max_results: usize,
    ) -> Result<Vec<RawVideo>, ApiError>;

    /// Fill in counters and durations, preserving order.
    ///
    /// Videos the API no longer returns keep zero counters and "PT0S".
    async fn video_statistics(&self, videos: Vec<RawVideo>) -> Result<Vec<RawVideo>, ApiError>;
}
