//! HTTP client for the YouTube Data API v3.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use super::types::{ChannelItem, ListResponse, PlaylistItem, SearchItem, VideoItem};
use super::{ApiError, ChannelSource};
use crate::config::{AppConfig, API_BATCH_SIZE};
use crate::models::{channel_url, ChannelInfo, RawVideo, DEFAULT_DURATION};

/// YouTube Data API client.
pub struct YouTubeClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl YouTubeClient {
    /// Create a new client.
    pub fn new(api_key: String, api_base: &str, timeout: Duration) -> Result<Self, ApiError> {
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("tube-insights/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create a client from application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let api_key = config.api_key.clone().ok_or(ApiError::MissingApiKey)?;
        Self::new(
            api_key,
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// Build the URL for a resource, with the API key appended.
    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let url_str = format!("{}/{}", self.api_base, resource);
        let params = params
            .iter()
            .copied()
            .chain(std::iter::once(("key", self.api_key.as_str())));
        Url::parse_with_params(&url_str, params)
            .map_err(|e| ApiError::InvalidUrl(format!("Bad {} URL: {}", resource, e)))
    }

    /// GET a resource and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(resource, params)?;
        debug!("GET {}", resource);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Check the API key with a minimal call.
    pub async fn validate_api_key(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .get_json("i18nRegions", &[("part", "snippet")])
            .await?;
        Ok(())
    }

    async fn first_channel_item(
        &self,
        part: &str,
        channel_id: &str,
    ) -> Result<ChannelItem, ApiError> {
        let response: ListResponse<ChannelItem> = self
            .get_json("channels", &[("part", part), ("id", channel_id)])
            .await?;

        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::ChannelNotFound(format!("ID: {}", channel_id)))
    }
}

#[async_trait]
impl ChannelSource for YouTubeClient {
    async fn channel_id_for_username(&self, username: &str) -> Result<String, ApiError> {
        let response: ListResponse<ChannelItem> = self
            .get_json("channels", &[("part", "id"), ("forUsername", username)])
            .await?;

        response
            .items
            .into_iter()
            .next()
            .map(|item| item.id)
            .ok_or_else(|| ApiError::ChannelNotFound(format!("username: {}", username)))
    }

    async fn channel_id_for_custom_url(&self, custom_url: &str) -> Result<String, ApiError> {
        let handle = custom_url.strip_prefix('@').unwrap_or(custom_url);

        let response: ListResponse<SearchItem> = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", handle),
                    ("type", "channel"),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        response
            .items
            .into_iter()
            .next()
            .map(|item| item.snippet.channel_id)
            .ok_or_else(|| ApiError::ChannelNotFound(format!("custom URL: @{}", handle)))
    }

    async fn channel_info(&self, channel_id: &str) -> Result<ChannelInfo, ApiError> {
        let item = self
            .first_channel_item("snippet,statistics", channel_id)
            .await?;

        let snippet = item
            .snippet
            .ok_or_else(|| ApiError::ChannelNotFound(format!("ID: {}", channel_id)))?;
        let statistics = item.statistics.unwrap_or_default();

        Ok(ChannelInfo {
            id: channel_id.to_string(),
            title: snippet.title,
            description: snippet.description,
            subscriber_count: statistics.subscriber_count,
            video_count: statistics.video_count,
            view_count: statistics.view_count,
            thumbnail: snippet
                .thumbnails
                .and_then(|t| t.default)
                .map(|t| t.url),
            url: channel_url(channel_id),
        })
    }

    async fn uploads_playlist(&self, channel_id: &str) -> Result<String, ApiError> {
        let item = self.first_channel_item("contentDetails", channel_id).await?;

        item.content_details
            .and_then(|cd| cd.related_playlists)
            .and_then(|rp| rp.uploads)
            .ok_or_else(|| ApiError::NoUploadsPlaylist(channel_id.to_string()))
    }

    async fn playlist_videos(
        &self,
        playlist_id: &str,
        max_results: usize,
    ) -> Result<Vec<RawVideo>, ApiError> {
        let mut videos = Vec::new();
        let mut page_token: Option<String> = None;

        while videos.len() < max_results {
            let page_size = (max_results - videos.len()).min(API_BATCH_SIZE).to_string();
            let mut params = vec![
                ("part", "snippet,contentDetails"),
                ("playlistId", playlist_id),
                ("maxResults", page_size.as_str()),
            ];
            if let Some(ref token) = page_token {
                params.push(("pageToken", token.as_str()));
            }

            let response: ListResponse<PlaylistItem> =
                self.get_json("playlistItems", &params).await?;

            videos.extend(response.items.into_iter().map(|item| {
                RawVideo::new(
                    item.content_details.video_id,
                    item.snippet.title,
                    item.snippet.published_at,
                )
            }));

            match response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        videos.truncate(max_results);
        info!("Listed {} videos from playlist {}", videos.len(), playlist_id);
        Ok(videos)
    }

    async fn video_statistics(&self, videos: Vec<RawVideo>) -> Result<Vec<RawVideo>, ApiError> {
        let mut with_stats = Vec::with_capacity(videos.len());

        for batch in videos.chunks(API_BATCH_SIZE) {
            let ids = batch
                .iter()
                .map(|video| video.id.as_str())
                .collect::<Vec<_>>()
                .join(",");

            let response: ListResponse<VideoItem> = self
                .get_json(
                    "videos",
                    &[("part", "statistics,contentDetails"), ("id", ids.as_str())],
                )
                .await?;

            let stats: HashMap<String, VideoItem> = response
                .items
                .into_iter()
                .map(|item| (item.id.clone(), item))
                .collect();

            for video in batch {
                with_stats.push(apply_statistics(video.clone(), stats.get(&video.id)));
            }
        }

        Ok(with_stats)
    }
}

/// Copy counters and duration from an API item, defaulting what's missing.
fn apply_statistics(video: RawVideo, item: Option<&VideoItem>) -> RawVideo {
    let Some(item) = item else {
        return video.with_counts(0, 0, 0).with_duration(DEFAULT_DURATION);
    };

    let duration = item
        .content_details
        .as_ref()
        .and_then(|cd| cd.duration.clone())
        .unwrap_or_else(|| DEFAULT_DURATION.to_string());

    video
        .with_counts(
            item.statistics.view_count.unwrap_or(0),
            item.statistics.like_count.unwrap_or(0),
            item.statistics.comment_count.unwrap_or(0),
        )
        .with_duration(duration)
}
