//! Channel models.

use serde::{Deserialize, Serialize};

use super::EnrichedVideo;

/// A channel to analyze, as listed in the channels file.
///
/// At least one of `channel_id`, `username` or `custom_url` must be set.
/// When several are present, `channel_id` wins, then `username`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSpec {
    /// Optional label used in logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,

    /// Legacy username (resolved with `forUsername`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Handle, with or without the leading `@`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
}

impl ChannelSpec {
    pub fn from_id(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: Some(channel_id.into()),
            ..Default::default()
        }
    }

    pub fn from_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Default::default()
        }
    }

    pub fn from_custom_url(custom_url: impl Into<String>) -> Self {
        Self {
            custom_url: Some(custom_url.into()),
            ..Default::default()
        }
    }

    /// Whether any identifier is present.
    pub fn has_identifier(&self) -> bool {
        [&self.channel_id, &self.username, &self.custom_url]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

impl std::fmt::Display for ChannelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(name) = &self.name {
            return write!(f, "{}", name);
        }
        match (&self.channel_id, &self.username, &self.custom_url) {
            (Some(id), _, _) => write!(f, "channel_id={}", id),
            (None, Some(user), _) => write!(f, "username={}", user),
            (None, None, Some(url)) => write!(f, "custom_url={}", url),
            (None, None, None) => write!(f, "<unidentified channel>"),
        }
    }
}

/// Channel metadata and statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// None when the channel hides its subscriber count
    pub subscriber_count: Option<u64>,

    pub video_count: Option<u64>,

    pub view_count: Option<u64>,

    /// Default thumbnail URL
    #[serde(default)]
    pub thumbnail: Option<String>,

    pub url: String,
}

impl ChannelInfo {
    /// Create channel info with no statistics.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let id = id.into();
        let url = channel_url(&id);
        Self {
            id,
            title: title.into(),
            description: String::new(),
            subscriber_count: None,
            video_count: None,
            view_count: None,
            thumbnail: None,
            url,
        }
    }

    /// Builder method to set the subscriber count.
    pub fn with_subscribers(mut self, count: u64) -> Self {
        self.subscriber_count = Some(count);
        self
    }

    /// Subscriber count used as the metrics denominator (0 when unknown).
    pub fn subscribers_or_zero(&self) -> u64 {
        self.subscriber_count.unwrap_or(0)
    }
}

/// Build the public URL for a channel ID.
pub fn channel_url(channel_id: &str) -> String {
    format!("https://www.youtube.com/channel/{}", channel_id)
}

/// A channel together with its enriched videos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub channel: ChannelInfo,
    pub videos: Vec<EnrichedVideo>,
}

impl ChannelReport {
    pub fn new(channel: ChannelInfo, videos: Vec<EnrichedVideo>) -> Self {
        Self { channel, videos }
    }
}
