//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::models::ChannelSpec;

/// Videos shorter than this (seconds) count as short.
pub const SHORT_VIDEO_MAX: u64 = 300;

/// Videos shorter than this (seconds) and at least `SHORT_VIDEO_MAX` count as medium.
pub const MEDIUM_VIDEO_MAX: u64 = 900;

/// Maximum IDs per `videos.list` call and items per page.
pub const API_BATCH_SIZE: usize = 50;

pub const ENV_API_KEY: &str = "YOUTUBE_API_KEY";
pub const ENV_VIDEO_ID: &str = "VIDEO_ID";
pub const ENV_MAX_RESULTS: &str = "MAX_RESULTS_PER_CHANNEL";
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
pub const ENV_TRANSCRIPT_FIXTURES: &str = "YOUTUBE_TRANSCRIPT_FIXTURES_DIR";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Channels file not found: {0}. Create it with your channel list.")]
    ChannelsFileMissing(PathBuf),

    #[error("Channel {index} must have channel_id, username, or custom_url")]
    ChannelMissingIdentifier { index: usize },
}

/// Transcript download configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Preferred caption languages, in order
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Directory holding `<video_id>.txt` fallback transcripts
    #[serde(default)]
    pub fixtures_dir: Option<PathBuf>,

    /// Timedtext endpoint
    #[serde(default = "default_timedtext_url")]
    pub timedtext_url: String,
}

fn default_languages() -> Vec<String> {
    vec!["es".to_string(), "en".to_string()]
}

fn default_timedtext_url() -> String {
    "https://www.youtube.com/api/timedtext".to_string()
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            fixtures_dir: None,
            timedtext_url: default_timedtext_url(),
        }
    }
}

/// Report rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// URLs per channel in the best/latest video lists
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    15
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key; usually supplied through `YOUTUBE_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// YouTube Data API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,

    #[serde(default = "default_max_results")]
    pub max_results_per_channel: usize,

    /// Base directory; each run writes into a timestamped subdirectory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_channels_file")]
    pub channels_file: PathBuf,

    /// Video used by `video` when no ID is given
    #[serde(default = "default_video_id")]
    pub default_video_id: String,

    #[serde(default)]
    pub transcript: TranscriptConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

fn default_api_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_results() -> usize {
    50
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_channels_file() -> PathBuf {
    PathBuf::from("channels.toml")
}

fn default_video_id() -> String {
    "tLkRAqmAEtE".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base_url(),
            request_timeout_seconds: default_timeout(),
            max_results_per_channel: default_max_results(),
            output_dir: default_output_dir(),
            channels_file: default_channels_file(),
            default_video_id: default_video_id(),
            transcript: TranscriptConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults, then
    /// apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Blank values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(value) = get(ENV_MAX_RESULTS) {
            self.max_results_per_channel = value.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "{} must be a positive integer, got {:?}",
                    ENV_MAX_RESULTS, value
                ))
            })?;
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(video_id) = get(ENV_VIDEO_ID) {
            self.default_video_id = video_id;
        }
        if let Some(dir) = get(ENV_TRANSCRIPT_FIXTURES) {
            self.transcript.fixtures_dir = Some(PathBuf::from(dir));
        }

        self.validate()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_results_per_channel == 0 {
            return Err(ConfigError::ValidationError(
                "Max results per channel must be greater than 0".to_string(),
            ));
        }

        if self.report.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "Report top_n must be greater than 0".to_string(),
            ));
        }

        if self.transcript.languages.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one transcript language is required".to_string(),
            ));
        }

        url::Url::parse(&self.api_base_url).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid api_base_url: {}", e))
        })?;

        Ok(())
    }
}

/// Contents of the channels file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelList {
    #[serde(default, rename = "channel")]
    pub channels: Vec<ChannelSpec>,
}

impl ChannelList {
    /// Parse and validate a channel list from TOML text.
    pub fn parse(contents: &str) -> Result<Vec<ChannelSpec>, ConfigError> {
        let list: ChannelList = toml::from_str(contents)?;

        if list.channels.is_empty() {
            return Err(ConfigError::ValidationError(
                "Channels file must contain at least one [[channel]] entry".to_string(),
            ));
        }

        for (index, channel) in list.channels.iter().enumerate() {
            if !channel.has_identifier() {
                return Err(ConfigError::ChannelMissingIdentifier { index });
            }
        }

        Ok(list.channels)
    }

    /// Load and validate the channel list from a file.
    pub fn load(path: &Path) -> Result<Vec<ChannelSpec>, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ChannelsFileMissing(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.output_dir, PathBuf::from("./output"));
        assert_eq!(config.max_results_per_channel, 50);
        assert_eq!(config.transcript.languages, vec!["es", "en"]);
        assert_eq!(config.default_video_id, "tLkRAqmAEtE");
        assert_eq!(config.report.top_n, 15);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.request_timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_max_results() {
        let mut config = AppConfig::default();
        config.max_results_per_channel = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = AppConfig::default();
        config.api_base_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            max_results_per_channel = 10

            [transcript]
            languages = ["en"]
            "#,
        )
        .unwrap();

        assert_eq!(config.max_results_per_channel, 10);
        assert_eq!(config.transcript.languages, vec!["en"]);
        assert_eq!(config.report.top_n, 15);
        assert_eq!(config.api_base_url, "https://www.googleapis.com/youtube/v3");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env_from(&[
                (ENV_API_KEY, "secret"),
                (ENV_MAX_RESULTS, "20"),
                (ENV_OUTPUT_DIR, "/tmp/reports"),
                (ENV_VIDEO_ID, "abc"),
                (ENV_TRANSCRIPT_FIXTURES, "/tmp/fixtures"),
            ]))
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.max_results_per_channel, 20);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.default_video_id, "abc");
        assert_eq!(
            config.transcript.fixtures_dir,
            Some(PathBuf::from("/tmp/fixtures"))
        );
    }

    #[test]
    fn test_env_blank_values_ignored() {
        let mut config = AppConfig::default();
        config
            .apply_env(env_from(&[(ENV_API_KEY, "  "), (ENV_OUTPUT_DIR, "")]))
            .unwrap();

        assert!(config.api_key.is_none());
        assert_eq!(config.output_dir, PathBuf::from("./output"));
    }

    #[test]
    fn test_env_bad_max_results() {
        let mut config = AppConfig::default();
        let result = config.apply_env(env_from(&[(ENV_MAX_RESULTS, "lots")]));

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_config_serialization_omits_api_key() {
        let mut config = AppConfig::default();
        config.api_key = Some("secret".to_string());

        let toml_str = toml::to_string(&config).unwrap();
        assert!(!toml_str.contains("secret"));

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.output_dir, parsed.output_dir);
    }

    #[test]
    fn test_from_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::from_file(&temp_dir.path().join("missing.toml"));
        assert!(matches!(config, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_channel_list_parse() {
        let channels = ChannelList::parse(
            r#"
            [[channel]]
            name = "First"
            channel_id = "UC123"

            [[channel]]
            username = "legacyuser"

            [[channel]]
            custom_url = "@handle"
            "#,
        )
        .unwrap();

        assert_eq!(channels.len(), 3);
        assert_eq!(channels[0].channel_id.as_deref(), Some("UC123"));
        assert_eq!(channels[1].username.as_deref(), Some("legacyuser"));
        assert_eq!(channels[2].custom_url.as_deref(), Some("@handle"));
    }

    #[test]
    fn test_channel_list_missing_identifier() {
        let result = ChannelList::parse(
            r#"
            [[channel]]
            channel_id = "UC123"

            [[channel]]
            name = "No identifier"
            "#,
        );

        assert!(matches!(
            result,
            Err(ConfigError::ChannelMissingIdentifier { index: 1 })
        ));
    }

    #[test]
    fn test_channel_list_empty() {
        assert!(matches!(
            ChannelList::parse(""),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_channel_list_invalid_toml() {
        assert!(matches!(
            ChannelList::parse("[[channel]\nchannel_id = "),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_channel_list_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ChannelList::load(&temp_dir.path().join("channels.toml"));

        assert!(matches!(result, Err(ConfigError::ChannelsFileMissing(_))));
    }

    #[test]
    fn test_channel_list_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("channels.toml");
        std::fs::write(&path, "[[channel]]\nchannel_id = \"UC1\"\n").unwrap();

        let channels = ChannelList::load(&path).unwrap();
        assert_eq!(channels, vec![ChannelSpec::from_id("UC1")]);
    }
}
