//! Video transcript downloader.
//!
//! Captions come from the public timedtext endpoint. The preferred
//! languages are tried first (manual track, then auto-generated), then
//! whichever track the video lists first, then a local fixture file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use regex::{Captures, Regex};
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::TranscriptConfig;

/// Errors that can occur while downloading transcripts.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No transcript available for video {video_id}: {reason}")]
    Unavailable { video_id: String, reason: String },
}

/// A caption track listed for a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub lang_code: String,
    pub name: String,
    /// "asr" for auto-generated tracks
    pub kind: Option<String>,
}

fn text_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<text\b[^>]*>(.*?)</text>").expect("caption pattern is valid")
    })
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

fn entity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"&(amp|lt|gt|quot|apos|#[0-9]+|#x[0-9a-fA-F]+);").expect("entity pattern is valid")
    })
}

fn track_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<track\b([^>]*)>").expect("track pattern is valid"))
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([a-z_]+)="([^"]*)""#).expect("attribute pattern is valid")
    })
}

/// Decode XML entities in a single pass (`&amp;lt;` stays `&lt;`).
pub fn decode_entities(text: &str) -> String {
    entity_pattern()
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        entity[1..].parse().ok()
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Extract caption lines from a timedtext XML document.
///
/// Each entry is entity-decoded and trimmed; empty entries are dropped.
/// Entities are decoded twice because caption text is itself escaped HTML.
pub fn parse_captions(xml: &str) -> Vec<String> {
    text_pattern()
        .captures_iter(xml)
        .filter_map(|caps| {
            let inner = tag_pattern().replace_all(&caps[1], "");
            let text = decode_entities(&decode_entities(&inner));
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect()
}

/// Parse the track list returned by `type=list`.
pub fn parse_track_list(xml: &str) -> Vec<CaptionTrack> {
    track_pattern()
        .captures_iter(xml)
        .filter_map(|caps| {
            let mut lang_code = None;
            let mut name = String::new();
            let mut kind = None;
            for attr in attribute_pattern().captures_iter(&caps[1]) {
                let value = decode_entities(&attr[2]);
                match &attr[1] {
                    "lang_code" => lang_code = Some(value),
                    "name" => name = value,
                    "kind" if !value.is_empty() => kind = Some(value),
                    _ => {}
                }
            }
            lang_code.map(|lang_code| CaptionTrack {
                lang_code,
                name,
                kind,
            })
        })
        .collect()
}

/// Transcript downloader.
pub struct TranscriptDownloader {
    client: Client,
    timedtext_url: String,
    languages: Vec<String>,
    fixtures_dir: Option<PathBuf>,
}

impl TranscriptDownloader {
    /// Create a downloader from transcript configuration.
    pub fn new(config: &TranscriptConfig, timeout: Duration) -> Result<Self, TranscriptError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            timedtext_url: config.timedtext_url.clone(),
            languages: config.languages.clone(),
            fixtures_dir: config.fixtures_dir.clone(),
        })
    }

    /// Builder method to override the preferred languages.
    ///
    /// An empty list keeps the configured languages.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        if !languages.is_empty() {
            self.languages = languages;
        }
        self
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// GET the timedtext endpoint; `None` for a missing or empty document.
    async fn timedtext(&self, params: &[(&str, &str)]) -> Result<Option<String>, TranscriptError> {
        let response = self
            .client
            .get(&self.timedtext_url)
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("timedtext returned {}", response.status());
            return Ok(None);
        }

        let body = response.text().await?;
        Ok((!body.trim().is_empty()).then_some(body))
    }

    /// Fetch one caption track as formatted text.
    async fn fetch_track(
        &self,
        video_id: &str,
        track: &CaptionTrack,
    ) -> Result<Option<String>, TranscriptError> {
        let mut params = vec![("v", video_id), ("lang", track.lang_code.as_str())];
        if !track.name.is_empty() {
            params.push(("name", track.name.as_str()));
        }
        if let Some(kind) = &track.kind {
            params.push(("kind", kind.as_str()));
        }

        let Some(xml) = self.timedtext(&params).await? else {
            return Ok(None);
        };
        let lines = parse_captions(&xml);
        Ok((!lines.is_empty()).then(|| lines.join("\n")))
    }

    /// List the caption tracks available for a video.
    pub async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
        let xml = self
            .timedtext(&[("v", video_id), ("type", "list")])
            .await?;
        Ok(xml.map(|xml| parse_track_list(&xml)).unwrap_or_default())
    }

    async fn fetch_preferred(&self, video_id: &str) -> Result<Option<String>, TranscriptError> {
        for lang in &self.languages {
            for kind in [None, Some("asr")] {
                let track = CaptionTrack {
                    lang_code: lang.clone(),
                    name: String::new(),
                    kind: kind.map(String::from),
                };
                if let Some(text) = self.fetch_track(video_id, &track).await? {
                    info!("Found {} transcript ({})", lang, kind.unwrap_or("manual"));
                    return Ok(Some(text));
                }
            }
        }
        Ok(None)
    }

    async fn fetch_first_listed(&self, video_id: &str) -> Result<Option<String>, TranscriptError> {
        let tracks = self.list_tracks(video_id).await?;
        match tracks.first() {
            Some(track) => {
                info!("Using available transcript in {}", track.lang_code);
                self.fetch_track(video_id, track).await
            }
            None => Ok(None),
        }
    }

    /// Read `<fixtures_dir>/<video_id>.txt`, if configured and non-empty.
    pub fn load_fixture(&self, video_id: &str) -> Option<String> {
        let candidate = self.fixtures_dir.as_ref()?.join(format!("{}.txt", video_id));
        if !candidate.is_file() {
            return None;
        }

        match fs::read_to_string(&candidate) {
            Ok(content) => {
                let content = content.trim();
                if content.is_empty() {
                    None
                } else {
                    info!("Using local transcript from {:?}", candidate);
                    Some(content.to_string())
                }
            }
            Err(e) => {
                warn!("Failed to read {:?}: {}", candidate, e);
                None
            }
        }
    }

    /// Get a video's transcript, one caption entry per line.
    pub async fn transcript(&self, video_id: &str) -> Result<String, TranscriptError> {
        let reason = match self.fetch_preferred(video_id).await {
            Ok(Some(text)) => return Ok(text),
            Ok(None) => {
                info!(
                    "No transcript found in {:?}, trying available transcripts...",
                    self.languages
                );
                match self.fetch_first_listed(video_id).await {
                    Ok(Some(text)) => return Ok(text),
                    Ok(None) => "no caption tracks".to_string(),
                    Err(e) => e.to_string(),
                }
            }
            Err(e) => e.to_string(),
        };

        warn!("Transcript download failed for {}: {}", video_id, reason);

        self.load_fixture(video_id)
            .ok_or_else(|| TranscriptError::Unavailable {
                video_id: video_id.to_string(),
                reason,
            })
    }

    /// Download a transcript and write it to `<dir>/<video_id>_transcript.txt`.
    pub async fn save(&self, video_id: &str, dir: &Path) -> Result<PathBuf, TranscriptError> {
        let text = self.transcript(video_id).await?;

        fs::create_dir_all(dir).map_err(|source| TranscriptError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(format!("{}_transcript.txt", video_id));
        fs::write(&path, text).map_err(|source| TranscriptError::Io {
            path: path.clone(),
            source,
        })?;

        info!("Transcript saved to {:?}", path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Downloader whose endpoint refuses connections, so every fetch fails fast.
    fn offline_downloader(fixtures_dir: Option<PathBuf>) -> TranscriptDownloader {
        let config = TranscriptConfig {
            languages: vec!["en".to_string()],
            fixtures_dir,
            timedtext_url: "http://127.0.0.1:9/api/timedtext".to_string(),
        };
        TranscriptDownloader::new(&config, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_parse_captions() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
<text start="0" dur="1.5">Hello everyone</text>
<text start="1.5" dur="2">  </text>
<text start="3.5" dur="2">Fish &amp;amp; chips</text>
<text start="5.5" dur="2">It&amp;#39;s &lt;b&gt;bold&lt;/b&gt;</text>
</transcript>"#;

        assert_eq!(
            parse_captions(xml),
            vec!["Hello everyone", "Fish & chips", "It's <b>bold</b>"]
        );
    }

    #[test]
    fn test_parse_captions_strips_inline_tags() {
        let xml = r##"<transcript><text start="0"><font color="#fff">Hi</font> there</text></transcript>"##;
        assert_eq!(parse_captions(xml), vec!["Hi there"]);
    }

    #[test]
    fn test_parse_captions_empty() {
        assert!(parse_captions("<transcript></transcript>").is_empty());
        assert!(parse_captions("").is_empty());
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(
            decode_entities("&amp; &lt; &gt; &quot; &apos; &#39; &#x41;"),
            "& < > \" ' ' A"
        );
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
        assert_eq!(decode_entities("&unknown; &#xFFFFFFFF;"), "&unknown; &#xFFFFFFFF;");
    }

    #[test]
    fn test_parse_track_list() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?>
<transcript_list docid="123">
<track id="0" name="" lang_code="de" lang_original="Deutsch" lang_translated="German" lang_default="true"/>
<track id="1" name="Director&#39;s cut" lang_code="en" lang_original="English" lang_translated="English"/>
<track id="2" name="" lang_code="fr" kind="asr" lang_original="Français"/>
</transcript_list>"#;

        let tracks = parse_track_list(xml);

        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].lang_code, "de");
        assert_eq!(tracks[0].kind, None);
        assert_eq!(tracks[1].name, "Director's cut");
        assert_eq!(tracks[2].kind.as_deref(), Some("asr"));
    }

    #[test]
    fn test_with_languages() {
        let downloader = offline_downloader(None);
        assert_eq!(downloader.languages(), ["en"]);

        let downloader = downloader.with_languages(Vec::new());
        assert_eq!(downloader.languages(), ["en"]);

        let downloader = downloader.with_languages(vec!["es".to_string(), "pt".to_string()]);
        assert_eq!(downloader.languages(), ["es", "pt"]);
    }

    #[test]
    fn test_load_fixture() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("abc.txt"), "\n  line one\nline two \n\n").unwrap();
        fs::write(temp_dir.path().join("blank.txt"), "   \n").unwrap();

        let downloader = offline_downloader(Some(temp_dir.path().to_path_buf()));

        assert_eq!(
            downloader.load_fixture("abc").as_deref(),
            Some("line one\nline two")
        );
        assert_eq!(downloader.load_fixture("blank"), None);
        assert_eq!(downloader.load_fixture("missing"), None);
        assert_eq!(offline_downloader(None).load_fixture("abc"), None);
    }

    #[tokio::test]
    async fn test_falls_back_to_fixture() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("vid1.txt"), "cached transcript\n").unwrap();
        let downloader = offline_downloader(Some(temp_dir.path().to_path_buf()));

        let text = downloader.transcript("vid1").await.unwrap();
        assert_eq!(text, "cached transcript");

        let out_dir = temp_dir.path().join("out").join("nested");
        let path = downloader.save("vid1", &out_dir).await.unwrap();

        assert_eq!(path, out_dir.join("vid1_transcript.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "cached transcript");
    }

    #[tokio::test]
    async fn test_unavailable_without_fixture() {
        let temp_dir = TempDir::new().unwrap();
        let downloader = offline_downloader(None);

        let result = downloader.save("nothing", temp_dir.path()).await;

        match result {
            Err(TranscriptError::Unavailable { video_id, .. }) => assert_eq!(video_id, "nothing"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!temp_dir.path().join("nothing_transcript.txt").exists());
    }
}
