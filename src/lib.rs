//! # Tube Insights
//!
//! Channel analytics for the YouTube Data API: pulls recent uploads for a
//! list of channels, derives per-video engagement metrics and renders reports.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (channels, raw and enriched videos)
//! - **calculate**: Engagement metrics derivation
//! - **youtube**: YouTube Data API v3 client
//! - **analyze**: Per-channel acquisition and enrichment
//! - **report**: CSV, text and markdown report rendering
//! - **storage**: JSONL dump of enriched channel reports
//! - **transcript**: Transcript download with local fallback
//! - **config**: Configuration loading and validation

pub mod analyze;
pub mod calculate;
pub mod config;
pub mod models;
pub mod report;
pub mod storage;
pub mod transcript;
pub mod youtube;

pub use models::*;

use std::sync::OnceLock;

use regex::Regex;

fn duration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?")
            .expect("duration pattern is valid")
    })
}

/// Parse a compact duration string (e.g., "PT1H2M10S") into total seconds.
///
/// Matching is anchored at the start and ignores anything after the
/// recognized prefix. Input that doesn't start with `P` yields 0, as do
/// absent components. Never fails.
pub fn parse_duration(s: &str) -> u64 {
    let Some(caps) = duration_pattern().captures(s) else {
        return 0;
    };

    let component = |idx: usize| -> u64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    component(1)
        .saturating_mul(86_400)
        .saturating_add(component(2).saturating_mul(3600))
        .saturating_add(component(3).saturating_mul(60))
        .saturating_add(component(4))
}
