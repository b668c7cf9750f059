//! Configuration for the ingestion pipeline and playback synchronizer.
//!
//! All tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! sensible defaults so a document can always be ingested.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Top-level configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub content_filtering: FilterSettings,
    pub block_filtering: BlockSettings,
    pub playback: PlaybackSettings,
    pub log_level: LogLevel,
}

/// Settings for the plain-text content filter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSettings {
    pub skip_frontmatter: bool,
    pub skip_headers_footers: bool,
    pub skip_page_numbers: bool,
    pub skip_footnotes: bool,
    /// Fraction of the text (by character count) dropped when no chapter
    /// marker is found near the start.
    pub frontmatter_skip_fraction: f64,
    /// A normalized line repeated strictly more often than this is removed.
    pub repeat_threshold: usize,
    /// Footnote-looking lines longer than this survive; protects enumerated
    /// body content that happens to start with a number.
    pub footnote_max_len: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            skip_frontmatter: true,
            skip_headers_footers: true,
            skip_page_numbers: true,
            skip_footnotes: true,
            frontmatter_skip_fraction: default_frontmatter_skip_fraction(),
            repeat_threshold: default_repeat_threshold(),
            footnote_max_len: default_footnote_max_len(),
        }
    }
}

/// Settings for position-aware block classification of paged documents.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockSettings {
    /// Fragments with `y0 / page_height` below this are headers.
    pub header_zone_fraction: f32,
    /// Fragments with `y0 / page_height` above `1 - fraction` are footers.
    pub footer_zone_fraction: f32,
    /// A normalized fragment text seen on at least this many fragments is
    /// treated as a running header or footer wherever it appears.
    pub fragment_repeat_threshold: usize,
}

impl Default for BlockSettings {
    fn default() -> Self {
        BlockSettings {
            header_zone_fraction: default_zone_fraction(),
            footer_zone_fraction: default_zone_fraction(),
            fragment_repeat_threshold: default_repeat_threshold(),
        }
    }
}

/// Settings for duration estimation and the adaptive speed ramp.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub start_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub words_per_minute: f64,
    /// Absolute floor for any estimated sentence duration, in seconds.
    pub min_sentence_secs: f64,
    /// Speed added per elapsed interval while a session is running.
    pub speed_increment: f64,
    pub speed_interval_minutes: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        PlaybackSettings {
            start_speed: default_start_speed(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            words_per_minute: default_words_per_minute(),
            min_sentence_secs: default_min_sentence_secs(),
            speed_increment: default_speed_increment(),
            speed_interval_minutes: default_speed_interval_minutes(),
        }
    }
}

/// Load configuration from `path`, falling back to defaults on any failure.
pub fn load_config(path: &Path) -> AppConfig {
    match fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(err) => {
                warn!(path = %path.display(), "Invalid config TOML, using defaults: {err}");
                AppConfig::default()
            }
        },
        Err(err) => {
            warn!(path = %path.display(), "Falling back to default configuration: {err}");
            AppConfig::default()
        }
    }
}

fn default_frontmatter_skip_fraction() -> f64 {
    0.05
}

fn default_repeat_threshold() -> usize {
    3
}

fn default_footnote_max_len() -> usize {
    200
}

fn default_zone_fraction() -> f32 {
    0.10
}

fn default_start_speed() -> f64 {
    1.0
}

fn default_min_speed() -> f64 {
    0.5
}

fn default_max_speed() -> f64 {
    2.5
}

fn default_words_per_minute() -> f64 {
    150.0
}

fn default_min_sentence_secs() -> f64 {
    0.5
}

fn default_speed_increment() -> f64 {
    0.1
}

fn default_speed_interval_minutes() -> u64 {
    15
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_sensible_ranges() {
        let config = AppConfig::default();
        assert!(config.block_filtering.header_zone_fraction > 0.0);
        assert!(config.block_filtering.header_zone_fraction < 1.0);
        assert!(config.playback.min_speed <= config.playback.start_speed);
        assert!(config.playback.start_speed <= config.playback.max_speed);
        assert!(config.playback.min_sentence_secs > 0.0);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            log_level = "warn"

            [playback]
            start_speed = 1.5
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.log_level, LogLevel::Warn);
        assert!((config.playback.start_speed - 1.5).abs() < f64::EPSILON);
        assert!((config.playback.max_speed - 2.5).abs() < f64::EPSILON);
        assert!(config.content_filtering.skip_frontmatter);
        assert_eq!(config.content_filtering.footnote_max_len, 200);
    }

    #[test]
    fn load_config_falls_back_on_missing_file() {
        let config = load_config(Path::new("/nonexistent/readflow-config.toml"));
        assert_eq!(config.content_filtering.repeat_threshold, 3);
    }
}
