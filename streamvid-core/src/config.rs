use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{MediaDuration, TrackInfo, TrackKind};

/// Default asset: Apple's bipbop 4x3 HLS variant playlist
pub const DEFAULT_ASSET_URL: &str =
    "https://devstreaming-cdn.apple.com/videos/streaming/examples/bipbop_4x3/bipbop_4x3_variant.m3u8";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub player: PlayerConfig,
    pub logging: LoggingConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Media resource to play
    pub asset_url: String,
    /// Interval between playback progress reports
    pub progress_interval_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            asset_url: DEFAULT_ASSET_URL.to_string(),
            progress_interval_ms: 5_000,
        }
    }
}

impl PlayerConfig {
    #[must_use]
    pub const fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Behaviour of the simulated asset loader and player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Tracks reported by a successful tracks load
    pub tracks: Vec<TrackInfo>,
    /// Media length in seconds (ignored for live streams)
    pub duration_secs: u64,
    /// Simulate a live stream with no end
    pub live: bool,
    pub tracks_delay_ms: u64,
    pub duration_delay_ms: u64,
    /// Time until the player item is ready to play
    pub prepare_delay_ms: u64,
    pub fail_tracks: bool,
    pub fail_duration: bool,
    pub fail_prepare: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tracks: vec![
                TrackInfo::new(1, TrackKind::Video, "avc1"),
                TrackInfo::new(2, TrackKind::Audio, "mp4a"),
            ],
            duration_secs: 60,
            live: false,
            tracks_delay_ms: 150,
            duration_delay_ms: 100,
            prepare_delay_ms: 200,
            fail_tracks: false,
            fail_duration: false,
            fail_prepare: false,
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub const fn media_duration(&self) -> MediaDuration {
        if self.live {
            MediaDuration::Indefinite
        } else {
            MediaDuration::Finite(Duration::from_secs(self.duration_secs))
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Load config file if provided; a named file must exist
        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path));
        }

        // Override with environment variables (STREAMVID_PLAYER__ASSET_URL, etc.)
        builder = builder.add_source(
            Environment::with_prefix("STREAMVID")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Check the configuration, collecting every problem found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match url::Url::parse(&self.player.asset_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(format!(
                "player.asset_url must be http or https, got '{}'",
                url.scheme()
            )),
            Err(e) => errors.push(format!(
                "player.asset_url '{}' is not a valid URL: {e}",
                self.player.asset_url
            )),
        }

        if self.player.progress_interval_ms == 0 {
            errors.push("player.progress_interval_ms must be greater than 0".to_string());
        }

        if crate::logging::parse_log_level(&self.logging.level).is_err() {
            errors.push(format!("logging.level '{}' is invalid", self.logging.level));
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be 'json' or 'pretty', got '{}'",
                self.logging.format
            ));
        }

        if !self.simulation.live && self.simulation.duration_secs == 0 {
            errors.push("simulation.duration_secs must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
