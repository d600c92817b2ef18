use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use quakewave_engine::PlaybackConfig;
use quakewave_feed::DEFAULT_BASE_URL;
use quakewave_system_interactive::Config as InteractiveConfig;
use quakewave_system_waves::WaveTuning;
use serde::Deserialize;

/// Application configuration loaded from TOML.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppConfig {
    pub(crate) playback: PlaybackConfig,
    pub(crate) waves: WaveTuning,
    pub(crate) interactive: InteractiveConfig,
    pub(crate) feed: FeedConfig,
    pub(crate) map: MapConfig,
}

impl AppConfig {
    /// Reads `path`, or returns the defaults when no file is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse configuration {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid configuration toml")
    }
}

/// Upstream and local earthquake sources.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FeedConfig {
    pub(crate) base_url: String,
    pub(crate) timeout_secs: u64,
    pub(crate) backup_path: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: 20,
            backup_path: PathBuf::from("data/backup.geojson"),
        }
    }
}

impl FeedConfig {
    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Background map and screen dimensions.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MapConfig {
    pub(crate) path: Option<PathBuf>,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            path: None,
            width: 1_440,
            height: 552,
        }
    }
}
