//! Runtime configuration, read from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! playable setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = ".pixel_arcade.toml";
pub const DEFAULT_SCORE_FILE: &str = ".pixel_arcade_scores";

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
    pub store: StoreConfig,
    pub log: LogConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Update cadence for the real-time games.
    pub frame_ms: u64,
    pub render_ms: u64,
    /// Update cadence for snake, which moves one cell per step.
    pub snake_step_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            render_ms: 16,
            snake_step_ms: 150,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Score file; `$HOME/.pixel_arcade_scores` when unset.
    pub path: Option<PathBuf>,
    pub size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: 16,
        }
    }
}

impl StoreConfig {
    pub fn score_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| home_dir().join(DEFAULT_SCORE_FILE))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("pixel_arcade.log"),
            filter: "info".to_string(),
        }
    }
}

impl ArcadeConfig {
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load `path` if given, else `$HOME/.pixel_arcade.toml` if it exists,
    /// else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let fallback = home_dir().join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Self::from_file(&fallback);
        }
        debug!("no config file, using defaults");
        Ok(Self::default())
    }
}
