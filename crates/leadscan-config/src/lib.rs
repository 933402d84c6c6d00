use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::channels::ChannelConfig;
use self::logging::LoggingConfig;
use self::platform::PlatformConfig;

pub mod capture;
pub mod channels;
pub mod logging;
pub mod platform;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub platform: PlatformConfig,
    pub capture: CaptureConfig,
    pub logging: LoggingConfig,
    pub channels: ChannelConfig,
}

impl Config {
    /// Parse a JSON config file, missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Load from `path` (or `LEADSCAN_CONFIG`), then apply env overrides.
    ///
    /// A missing file falls back to defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| env::var(key).ok())
    }

    /// [`load`](Self::load) with variables resolved through `var`
    fn load_with(
        path: Option<&Path>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| var("LEADSCAN_CONFIG").map(PathBuf::from));

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                tracing::warn!("Config {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_overrides(var);
        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(filter) = var("LEADSCAN_LOG") {
            self.logging.filter = filter;
        }
        if let Some(granted) = var("LEADSCAN_CAMERA_GRANTED").and_then(|v| parse_flag(&v)) {
            self.platform.camera.granted = granted;
        }
        if let Some(granted) = var("LEADSCAN_STORAGE_GRANTED").and_then(|v| parse_flag(&v)) {
            self.platform.media_storage.granted = granted;
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
