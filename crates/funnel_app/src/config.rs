use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use funnel_core::{default_script, FunnelSettings, DEFAULT_MIN_PHONE_DIGITS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "funnel.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid {field} url {value:?}: {source}")]
    Url {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
}

/// On-disk configuration. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelConfig {
    pub processing_ms: u64,
    pub tick_ms: u64,
    pub completion_delay_ms: u64,
    pub min_phone_digits: usize,
    pub script: Vec<String>,
    pub offer_url: Option<String>,
    /// Base URL of the Simulation Recorder; `None` keeps records in memory.
    pub recorder_url: Option<String>,
    pub log_destination: LogDestination,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            processing_ms: 15_000,
            tick_ms: 80,
            completion_delay_ms: 1_000,
            min_phone_digits: DEFAULT_MIN_PHONE_DIGITS,
            script: default_script(),
            offer_url: None,
            recorder_url: None,
            log_destination: LogDestination::default(),
        }
    }
}

impl FunnelConfig {
    pub fn to_settings(&self) -> Result<FunnelSettings, ConfigError> {
        Ok(FunnelSettings {
            processing_duration: Duration::from_millis(self.processing_ms),
            tick_interval: Duration::from_millis(self.tick_ms),
            completion_delay: Duration::from_millis(self.completion_delay_ms),
            min_phone_digits: self.min_phone_digits,
            script: self.script.clone(),
            offer_url: parse_url("offer", self.offer_url.as_deref())?,
        })
    }

    pub fn recorder_url(&self) -> Result<Option<url::Url>, ConfigError> {
        parse_url("recorder", self.recorder_url.as_deref())
    }
}

fn parse_url(field: &'static str, value: Option<&str>) -> Result<Option<url::Url>, ConfigError> {
    value
        .map(|raw| {
            url::Url::parse(raw).map_err(|source| ConfigError::Url {
                field,
                value: raw.to_string(),
                source,
            })
        })
        .transpose()
}

/// A parsed config plus remarks made while loading it. Loading runs before
/// the logger exists, so the caller logs `notes` once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: FunnelConfig,
    pub notes: Vec<String>,
}

/// Loads the config at `path`; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(LoadedConfig {
                config: FunnelConfig::default(),
                notes: vec![format!("No config at {:?}; using defaults", path)],
            });
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: FunnelConfig = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let mut notes = vec![format!("Loaded config from {:?}", path)];
    if config.script.is_empty() {
        notes.push(format!("Config {:?} has an empty script", path));
    }
    Ok(LoadedConfig { config, notes })
}
