use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Fetch-related constants
// =============================================================================

/// Total number of device listing attempts before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Devices seen on the VPN within this many days are counted
pub const RECENT_WINDOW_DAYS: i64 = 28;

/// Version of the fleet API resource model
pub const API_VERSION: &str = "v6";

/// Timeout for a single HTTP request in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Deployment environment, selects which config file is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Environment {
    Staging,
    Production,
    Devenv,
}

impl Environment {
    /// Returns the string representation of the environment
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Devenv => "devenv",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write config {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Per-environment API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub api_endpoint: String,
    pub auth_token: String,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| write_err(std::io::Error::other(e)))?;
        fs::write(path, content).map_err(write_err)
    }
}

/// Everything a run needs, built once in `main` and passed by reference.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub environment: Environment,
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub log_dir: PathBuf,
}

impl AppContext {
    pub fn load(
        environment: Environment,
        config_dir: &Path,
        log_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let config_path = config_path(config_dir, environment);
        let config = AppConfig::load(&config_path)?;

        Ok(Self {
            environment,
            config,
            config_path,
            log_dir: log_dir.to_path_buf(),
        })
    }
}

/// Returns the path to the config file of an environment.
pub fn config_path(config_dir: &Path, environment: Environment) -> PathBuf {
    config_dir.join(format!("{}.json", environment.as_str()))
}

/// Returns the path to the report file of a run started at `started_at`.
pub fn report_path<Tz>(log_dir: &Path, environment: Environment, started_at: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    log_dir.join(format!(
        "fleetscore_{}_{}.txt",
        environment.as_str(),
        started_at.format("%Y%m%d_%H%M%S")
    ))
}

/// Returns the file name of the diagnostics log inside the log directory.
pub fn diagnostics_log_name(environment: Environment) -> String {
    format!("fleetscore_{}.log", environment.as_str())
}
