//! Optional configuration file.
//!
//! Looked up in this order:
//! - the path given with `--config` (must exist),
//! - `~/.config/dustman/config.toml` (Linux) or
//!   `%APPDATA%/dustman/config.toml` (Windows), if present,
//! - built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use dustman_help_client::DEFAULT_ENDPOINT;
use serde::{Deserialize, Serialize};

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Package removal endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Append-only run log.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("dustman.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Loads the explicit config file, or the user config if it exists, or
    /// the defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(|appdata| PathBuf::from(appdata).join("dustman").join("config.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("dustman")
                .join("config.toml")
        })
    }
}
