//! Configuration file handling.
//!
//! Settings are read from an optional TOML file; every key falls back to
//! its default, so an absent file behaves exactly like the stock tool.
//!
//! # Configuration Location
//!
//! - Linux: `~/.config/pifpwned/config.toml`
//! - macOS: `~/Library/Application Support/pifpwned/config.toml`
//! - Windows: `%APPDATA%\pifpwned\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! endpoint = "https://api.pwnedpasswords.com/range"
//! user_agent = "1passpwnedcheck"
//! delay_ms = 1600
//! timeout_secs = 30
//! url_style = "truncate"
//! ```

use crate::checker::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use crate::error::Result;
use crate::model::UrlStyle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// The range service allows one request per 1500 ms.
pub const MIN_DELAY_MS: u64 = 1500;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Range endpoint; the hash prefix is appended as a path segment.
    pub endpoint: String,

    /// `User-Agent` header sent with every lookup.
    pub user_agent: String,

    /// Pause after each lookup, in milliseconds.
    ///
    /// Default: 1600
    pub delay_ms: u64,

    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,

    /// How item locations appear in the report.
    pub url_style: UrlStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delay_ms: 1600,
            timeout_secs: 30,
            url_style: UrlStyle::Truncate,
        }
    }
}

impl Config {
    /// Loads the configuration file, or defaults if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pifpwned")
            .join("config.toml")
    }

    /// Pacing delay, never below [`MIN_DELAY_MS`].
    pub fn delay(&self) -> Duration {
        if self.delay_ms < MIN_DELAY_MS {
            warn!(
                "delay_ms {} is below the service limit, using {}",
                self.delay_ms, MIN_DELAY_MS
            );
            return Duration::from_millis(MIN_DELAY_MS);
        }
        Duration::from_millis(self.delay_ms)
    }
}
