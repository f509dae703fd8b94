//! Configuration management for the bridge.
//!
//! This module handles the `~/.tasknote-bridge/config.yaml` file. Every field
//! is optional; a missing file yields the defaults.

use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the Notes account name.
pub const NOTES_ACCOUNT_ENV: &str = "TASKNOTE_NOTES_ACCOUNT";

/// Default Notes account targeted by automation scripts.
pub const DEFAULT_NOTES_ACCOUNT: &str = "iCloud";

/// Default automation interpreter timeout in seconds.
pub const DEFAULT_SCRIPT_TIMEOUT_SECS: u64 = 10;

/// Default port of the HTTP surface.
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Explicit Things database path. `None` means auto-discover.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub things_db_path: Option<PathBuf>,

    /// Notes account the automation scripts address.
    pub notes_account: String,

    /// Timeout for each automation interpreter invocation.
    pub script_timeout_secs: u64,

    /// Port of the HTTP surface.
    pub http_port: u16,

    /// Directory holding the companion browser page.
    pub static_dir: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            things_db_path: None,
            notes_account: DEFAULT_NOTES_ACCOUNT.to_string(),
            script_timeout_secs: DEFAULT_SCRIPT_TIMEOUT_SECS,
            http_port: DEFAULT_HTTP_PORT,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl BridgeConfig {
    /// Load config from the default location, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let mut config = match paths::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load config from a specific file, returning defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Some(path) = std::env::var_os(paths::THINGS_DB_ENV).filter(|v| !v.is_empty()) {
            self.things_db_path = Some(PathBuf::from(path));
        }
        if let Ok(account) = std::env::var(NOTES_ACCOUNT_ENV) {
            if !account.trim().is_empty() {
                self.notes_account = account;
            }
        }
    }

    /// Automation timeout as a `Duration`.
    #[must_use]
    pub const fn script_timeout(&self) -> Duration {
        Duration::from_secs(self.script_timeout_secs)
    }
}
