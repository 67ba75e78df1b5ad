//! Configuration management
//!
//! Settings live in `config.yaml` inside the data directory. The data
//! directory is `$QUOTES_HOME` when set, otherwise `~/.quotes`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::remote::{DEFAULT_REMOTE_CATEGORY, DEFAULT_REMOTE_URL};

/// Environment variable that relocates the data directory.
pub const HOME_ENV: &str = "QUOTES_HOME";

/// Keys accepted by `quotes config get/set`.
pub const CONFIG_KEYS: &[&str] = &[
    "remote_url",
    "remote_category",
    "sync_interval_secs",
    "notification_secs",
    "notify_on_noop",
    "seed_defaults",
    "request_timeout_secs",
];

/// Returns the data directory, creating it if needed.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .context("Could not find home directory")?
            .join(".quotes"),
    };

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint that serves (GET) and accepts (POST) quotes.
    pub remote_url: String,

    /// Category assigned to every quote pulled from the remote.
    pub remote_category: String,

    /// Seconds between automatic sync passes.
    pub sync_interval_secs: u64,

    /// Seconds a notification stays visible.
    pub notification_secs: u64,

    /// Report "synced" even when a pass changed nothing.
    pub notify_on_noop: bool,

    /// Populate a brand-new store with the built-in quotes.
    pub seed_defaults: bool,

    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            remote_category: DEFAULT_REMOTE_CATEGORY.to_string(),
            sync_interval_secs: 10,
            notification_secs: 3,
            notify_on_noop: true,
            seed_defaults: true,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Loads the config file, falling back to defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = self.to_yaml()?;

        // Write to a temp file first, then rename for atomicity
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &content).context("Failed to write config temp file")?;
        fs::rename(&temp_path, &path).context("Failed to rename config file")?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.yaml"))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(content).map_err(|e| anyhow::anyhow!("Invalid config file: {e}"))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))
    }

    /// Reads a single key as a display string.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "remote_url" => self.remote_url.clone(),
            "remote_category" => self.remote_category.clone(),
            "sync_interval_secs" => self.sync_interval_secs.to_string(),
            "notification_secs" => self.notification_secs.to_string(),
            "notify_on_noop" => self.notify_on_noop.to_string(),
            "seed_defaults" => self.seed_defaults.to_string(),
            "request_timeout_secs" => self.request_timeout_secs.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Sets a single key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "remote_url" => self.remote_url = non_empty(key, value)?,
            "remote_category" => self.remote_category = non_empty(key, value)?,
            "sync_interval_secs" => self.sync_interval_secs = positive(key, value)?,
            "notification_secs" => self.notification_secs = positive(key, value)?,
            "notify_on_noop" => self.notify_on_noop = boolean(key, value)?,
            "seed_defaults" => self.seed_defaults = boolean(key, value)?,
            "request_timeout_secs" => self.request_timeout_secs = positive(key, value)?,
            _ => anyhow::bail!(
                "Unknown config key '{key}'. Valid keys: {}",
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn non_empty(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        anyhow::bail!("'{key}' cannot be empty");
    }
    Ok(value.to_string())
}

fn positive(key: &str, value: &str) -> Result<u64> {
    let n: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("'{key}' must be a whole number of seconds"))?;
    if n == 0 {
        anyhow::bail!("'{key}' must be greater than zero");
    }
    Ok(n)
}

fn boolean(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => anyhow::bail!("'{key}' must be true or false"),
    }
}
