//! Application configuration management.
//!
//! Configuration is stored at `~/.config/blogdash/config.json`. A few
//! fields can be overridden from the environment (`BLOGDASH_API_URL`,
//! `BLOGDASH_USERNAME`), which is how CI and `.env` files point the client
//! at a different backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::auth::{FileSlot, KeyringSlot, SessionSlot};
use crate::draft::{FileDraftStore, DEFAULT_AUTOSAVE_INTERVAL_SECS};

/// Application name used for config/data directory paths
const APP_NAME: &str = "blogdash";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_PROFILE: &str = "default";

pub const ENV_API_URL: &str = "BLOGDASH_API_URL";
pub const ENV_USERNAME: &str = "BLOGDASH_USERNAME";
pub const ENV_PASSWORD: &str = "BLOGDASH_PASSWORD";

/// Where the session record is kept between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub autosave_interval_secs: u64,
    pub session_backend: SessionBackend,
    /// Separates sessions when one machine talks to several backends.
    pub profile: String,
    pub last_username: Option<String>,
    /// Rolling log files are written here when set.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            session_backend: SessionBackend::default(),
            profile: DEFAULT_PROFILE.to_string(),
            last_username: None,
            log_dir: None,
        }
    }
}

impl Config {
    /// Load the config file (or defaults) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(username) = var(ENV_USERNAME).filter(|v| !v.trim().is_empty()) {
            self.last_username = Some(username.trim().to_string());
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Per-profile directory for the session file and the draft.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(&self.profile))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }

    pub fn session_slot(&self) -> Result<Arc<dyn SessionSlot>> {
        Ok(match self.session_backend {
            SessionBackend::File => Arc::new(FileSlot::new(&self.data_dir()?)),
            SessionBackend::Keyring => Arc::new(KeyringSlot::new(self.profile.clone())),
        })
    }

    pub fn draft_store(&self) -> Result<FileDraftStore> {
        Ok(FileDraftStore::new(&self.data_dir()?))
    }
}
