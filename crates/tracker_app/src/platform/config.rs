use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracker_core::DEFAULT_DEBOUNCE;
use tracker_engine::ApiSettings;
use tracker_logging::tracker_info;

/// Contents of the RON configuration file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    /// Quiet period before typed search text is sent.
    pub debounce_ms: u64,
    /// Directory holding the saved location.
    pub state_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub collection: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
    pub xsrf_token: Option<String>,
    pub cookie: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            debounce_ms: millis(DEFAULT_DEBOUNCE),
            state_dir: PathBuf::from("."),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        let defaults = ApiSettings::default();
        Self {
            base_url: defaults.base_url,
            collection: defaults.collection,
            connect_timeout_ms: millis(defaults.connect_timeout),
            request_timeout_ms: millis(defaults.request_timeout),
            max_bytes: defaults.max_bytes,
            xsrf_token: None,
            cookie: None,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracker_info!("No config at {:?}; using defaults", path);
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read config file {}", path.display()))
            }
        };
        ron::from_str(&raw).with_context(|| format!("parse RON config {}", path.display()))
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api.base_url.clone(),
            collection: self.api.collection.clone(),
            connect_timeout: Duration::from_millis(self.api.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.api.request_timeout_ms),
            max_bytes: self.api.max_bytes,
            xsrf_token: self.api.xsrf_token.clone(),
            cookie: self.api.cookie.clone(),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
