use crate::SourceError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/home-assistant/core";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PLATFORM_NAME: &str = "homeassistant";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Raw file host of the upstream repository; `<base_url>/<version>/<path>`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Package name used for the `<name>==<version>` pin.
    #[serde(default = "default_platform_name")]
    pub platform_name: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            platform_name: default_platform_name(),
        }
    }
}

impl SourceConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let content = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| SourceError::Config(format!("invalid config {}: {e}", path.display())))?;
        config.base_url = config.base_url.trim_end_matches('/').to_owned();
        if config.timeout_secs == 0 {
            return Err(SourceError::Config("timeout_secs must be positive".to_owned()));
        }
        if config.platform_name.trim().is_empty() {
            return Err(SourceError::Config("platform_name must not be empty".to_owned()));
        }
        Ok(config)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_platform_name() -> String {
    DEFAULT_PLATFORM_NAME.to_owned()
}
