//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    /// Where the backend lives.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Listing page sizes.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Upload limits.
    #[serde(default)]
    pub media: MediaConfig,
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Backend endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Gateway host (e.g., "https://icp-api.io").
    #[serde(default = "default_host")]
    pub host: String,
    /// Principal of the backend service, when pinned.
    #[serde(default)]
    pub service_id: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            service_id: None,
        }
    }
}

/// Page sizes for paginated listings.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Forum threads per page (default: 20).
    #[serde(default = "default_page_size")]
    pub threads_page_size: u64,
    /// Hello Corner messages per page (default: 20).
    #[serde(default = "default_page_size")]
    pub messages_page_size: u64,
    /// Moderation reports per page (default: 20).
    #[serde(default = "default_page_size")]
    pub reports_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            threads_page_size: default_page_size(),
            messages_page_size: default_page_size(),
            reports_page_size: default_page_size(),
        }
    }
}

/// Upload size limits.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Largest accepted image (default: 5 MiB).
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
    /// Largest accepted video (default: 50 MiB).
    #[serde(default = "default_max_video_bytes")]
    pub max_video_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
            max_video_bytes: default_max_video_bytes(),
        }
    }
}
