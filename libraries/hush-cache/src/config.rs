//! Cache configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where audio is cached and where it is downloaded from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding downloaded audio files (default: ./data/cache)
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Base URL that remote storage paths are resolved against
    #[serde(default)]
    pub remote_base_url: String,

    /// Whole-request timeout for downloads (default: 300)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout (default: 10)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./data/cache")
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl CacheConfig {
    pub fn new(cache_dir: impl Into<PathBuf>, remote_base_url: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            remote_base_url: remote_base_url.into(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    /// Defaults with the given remote storage base URL
    pub fn with_remote(remote_base_url: impl Into<String>) -> Self {
        Self::new(default_cache_dir(), remote_base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
