/// Application configuration
use crate::error::{CliError, Result};
use hush_cache::CacheConfig;
use hush_playback::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Default configuration file, read when present
pub const DEFAULT_CONFIG_FILE: &str = "hush.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default = "default_cache")]
    pub cache: CacheConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// User that history and favorites are kept for; anonymous when unset
    #[serde(default)]
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    /// Directory holding `history.jsonl` and `favorites.jsonl`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default)]
    pub level: Option<String>,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `hush.toml` in the working
    /// directory is read if present. `HUSH_*` variables override both, with
    /// `__` separating nested keys (`HUSH_CACHE__REMOTE_BASE_URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("HUSH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base = self.cache.remote_base_url.trim();
        if base.is_empty() {
            return Err(CliError::Config(
                "remote base URL is required (set HUSH_CACHE__REMOTE_BASE_URL)".to_string(),
            ));
        }
        let url = Url::parse(base)
            .map_err(|e| CliError::Config(format!("invalid remote base URL {base:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CliError::Config(format!(
                "remote base URL must be http or https, got {}",
                url.scheme()
            )));
        }

        let volume = self.session.default_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(CliError::Config(format!(
                "session.default_volume must be between 0 and 1, got {volume}"
            )));
        }

        if self.session.timer_snap_minutes == 0 {
            return Err(CliError::Config(
                "session.timer_snap_minutes must be at least 1".to_string(),
            ));
        }

        if self.user.as_deref().is_some_and(|user| user.trim().is_empty()) {
            return Err(CliError::Config("user cannot be blank".to_string()));
        }

        Ok(())
    }

    pub fn history_path(&self) -> PathBuf {
        self.storage.data_dir.join("history.jsonl")
    }

    pub fn favorites_path(&self) -> PathBuf {
        self.storage.data_dir.join("favorites.jsonl")
    }
}

// Default values
fn default_cache() -> CacheConfig {
    CacheConfig::with_remote(String::new())
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        data_dir: default_data_dir(),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            cache: default_cache(),
            storage: default_storage(),
            logging: LoggingSettings::default(),
            user: None,
        }
    }
}
