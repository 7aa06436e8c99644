//! Caching audio source resolver
//!
//! Cached files are served from the cache directory as `file://` URIs.
//! Anything else streams straight from remote storage while a background
//! task downloads it into the cache.

use crate::config::CacheConfig;
use crate::download::download_file;
use crate::error::{CacheError, Result};
use async_trait::async_trait;
use futures_util::FutureExt;
use hush_core::{AudioSourceResolver, HushError, LocalFile, ProgressCallback, StreamingSource};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

/// Resolves tracks against a local cache directory and remote storage
#[derive(Debug, Clone)]
pub struct CachingResolver {
    http: Client,
    base_url: Url,
    cache_dir: PathBuf,
}

impl CachingResolver {
    /// Create a resolver from configuration
    ///
    /// The base URL must be `http` or `https`.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.remote_base_url)?;

        let http = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(format!("Hush/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            cache_dir: absolute(&config.cache_dir)?,
        })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path a cached copy of `file_ref` lives at
    ///
    /// `file_ref` must be a bare file name.
    pub fn cache_path(&self, file_ref: &str) -> Result<PathBuf> {
        let is_bare = Path::new(file_ref)
            .file_name()
            .is_some_and(|name| name == file_ref);
        if file_ref.is_empty() || !is_bare {
            return Err(CacheError::InvalidUrl(format!(
                "cache file name {file_ref:?} must not contain a path"
            )));
        }
        Ok(self.cache_dir.join(file_ref))
    }

    /// URL a remote storage path is streamed from
    pub fn streaming_url(&self, remote_path: &str) -> Result<Url> {
        let remote_path = remote_path.trim_start_matches('/');
        if remote_path.is_empty() {
            return Err(CacheError::InvalidUrl("empty remote path".to_string()));
        }
        self.base_url
            .join(remote_path)
            .map_err(|e| CacheError::InvalidUrl(format!("{remote_path}: {e}")))
    }

    /// Look up `file_ref` in the cache
    pub async fn lookup(&self, file_ref: &str) -> Result<LocalFile> {
        let path = self.cache_path(file_ref)?;
        let exists = tokio::fs::try_exists(&path).await?;
        Ok(LocalFile {
            exists,
            uri: file_uri(&path)?,
        })
    }

    /// Start streaming `remote_path` and caching it as `file_ref`
    pub fn stream(
        &self,
        remote_path: &str,
        file_ref: &str,
        progress: Option<ProgressCallback>,
    ) -> Result<StreamingSource> {
        let url = self.streaming_url(remote_path)?;
        let dest = self.cache_path(file_ref)?;
        let local_uri = file_uri(&dest)?;

        let http = self.http.clone();
        let source_url = url.clone();
        let download = tokio::spawn(async move {
            download_file(&http, &source_url, &dest, progress).await
        });

        let local = async move {
            match download.await {
                Ok(Ok(_)) => Ok(local_uri),
                Ok(Err(err)) => Err(HushError::from(err)),
                Err(join) => Err(HushError::from(CacheError::DownloadAborted(join.to_string()))),
            }
        }
        .boxed();

        debug!(url = %url, "Streaming while caching");
        Ok(StreamingSource {
            streaming_uri: url.to_string(),
            local_uri: local,
        })
    }
}

#[async_trait]
impl AudioSourceResolver for CachingResolver {
    async fn resolve_local(&self, file_ref: &str) -> hush_core::Result<LocalFile> {
        Ok(self.lookup(file_ref).await?)
    }

    async fn resolve_streaming(
        &self,
        remote_path: &str,
        file_ref: &str,
        progress: Option<ProgressCallback>,
    ) -> hush_core::Result<StreamingSource> {
        self.stream(remote_path, file_ref, progress).map_err(|err| {
            warn!(remote_path = %remote_path, error = %err, "Cannot stream audio");
            HushError::from(err)
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CacheError::InvalidUrl("base URL cannot be empty".to_string()));
    }
    // A trailing slash makes `join` append instead of replacing the last segment
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&with_slash).map_err(|e| CacheError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CacheError::InvalidUrl(format!(
            "base URL must be http or https, got {other}"
        ))),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn file_uri(path: &Path) -> Result<String> {
    Url::from_file_path(path)
        .map(String::from)
        .map_err(|()| CacheError::InvalidUrl(format!("{} is not an absolute path", path.display())))
}
