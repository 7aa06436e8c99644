//! Error types for the audio cache

use hush_core::HushError;
use thiserror::Error;

/// Errors that can occur while looking up or filling the local cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Storage answered with an error status
    #[error("Download of {url} failed with status {status}")]
    Http { status: u16, url: String },

    /// IO error while writing the cache
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid base URL, remote path or cache file name
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The download task ended before the file was complete
    #[error("Download aborted: {0}")]
    DownloadAborted(String),
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

impl From<CacheError> for HushError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Io(io) => HushError::Io(io),
            CacheError::InvalidUrl(msg) => HushError::Resolution(msg),
            other => HushError::Network(other.to_string()),
        }
    }
}
