/// Types exchanged with the platform media stack and the audio source resolver
use futures_util::future::BoxFuture;
use std::fmt;
use std::time::Duration;

/// Options applied when a player resource is created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Initial volume (0.0 - 1.0)
    pub volume: f32,
    /// Restart from the beginning when the end is reached
    pub looping: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looping: true,
        }
    }
}

/// Status report pushed by a player resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStatus {
    pub is_loaded: bool,
    pub is_playing: bool,
    pub is_buffering: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub did_just_finish: bool,
    /// Runtime error message, if the platform reported one
    pub error: Option<String>,
}

/// Callback through which a player resource reports status changes
pub type StatusCallback = Box<dyn Fn(PlayerStatus) + Send + Sync>;

/// Download progress of a remote file into the local cache
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub bytes_received: u64,
    pub bytes_total: Option<u64>,
    /// Fraction complete (0.0 - 1.0), 0.0 when the total is unknown
    pub progress: f32,
}

/// Callback through which a resolver reports download progress
pub type ProgressCallback = Box<dyn Fn(DownloadProgress) + Send + Sync>;

/// Result of a local cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub exists: bool,
    pub uri: String,
}

/// Result of starting a stream-while-downloading resolution
///
/// `streaming_uri` is playable immediately. `local_uri` completes once the
/// background download has been written to the cache.
pub struct StreamingSource {
    pub streaming_uri: String,
    pub local_uri: BoxFuture<'static, crate::Result<String>>,
}

impl fmt::Debug for StreamingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingSource")
            .field("streaming_uri", &self.streaming_uri)
            .finish_non_exhaustive()
    }
}
