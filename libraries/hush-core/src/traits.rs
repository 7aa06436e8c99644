/// Collaborator traits for the Hush playback core
///
/// Everything the session needs from the outside world is expressed here:
/// the platform media stack, where audio comes from, who is signed in, and
/// where listening history and favorites are kept.
use crate::error::Result;
use crate::types::{
    FavoriteId, HistoryEntry, LoadOptions, LocalFile, ProgressCallback, StatusCallback,
    StreamingSource, UserId,
};
use async_trait::async_trait;
use std::time::Duration;

/// Platform media stack
///
/// Creates player resources from URIs. Decoding and mixing happen behind
/// this trait; the core only drives transport controls.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Create a player for `uri`
    ///
    /// The returned player starts paused. `status` is invoked by the
    /// platform whenever buffering, position or error state changes.
    ///
    /// # Errors
    /// Returns `HushError::Load` if the resource cannot be created
    async fn load(
        &self,
        uri: &str,
        options: LoadOptions,
        status: StatusCallback,
    ) -> Result<Box<dyn MediaPlayer>>;
}

/// One loaded player resource
///
/// Exclusively owned by a single track handle.
#[async_trait]
pub trait MediaPlayer: Send {
    /// Start or resume playback
    async fn play(&mut self) -> Result<()>;

    /// Pause playback
    async fn pause(&mut self) -> Result<()>;

    /// Stop playback and rewind
    async fn stop(&mut self) -> Result<()>;

    /// Set the volume (0.0 = silent, 1.0 = full volume)
    async fn set_volume(&mut self, volume: f32) -> Result<()>;

    /// Seek to a position from the start
    async fn seek(&mut self, position: Duration) -> Result<()>;

    /// Release the native resource
    async fn unload(&mut self) -> Result<()>;
}

/// Produces playable URIs for tracks
///
/// A local cache hit is playable right away. Otherwise a streaming URI is
/// handed out immediately while the file downloads in the background.
#[async_trait]
pub trait AudioSourceResolver: Send + Sync {
    /// Look up `file_ref` in the local cache
    async fn resolve_local(&self, file_ref: &str) -> Result<LocalFile>;

    /// Start streaming `remote_path` while caching it as `file_ref`
    ///
    /// # Errors
    /// Returns `HushError::Resolution` if no streaming URI can be produced
    async fn resolve_streaming(
        &self,
        remote_path: &str,
        file_ref: &str,
        progress: Option<ProgressCallback>,
    ) -> Result<StreamingSource>;
}

/// Records listening history
#[async_trait]
pub trait HistoryRecorder: Send + Sync {
    /// Record one listening event for `user`
    async fn record(&self, user: &UserId, entry: HistoryEntry) -> Result<()>;
}

/// Stores favorite sounds and mixes
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Save an entry as a favorite of `user`
    async fn add_favorite(&self, user: &UserId, entry: HistoryEntry) -> Result<FavoriteId>;

    /// Find an existing favorite for a sound id
    async fn find_favorite(&self, user: &UserId, item_id: &str) -> Result<Option<FavoriteId>>;
}

/// Current authentication state
pub trait AuthContext: Send + Sync {
    /// ID of the signed-in user, if any
    fn current_user_id(&self) -> Option<UserId>;
}

/// Authentication context with a fixed user (or none)
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<UserId>,
}

impl StaticAuth {
    /// Signed in as `user`
    pub fn signed_in(user: impl Into<String>) -> Self {
        Self {
            user: Some(UserId::new(user)),
        }
    }

    /// Nobody signed in
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl AuthContext for StaticAuth {
    fn current_user_id(&self) -> Option<UserId> {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_auth_reports_user() {
        assert_eq!(
            StaticAuth::signed_in("u1").current_user_id(),
            Some(UserId::new("u1"))
        );
        assert_eq!(StaticAuth::anonymous().current_user_id(), None);
    }
}
