//! Error types for playback management

use hush_core::HushError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-track failure, shown in place of the track's controls
///
/// Never fatal to the session: sibling tracks keep playing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TrackError {
    /// No playable URI could be produced
    #[error("Resolution failed: {0}")]
    Resolution(String),

    /// The player resource could not be created
    #[error("Load failed: {0}")]
    Load(String),

    /// The player reported an error while running
    #[error("Playback failed: {0}")]
    Playback(String),
}

impl TrackError {
    /// Classify a collaborator error raised while resolving a source
    pub fn from_resolution(err: &HushError) -> Self {
        Self::Resolution(err.to_string())
    }

    /// Classify a collaborator error raised by the media backend while loading
    pub fn from_load(err: &HushError) -> Self {
        match err {
            HushError::Playback(msg) => Self::Playback(msg.clone()),
            other => Self::Load(other.to_string()),
        }
    }

    /// Classify a collaborator error raised by a running player
    pub fn from_playback(err: &HushError) -> Self {
        Self::Playback(err.to_string())
    }
}

/// Errors returned to callers of the session handle
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session task has shut down
    #[error("Playback session is closed")]
    SessionClosed,

    /// The operation needs a signed-in user
    #[error("Sign in required")]
    NotAuthenticated,

    /// The sound is already in the user's favorites
    #[error("Already in favorites")]
    AlreadyFavorite,

    /// The favorites store failed
    #[error("Favorites error: {0}")]
    Favorites(#[from] HushError),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
