//! Commands sent from session handles to the session task

use crate::error::Result;
use hush_core::{FavoriteId, Track, TrackId};
use std::time::Duration;
use tokio::sync::oneshot;

/// One mutation request, applied by the session task in arrival order
#[derive(Debug)]
pub(crate) enum SessionCommand {
    Open(Vec<Track>),
    Update(Vec<Track>),
    TogglePlay,
    Play,
    Pause,
    SetTrackVolume { id: TrackId, volume: f32 },
    Remove(TrackId),
    Close { clear_tracks: bool },
    ShowMinimized,
    ShowFullScreen,
    StartTimer { minutes: u32 },
    CancelTimer,
    Seek { id: TrackId, position: Duration },
    Skip { id: TrackId, forward: bool },
    Retry(TrackId),
    AddToFavorites(oneshot::Sender<Result<Option<FavoriteId>>>),
    /// Release every player and stop the session task
    Shutdown(oneshot::Sender<()>),
}
