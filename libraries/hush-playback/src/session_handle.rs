//! Cloneable handle to a running playback session
//!
//! Every UI surface holds its own clone. Mutations are sent as commands and
//! applied by the session task in arrival order; state is read through the
//! latest [`SessionSnapshot`] or a `watch` subscription.

use crate::commands::SessionCommand;
use crate::error::{Result, SessionError};
use crate::events::SessionNotification;
use crate::types::SessionSnapshot;
use hush_core::{FavoriteId, Track, TrackId};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Handle to a playback session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    snapshot: watch::Receiver<SessionSnapshot>,
    notifications: broadcast::Sender<SessionNotification>,
}

impl SessionHandle {
    pub(crate) fn new(
        commands: mpsc::UnboundedSender<SessionCommand>,
        snapshot: watch::Receiver<SessionSnapshot>,
        notifications: broadcast::Sender<SessionNotification>,
    ) -> Self {
        Self {
            commands,
            snapshot,
            notifications,
        }
    }

    /// Show the mini player and play `tracks`
    ///
    /// Tracks already in the session keep their handles and are not
    /// restarted. Tracks not listed are removed.
    pub fn open(&self, tracks: Vec<Track>) -> Result<()> {
        self.send(SessionCommand::Open(tracks))
    }

    /// Replace the track list without touching visibility or play state
    ///
    /// A new URI for a track that already has a handle only updates its
    /// metadata; the player is not reloaded.
    pub fn update(&self, tracks: Vec<Track>) -> Result<()> {
        self.send(SessionCommand::Update(tracks))
    }

    /// Flip between playing and paused for every track
    pub fn toggle_play(&self) -> Result<()> {
        self.send(SessionCommand::TogglePlay)
    }

    pub fn play(&self) -> Result<()> {
        self.send(SessionCommand::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(SessionCommand::Pause)
    }

    /// Set one track's volume; clamped to `[0.0, 1.0]`
    pub fn set_track_volume(&self, id: impl Into<TrackId>, volume: f32) -> Result<()> {
        self.send(SessionCommand::SetTrackVolume {
            id: id.into(),
            volume,
        })
    }

    /// Remove one track; removing the last one clears the session
    pub fn remove(&self, id: impl Into<TrackId>) -> Result<()> {
        self.send(SessionCommand::Remove(id.into()))
    }

    /// Hide the session, optionally releasing every track
    pub fn close(&self, clear_tracks: bool) -> Result<()> {
        self.send(SessionCommand::Close { clear_tracks })
    }

    pub fn show_minimized(&self) -> Result<()> {
        self.send(SessionCommand::ShowMinimized)
    }

    pub fn show_full_screen(&self) -> Result<()> {
        self.send(SessionCommand::ShowFullScreen)
    }

    /// Pause playback after `minutes`, replacing any running timer
    pub fn start_timer(&self, minutes: u32) -> Result<()> {
        self.send(SessionCommand::StartTimer { minutes })
    }

    pub fn cancel_timer(&self) -> Result<()> {
        self.send(SessionCommand::CancelTimer)
    }

    /// Seek one track; clamped to its duration when known
    pub fn seek(&self, id: impl Into<TrackId>, position: Duration) -> Result<()> {
        self.send(SessionCommand::Seek {
            id: id.into(),
            position,
        })
    }

    /// Skip one track forward or back by the configured interval
    pub fn skip(&self, id: impl Into<TrackId>, forward: bool) -> Result<()> {
        self.send(SessionCommand::Skip {
            id: id.into(),
            forward,
        })
    }

    /// Resolve and load a failed track again
    pub fn retry(&self, id: impl Into<TrackId>) -> Result<()> {
        self.send(SessionCommand::Retry(id.into()))
    }

    /// Save the current tracks as a favorite
    ///
    /// Returns `Ok(None)` when the session is empty.
    ///
    /// # Errors
    /// `NotAuthenticated` without a signed-in user, `AlreadyFavorite` when a
    /// single sound is already saved, `Favorites` when the store fails.
    pub async fn add_to_favorites(&self) -> Result<Option<FavoriteId>> {
        let (reply, response) = oneshot::channel();
        self.send(SessionCommand::AddToFavorites(reply))?;
        response.await.map_err(|_| SessionError::SessionClosed)?
    }

    /// Latest published state
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver that is notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    /// Receiver for one-shot alerts
    pub fn notifications(&self) -> broadcast::Receiver<SessionNotification> {
        self.notifications.subscribe()
    }

    /// Wait until the published state satisfies `predicate`
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot> {
        let mut receiver = self.snapshot.clone();
        let snapshot = receiver
            .wait_for(|snapshot| predicate(snapshot))
            .await
            .map_err(|_| SessionError::SessionClosed)?;
        Ok(snapshot.clone())
    }

    /// Release every player and stop the session task
    ///
    /// Resolves once every player has been unloaded.
    pub async fn shutdown(&self) -> Result<()> {
        let (done, finished) = oneshot::channel();
        self.send(SessionCommand::Shutdown(done))?;
        finished.await.map_err(|_| SessionError::SessionClosed)
    }

    fn send(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::SessionClosed)
    }
}
