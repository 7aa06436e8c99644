//! Core types for playback sessions

use crate::error::TrackError;
use crate::visibility::SessionVisibility;
use hush_core::{Track, TrackId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Identity of one track handle
///
/// Every handle created by a session gets a fresh id. Worker events and
/// late completions carry the id they were issued for, and the session
/// ignores anything whose id no longer matches the live handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(pub(crate) u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Lifecycle state of a track handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleState {
    /// Player resource is being created
    Loading,
    /// Loaded and paused at the start
    Ready,
    /// Currently playing
    Playing,
    /// Paused mid-track
    Paused,
    /// Load or playback failed; terminal until disposed
    Failed,
    /// Resource released
    Unloaded,
}

impl HandleState {
    /// Whether the player resource exists and accepts transport commands
    pub fn is_active(self) -> bool {
        matches!(self, Self::Ready | Self::Playing | Self::Paused)
    }
}

/// What the UI should show for one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackStatus {
    /// Waiting for the session to become visible before loading
    Idle,
    /// Looking up a playable URI
    Resolving,
    /// Player resource is being created
    Loading,
    /// Loaded, not yet started
    Ready,
    /// Playing
    Playing,
    /// Paused
    Paused,
    /// Failed; the UI shows a retry affordance
    Failed(TrackError),
}

impl TrackStatus {
    /// Whether the track is still on its way to a loaded player
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Resolving | Self::Loading)
    }

    /// Whether the track ended up in an error state
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Whether a player resource was successfully loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Ready | Self::Playing | Self::Paused)
    }
}

/// One track as seen by observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackView {
    pub track: Track,
    pub status: TrackStatus,
    /// Effective volume (explicit level or the session default)
    pub volume: f32,
    /// Live handle, if one exists
    pub handle_id: Option<HandleId>,
    pub buffering: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    /// Background download progress while streaming (0.0 - 1.0)
    pub download_progress: Option<f32>,
}

/// Read-only view of the whole session, published after every change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Tracks in display order
    pub tracks: Vec<TrackView>,
    pub is_playing: bool,
    pub is_buffering: bool,
    /// Any track still resolving or loading
    pub is_loading: bool,
    pub visibility: SessionVisibility,
    /// The full-screen player is open
    pub full_player_open: bool,
    /// Explicitly set volumes
    pub volumes: HashMap<TrackId, f32>,
    /// Time left on the sleep timer, if armed
    pub timer_remaining: Option<Duration>,
}

impl SessionSnapshot {
    /// Snapshot of a fresh, hidden, empty session
    pub fn empty() -> Self {
        Self {
            tracks: Vec::new(),
            is_playing: false,
            is_buffering: false,
            is_loading: false,
            visibility: SessionVisibility::Hidden,
            full_player_open: false,
            volumes: HashMap::new(),
            timer_remaining: None,
        }
    }

    /// Look up a track by id
    pub fn track(&self, id: &str) -> Option<&TrackView> {
        self.tracks.iter().find(|view| view.track.id.as_str() == id)
    }

    /// Track ids in display order
    pub fn track_ids(&self) -> Vec<&str> {
        self.tracks.iter().map(|view| view.track.id.as_str()).collect()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay before a pending play/pause shows the buffering indicator (default: 150)
    pub buffering_debounce_ms: u64,

    /// Sleep timer check interval (default: 1000)
    pub timer_tick_ms: u64,

    /// Volume for tracks without an explicit level (default: 1.0)
    pub default_volume: f32,

    /// Loop ambient sounds (default: true)
    pub loop_tracks: bool,

    /// Largest sleep timer the selector offers, in minutes (default: 120)
    pub max_timer_minutes: u32,

    /// Sleep timer selector step, in minutes (default: 5)
    pub timer_snap_minutes: u32,

    /// Skip forward/back distance (default: 10000)
    pub skip_interval_ms: u64,
}

impl SessionConfig {
    pub fn buffering_debounce(&self) -> Duration {
        Duration::from_millis(self.buffering_debounce_ms)
    }

    pub fn timer_tick(&self) -> Duration {
        Duration::from_millis(self.timer_tick_ms.max(1))
    }

    pub fn skip_interval(&self) -> Duration {
        Duration::from_millis(self.skip_interval_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffering_debounce_ms: 150,
            timer_tick_ms: 1000,
            default_volume: 1.0,
            loop_tracks: true,
            max_timer_minutes: 120,
            timer_snap_minutes: 5,
            skip_interval_ms: 10_000,
        }
    }
}
