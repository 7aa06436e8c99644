//! Session events
//!
//! `SessionNotification`s are one-shot alerts broadcast to every UI surface
//! (timer set/ended, a track failed, the player hid itself). Continuous
//! state goes through `SessionSnapshot` instead.
//!
//! `SessionMessage`s are internal: completions from handle workers and
//! resolution tasks delivered back onto the session task.

use crate::error::TrackError;
use crate::types::{HandleId, HandleState};
use hush_core::{PlayerStatus, TrackId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Alerts raised by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionNotification {
    /// Sleep timer armed ("Timer Set")
    TimerStarted {
        /// Countdown length
        duration: Duration,
    },

    /// Sleep timer cancelled by the user ("Timer Cancelled")
    TimerCancelled,

    /// Sleep timer ran out and playback was stopped ("Timer Ended")
    TimerExpired,

    /// A track could not be resolved, loaded or played
    TrackFailed {
        track_id: TrackId,
        error: TrackError,
    },

    /// The background download of a streamed track finished
    LocalCopyReady { track_id: TrackId },

    /// Every track failed, so the player hid itself
    AutoHidden,
}

/// Identifies one global play/pause toggle
///
/// The first handle to settle a command carrying the current ticket clears
/// the buffering indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToggleTicket(pub(crate) u64);

/// Worker-side events for one handle
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HandleEvent {
    State(HandleState),
    Status(PlayerStatus),
    Failed(TrackError),
    /// A play or pause command finished (successfully or not)
    TransportSettled(Option<ToggleTicket>),
}

/// Event from a handle worker, tagged with the handle it belongs to
#[derive(Debug, Clone)]
pub(crate) struct HandleMessage {
    pub track_id: TrackId,
    pub handle_id: HandleId,
    pub event: HandleEvent,
}

/// Completions delivered back onto the session task
#[derive(Debug)]
pub(crate) enum SessionMessage {
    Handle(HandleMessage),

    /// A resolution task finished
    Resolved {
        track_id: TrackId,
        ticket: u64,
        result: Result<String, TrackError>,
    },

    /// Background download progress for a streamed track
    DownloadProgress { track_id: TrackId, progress: f32 },

    /// A streamed track now has a local cache copy
    LocalReady {
        track_id: TrackId,
        ticket: u64,
        uri: String,
    },
}
