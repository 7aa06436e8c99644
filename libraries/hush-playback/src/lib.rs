//! Hush - Playback Session
//!
//! Multi-sound playback session shared by every UI surface of the app.
//!
//! This crate provides:
//! - Concurrent playback of any number of tracks, each with its own volume
//! - One global play/pause state applied to every track
//! - Track set replacement that never restarts tracks already playing
//! - Stream-while-downloading source resolution with per-track failures
//! - A sleep timer that pauses playback when it runs out
//! - Mini player / full player visibility
//! - Deduplicated listening history and favorites
//!
//! # Architecture
//!
//! The session runs as a single Tokio task that owns all state. UI surfaces
//! hold cloneable [`SessionHandle`]s: mutations are sent as commands, state
//! is observed through [`SessionSnapshot`]s published on a `watch` channel,
//! and one-shot alerts arrive as [`SessionNotification`]s.
//!
//! Each loaded track is driven by a worker task that exclusively owns its
//! platform player and applies commands in the order they were issued.
//! Platform specifics (media stack, storage, auth, history) are supplied via
//! the traits in `hush-core`.
//!
//! # Example
//!
//! ```rust,no_run
//! use hush_core::Track;
//! use hush_playback::{Collaborators, PlaybackSession, SessionConfig};
//!
//! # async fn example(deps: Collaborators) -> hush_playback::Result<()> {
//! let session = PlaybackSession::spawn(SessionConfig::default(), deps);
//!
//! session.open(vec![
//!     Track::sound("rain", "Rain", "rainy-outline", "whiteNoises_1.0/Rain.wav"),
//!     Track::sound("birds", "Birds", "leaf-outline", "whiteNoises_1.0/Birds.wav"),
//! ])?;
//! session.set_track_volume("rain", 0.3)?;
//! session.start_timer(30)?;
//!
//! let snapshot = session.wait_for(|s| !s.is_loading).await?;
//! println!("{} tracks playing", snapshot.tracks.len());
//!
//! session.close(true)?;
//! # Ok(())
//! # }
//! ```

mod buffering;
mod commands;
mod error;
mod events;
mod history;
mod resolve;
mod session;
mod session_handle;
mod timer;
mod track_handle;
pub mod types;
mod visibility;
mod volume;

// Public exports
pub use buffering::{BufferingIndicator, Debounce};
pub use error::{Result, SessionError, TrackError};
pub use events::{SessionNotification, ToggleTicket};
pub use history::HistoryBridge;
pub use session::{Collaborators, PlaybackSession};
pub use session_handle::SessionHandle;
pub use timer::{format_remaining, snap_timer_minutes, SleepTimer, TimerState, TimerTick};
pub use track_handle::TrackHandle;
pub use types::{
    HandleId, HandleState, SessionConfig, SessionSnapshot, TrackStatus, TrackView,
};
pub use visibility::{HideOutcome, SessionVisibility, VisibilityController};
pub use volume::{clamp_volume, Volumes};
