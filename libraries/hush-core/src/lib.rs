//! Hush Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! the Hush libraries and applications.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `UserId`, `HistoryEntry`
//! - **Collaborator Traits**: `MediaBackend`, `MediaPlayer`,
//!   `AudioSourceResolver`, `HistoryRecorder`, `FavoritesStore`, `AuthContext`
//! - **Error Handling**: Unified `HushError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use hush_core::types::{HistoryEntry, Track};
//!
//! let rain = Track::sound("25", "Rain", "rainy-outline", "whiteNoises_1.0/Rain.wav");
//! assert_eq!(rain.cache_file_name().as_deref(), Some("Rain.wav"));
//!
//! let entry = HistoryEntry::for_tracks(&[rain]).unwrap();
//! assert_eq!(entry.item_id(), "25");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{HushError, Result};
pub use traits::{
    AudioSourceResolver, AuthContext, FavoritesStore, HistoryRecorder, MediaBackend, MediaPlayer,
    StaticAuth,
};
pub use types::{
    DownloadProgress, FavoriteId, HistoryEntry, LoadOptions, LocalFile, PlayerStatus,
    ProgressCallback, StatusCallback, StreamingSource, Track, TrackId, TrackKind, TrackSummary,
    UserId,
};
