//! Domain types for Hush

mod history;
mod ids;
mod media;
mod track;

pub use history::{HistoryEntry, TrackSummary, MIX_ICON, MIX_NAME};
pub use ids::{generate_mix_id, FavoriteId, TrackId, UserId};
pub use media::{
    DownloadProgress, LoadOptions, LocalFile, PlayerStatus, ProgressCallback, StatusCallback,
    StreamingSource,
};
pub use track::{Track, TrackKind};
