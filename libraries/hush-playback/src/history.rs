//! History and favorites bridge
//!
//! Forwards "this was played" events to the external history recorder at
//! most once per dedup key per session lifetime, and builds favorites
//! entries for the current track set.

use crate::error::{Result, SessionError};
use hush_core::{
    FavoriteId, FavoritesStore, HistoryEntry, HistoryRecorder, Track, UserId,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Remembers which history events were already sent
///
/// Cleared whenever the session is closed.
#[derive(Debug, Clone, Default)]
pub struct HistoryBridge {
    recorded: HashSet<String>,
}

impl HistoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// History entry to record for an open, if it was not recorded yet
    ///
    /// Single-track opens are keyed by the track id; multi-track opens get a
    /// fresh mix id and therefore always produce an entry.
    pub fn entry_for_open(&mut self, tracks: &[Track]) -> Option<HistoryEntry> {
        let entry = HistoryEntry::for_tracks(tracks)?;
        if self.recorded.insert(entry.item_id().to_string()) {
            Some(entry)
        } else {
            debug!(item_id = entry.item_id(), "History already recorded for this session");
            None
        }
    }

    pub fn has_recorded(&self, item_id: &str) -> bool {
        self.recorded.contains(item_id)
    }

    /// Forget everything recorded so far
    pub fn reset(&mut self) {
        self.recorded.clear();
    }
}

/// Record a history entry without waiting for the result
///
/// Failures are logged and dropped; they are never retried.
pub(crate) fn record_in_background(
    recorder: Arc<dyn HistoryRecorder>,
    user: UserId,
    entry: HistoryEntry,
) {
    tokio::spawn(async move {
        let item_id = entry.item_id().to_string();
        match recorder.record(&user, entry).await {
            Ok(()) => debug!(user = %user, item_id = %item_id, "History recorded"),
            Err(err) => {
                warn!(user = %user, item_id = %item_id, error = %err, "Failed to record history");
            }
        }
    });
}

/// Save the given tracks as a favorite of `user`
///
/// A single sound is checked against existing favorites first; mixes are
/// always saved under a fresh id. Returns `Ok(None)` for an empty set.
pub(crate) async fn save_favorite(
    store: Arc<dyn FavoritesStore>,
    user: UserId,
    tracks: Vec<Track>,
) -> Result<Option<FavoriteId>> {
    let Some(entry) = HistoryEntry::for_tracks(&tracks) else {
        return Ok(None);
    };

    if let HistoryEntry::Sound { track, .. } = &entry {
        if store.find_favorite(&user, &track.id).await?.is_some() {
            return Err(SessionError::AlreadyFavorite);
        }
    }

    let item_id = entry.item_id().to_string();
    let favorite = store.add_favorite(&user, entry).await?;
    debug!(user = %user, item_id = %item_id, favorite = %favorite, "Saved favorite");
    Ok(Some(favorite))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rain() -> Track {
        Track::sound("rain", "Rain", "rainy-outline", "whiteNoises_1.0/Rain.wav")
    }

    fn birds() -> Track {
        Track::sound("birds", "Birds", "leaf-outline", "whiteNoises_1.0/Birds.wav")
    }

    #[test]
    fn single_track_recorded_once() {
        let mut bridge = HistoryBridge::new();
        assert!(bridge.entry_for_open(&[rain()]).is_some());
        assert!(bridge.entry_for_open(&[rain()]).is_none());
        assert!(bridge.has_recorded("rain"));
    }

    #[test]
    fn reset_allows_recording_again() {
        let mut bridge = HistoryBridge::new();
        assert!(bridge.entry_for_open(&[rain()]).is_some());
        bridge.reset();
        assert!(!bridge.has_recorded("rain"));
        assert!(bridge.entry_for_open(&[rain()]).is_some());
    }

    #[test]
    fn mixes_get_fresh_keys() {
        let mut bridge = HistoryBridge::new();
        let first = bridge.entry_for_open(&[rain(), birds()]).unwrap();
        let second = bridge.entry_for_open(&[rain(), birds()]).unwrap();
        assert_ne!(first.item_id(), second.item_id());
    }

    #[test]
    fn empty_open_records_nothing() {
        let mut bridge = HistoryBridge::new();
        assert!(bridge.entry_for_open(&[]).is_none());
    }
}
