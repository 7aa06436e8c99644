/// History and favorites payloads
use super::ids::generate_mix_id;
use super::track::{Track, TrackKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name given to ad-hoc mixes
pub const MIX_NAME: &str = "Custom Mix";

/// Icon given to ad-hoc mixes
pub const MIX_ICON: &str = "musical-notes-outline";

/// Presentation data of a track, as stored in history and favorites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub kind: TrackKind,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.to_string(),
            name: track.display_name.clone(),
            icon: track.icon_ref.clone(),
            kind: track.kind,
        }
    }
}

/// A single listening event or saved favorite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HistoryEntry {
    /// One sound or story played on its own
    Sound {
        #[serde(flatten)]
        track: TrackSummary,
        played_at: DateTime<Utc>,
    },

    /// Several sounds played together
    Mix {
        id: String,
        name: String,
        icon: String,
        sounds: Vec<TrackSummary>,
        played_at: DateTime<Utc>,
    },
}

impl HistoryEntry {
    /// Entry for a single track
    pub fn single(track: &Track) -> Self {
        Self::Sound {
            track: track.into(),
            played_at: Utc::now(),
        }
    }

    /// Entry for a set of tracks under a fresh synthetic mix id
    pub fn mix(tracks: &[Track]) -> Self {
        Self::Mix {
            id: generate_mix_id(),
            name: MIX_NAME.to_string(),
            icon: MIX_ICON.to_string(),
            sounds: tracks.iter().map(TrackSummary::from).collect(),
            played_at: Utc::now(),
        }
    }

    /// Entry for whatever set of tracks is given: single or mix
    ///
    /// Returns `None` for an empty set.
    pub fn for_tracks(tracks: &[Track]) -> Option<Self> {
        match tracks {
            [] => None,
            [track] => Some(Self::single(track)),
            many => Some(Self::mix(many)),
        }
    }

    /// Identifier of the entry (track id or mix id)
    pub fn item_id(&self) -> &str {
        match self {
            Self::Sound { track, .. } => &track.id,
            Self::Mix { id, .. } => id,
        }
    }
}
