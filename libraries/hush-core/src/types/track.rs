/// Track types
use super::ids::TrackId;
use serde::{Deserialize, Serialize};

/// What kind of audio a track is
///
/// Ambient sounds loop indefinitely and can be mixed; stories are played
/// once from start to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Ambient sound (rain, fan, waves, ...)
    Sound,
    /// Bedtime story narration
    Story,
}

/// One playable sound or story
///
/// `source_uri` is the best-known playable URI. It starts out empty for
/// tracks that still need resolving, holds a streaming URL while a download
/// is in flight, and is replaced by a local cache URI once that lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier, unique within a session
    pub id: TrackId,

    /// Name shown in the players
    pub display_name: String,

    /// Icon reference (opaque to the playback core)
    pub icon_ref: String,

    /// Sound or story
    pub kind: TrackKind,

    /// Path of the audio file in remote storage
    pub remote_path: Option<String>,

    /// Current best-known playable URI
    pub source_uri: Option<String>,
}

impl Track {
    /// Create an ambient sound track backed by a remote storage path
    pub fn sound(
        id: impl Into<TrackId>,
        display_name: impl Into<String>,
        icon_ref: impl Into<String>,
        remote_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            icon_ref: icon_ref.into(),
            kind: TrackKind::Sound,
            remote_path: Some(remote_path.into()),
            source_uri: None,
        }
    }

    /// Create a story track from its title
    ///
    /// The remote path is derived from the title: `Stories/<Title_With_Underscores>.mp3`.
    pub fn story(id: impl Into<TrackId>, title: impl Into<String>) -> Self {
        let title = title.into();
        let remote_path = format!("Stories/{}.mp3", underscored(&title));
        Self {
            id: id.into(),
            display_name: title,
            icon_ref: "book-outline".to_string(),
            kind: TrackKind::Story,
            remote_path: Some(remote_path),
            source_uri: None,
        }
    }

    /// Create a track with an already-known playable URI
    pub fn with_uri(
        id: impl Into<TrackId>,
        display_name: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            icon_ref: String::new(),
            kind: TrackKind::Sound,
            remote_path: None,
            source_uri: Some(uri.into()),
        }
    }

    /// Return a copy of this track pointing at a different URI
    pub fn with_source_uri(&self, uri: impl Into<String>) -> Self {
        Self {
            source_uri: Some(uri.into()),
            ..self.clone()
        }
    }

    /// File name used for the local cache copy
    ///
    /// Sounds use the last segment of their remote path; stories use
    /// `story_<Title_With_Underscores>.mp3`.
    pub fn cache_file_name(&self) -> Option<String> {
        match self.kind {
            TrackKind::Story => Some(format!("story_{}.mp3", underscored(&self.display_name))),
            TrackKind::Sound => self
                .remote_path
                .as_deref()
                .and_then(|path| path.rsplit('/').next())
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        }
    }

    /// Whether this track should loop when played
    pub fn loops(&self) -> bool {
        self.kind == TrackKind::Sound
    }
}

/// Replace every whitespace run with a single underscore
fn underscored(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("_")
}
