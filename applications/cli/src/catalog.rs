//! Turning command-line arguments into tracks

use crate::error::{CliError, Result};
use hush_core::Track;
use url::Url;

const SOUND_ICON: &str = "musical-note-outline";

/// Build a track from a positional argument
///
/// Arguments with an `http`, `https` or `file` scheme play that URI as-is.
/// Anything else is a remote storage path such as `whiteNoises_1.0/Rain.wav`
/// and goes through the cache.
pub fn track_from_arg(arg: &str) -> Result<Track> {
    let arg = arg.trim();
    if let Ok(url) = Url::parse(arg) {
        if matches!(url.scheme(), "http" | "https" | "file") {
            let stem = url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .map(file_stem)
                .filter(|stem| !stem.is_empty())
                .ok_or_else(|| CliError::InvalidTrack(format!("{arg} has no file name")))?;
            return Ok(Track::with_uri(stem, display_name(stem), url.as_str()));
        }
    }

    let file_name = arg.rsplit('/').next().unwrap_or_default();
    let stem = file_stem(file_name);
    if stem.is_empty() {
        return Err(CliError::InvalidTrack(format!("{arg:?} has no file name")));
    }
    Ok(Track::sound(stem, display_name(stem), SOUND_ICON, arg.trim_start_matches('/')))
}

/// Build a story track from its title
pub fn story(title: &str) -> Result<Track> {
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        return Err(CliError::InvalidTrack("story title cannot be empty".to_string()));
    }
    let id = format!("story-{}", title.to_lowercase().replace(' ', "-"));
    Ok(Track::story(id, title))
}

fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

fn display_name(stem: &str) -> String {
    stem.replace(['_', '-'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hush_core::TrackKind;

    #[test]
    fn remote_paths_become_sounds() {
        let track = track_from_arg("whiteNoises_1.0/Heavy_Rain.wav").unwrap();
        assert_eq!(track.id.as_str(), "Heavy_Rain");
        assert_eq!(track.display_name, "Heavy Rain");
        assert_eq!(track.kind, TrackKind::Sound);
        assert_eq!(track.remote_path.as_deref(), Some("whiteNoises_1.0/Heavy_Rain.wav"));
        assert_eq!(track.cache_file_name().as_deref(), Some("Heavy_Rain.wav"));
        assert!(track.source_uri.is_none());
    }

    #[test]
    fn uris_play_directly() {
        let track = track_from_arg("https://cdn.example.com/audio/ocean.mp3").unwrap();
        assert_eq!(track.id.as_str(), "ocean");
        assert_eq!(track.source_uri.as_deref(), Some("https://cdn.example.com/audio/ocean.mp3"));
        assert!(track.remote_path.is_none());
    }

    #[test]
    fn arguments_without_file_name_rejected() {
        assert!(track_from_arg("whiteNoises_1.0/").is_err());
        assert!(track_from_arg("https://cdn.example.com/").is_err());
        assert!(track_from_arg("").is_err());
    }

    #[test]
    fn stories_from_titles() {
        let track = story("  The Quiet   Forest ").unwrap();
        assert_eq!(track.id.as_str(), "story-the-quiet-forest");
        assert_eq!(track.remote_path.as_deref(), Some("Stories/The_Quiet_Forest.mp3"));
        assert_eq!(track.cache_file_name().as_deref(), Some("story_The_Quiet_Forest.mp3"));
        assert!(story("   ").is_err());
    }
}
