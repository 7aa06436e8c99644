/// Core error types for Hush
use thiserror::Error;

/// Result type alias using `HushError`
pub type Result<T> = std::result::Result<T, HushError>;

/// Error type shared by every collaborator of the playback session
///
/// Resolvers, media backends, history recorders and favorites stores all
/// report failures through this type. The session decides how each kind is
/// surfaced (per-track status, log line, or caller error).
#[derive(Error, Debug)]
pub enum HushError {
    /// No playable URI could be produced for a track
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// A player resource could not be created from a URI
    #[error("Load error: {0}")]
    Load(String),

    /// A loaded player reported a runtime failure
    #[error("Playback error: {0}")]
    Playback(String),

    /// Recording a history event failed
    #[error("History error: {0}")]
    History(String),

    /// Reading or writing favorites failed
    #[error("Favorites error: {0}")]
    Favorites(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl HushError {
    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a load error
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create a history error
    pub fn history(msg: impl Into<String>) -> Self {
        Self::History(msg.into())
    }

    /// Create a favorites error
    pub fn favorites(msg: impl Into<String>) -> Self {
        Self::Favorites(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_format_messages() {
        assert_eq!(
            HushError::resolution("no remote path").to_string(),
            "Resolution error: no remote path"
        );
        assert_eq!(HushError::load("bad uri").to_string(), "Load error: bad uri");
    }

    #[test]
    fn io_errors_are_transparent() {
        let err: HushError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.to_string(), "gone");
    }
}
