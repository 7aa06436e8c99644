//! Session visibility
//!
//! The same session is presented either as a minimized mini player or as a
//! full-screen "now playing" player. The enum says which surface is showing;
//! `full_player_open` mirrors the independent flag the full player sets so
//! other surfaces can avoid rendering a duplicate mini player.

use serde::{Deserialize, Serialize};

/// Which surface currently presents the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionVisibility {
    /// Nothing shown (tracks may still be kept for a later restore)
    #[default]
    Hidden,
    /// Mini player shown
    Minimized,
    /// Full-screen player shown
    FullScreen,
}

/// What the session must do with its tracks after hiding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideOutcome {
    /// Tracks and handles are kept for a later restore
    KeepTracks,
    /// Tracks and handles must be released
    ClearTracks,
}

/// Pure state holder for session visibility
#[derive(Debug, Clone, Default)]
pub struct VisibilityController {
    visibility: SessionVisibility,
    full_player_open: bool,
}

impl VisibilityController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the mini player (closes the full player)
    pub fn show_minimized(&mut self) {
        self.visibility = SessionVisibility::Minimized;
        self.full_player_open = false;
    }

    /// Show the full-screen player
    pub fn show_full_screen(&mut self) {
        self.visibility = SessionVisibility::FullScreen;
        self.full_player_open = true;
    }

    /// Hide every surface
    pub fn hide(&mut self, clear_tracks: bool) -> HideOutcome {
        self.visibility = SessionVisibility::Hidden;
        self.full_player_open = false;
        if clear_tracks {
            HideOutcome::ClearTracks
        } else {
            HideOutcome::KeepTracks
        }
    }

    pub fn visibility(&self) -> SessionVisibility {
        self.visibility
    }

    /// Whether any surface is showing
    pub fn is_visible(&self) -> bool {
        self.visibility != SessionVisibility::Hidden
    }

    pub fn full_player_open(&self) -> bool {
        self.full_player_open
    }

    /// Whether the mini player should render
    pub fn mini_player_visible(&self) -> bool {
        self.visibility == SessionVisibility::Minimized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden() {
        let controller = VisibilityController::new();
        assert_eq!(controller.visibility(), SessionVisibility::Hidden);
        assert!(!controller.is_visible());
        assert!(!controller.full_player_open());
    }

    #[test]
    fn full_screen_and_minimized_are_exclusive() {
        let mut controller = VisibilityController::new();

        controller.show_full_screen();
        assert_eq!(controller.visibility(), SessionVisibility::FullScreen);
        assert!(controller.full_player_open());
        assert!(!controller.mini_player_visible());

        controller.show_minimized();
        assert_eq!(controller.visibility(), SessionVisibility::Minimized);
        assert!(!controller.full_player_open());
        assert!(controller.mini_player_visible());
    }

    #[test]
    fn hide_reports_whether_to_clear() {
        let mut controller = VisibilityController::new();
        controller.show_full_screen();

        assert_eq!(controller.hide(false), HideOutcome::KeepTracks);
        assert_eq!(controller.visibility(), SessionVisibility::Hidden);
        assert!(!controller.full_player_open());

        controller.show_minimized();
        assert_eq!(controller.hide(true), HideOutcome::ClearTracks);
        assert!(!controller.mini_player_visible());
    }
}
