//! Per-track volume levels
//!
//! Volumes are linear gains in `[0.0, 1.0]` handed straight to the platform
//! player. Levels set before a track's player exists are kept and applied
//! once the player is ready.

use hush_core::TrackId;
use std::collections::HashMap;

/// Clamp a requested volume into `[0.0, 1.0]`
///
/// NaN is treated as silence.
pub fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Volume levels keyed by track
#[derive(Debug, Clone)]
pub struct Volumes {
    /// Explicitly set levels (already clamped)
    levels: HashMap<TrackId, f32>,

    /// Level for tracks without an explicit setting
    default_level: f32,
}

impl Volumes {
    /// Create an empty volume map
    pub fn new(default_level: f32) -> Self {
        Self {
            levels: HashMap::new(),
            default_level: clamp_volume(default_level),
        }
    }

    /// Set the level for a track, returning the clamped value actually stored
    pub fn set(&mut self, id: &TrackId, level: f32) -> f32 {
        let level = clamp_volume(level);
        self.levels.insert(id.clone(), level);
        level
    }

    /// Level for a track (explicit or default)
    pub fn get(&self, id: &TrackId) -> f32 {
        self.levels.get(id).copied().unwrap_or(self.default_level)
    }

    /// Forget the level of one track
    pub fn remove(&mut self, id: &TrackId) {
        self.levels.remove(id);
    }

    /// Forget every level
    pub fn clear(&mut self) {
        self.levels.clear();
    }

    /// Explicitly set levels
    pub fn explicit(&self) -> &HashMap<TrackId, f32> {
        &self.levels
    }
}

impl Default for Volumes {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(clamp_volume(1.5), 1.0);
        assert_eq!(clamp_volume(-0.2), 0.0);
        assert_eq!(clamp_volume(0.3), 0.3);
        assert_eq!(clamp_volume(f32::NAN), 0.0);
    }

    #[test]
    fn unset_tracks_use_default() {
        let volumes = Volumes::new(0.8);
        assert_eq!(volumes.get(&TrackId::new("rain")), 0.8);
    }

    #[test]
    fn set_returns_clamped_level() {
        let mut volumes = Volumes::default();
        let rain = TrackId::new("rain");

        assert_eq!(volumes.set(&rain, 1.5), 1.0);
        assert_eq!(volumes.get(&rain), 1.0);

        assert_eq!(volumes.set(&rain, -0.2), 0.0);
        assert_eq!(volumes.get(&rain), 0.0);
    }

    #[test]
    fn remove_and_clear() {
        let mut volumes = Volumes::default();
        let rain = TrackId::new("rain");
        let birds = TrackId::new("birds");
        volumes.set(&rain, 0.3);
        volumes.set(&birds, 0.4);

        volumes.remove(&rain);
        assert_eq!(volumes.get(&rain), 1.0);
        assert_eq!(volumes.explicit().len(), 1);

        volumes.clear();
        assert!(volumes.explicit().is_empty());
    }
}
