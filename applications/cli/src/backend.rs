//! Simulated media backend
//!
//! Stands in for a platform audio stack. Players accept transport commands,
//! keep track of position and volume, and report status the way a real
//! player would, but produce no sound.

use async_trait::async_trait;
use hush_core::{
    HushError, LoadOptions, MediaBackend, MediaPlayer, PlayerStatus, Result, StatusCallback,
};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend;

impl SimulatedBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaBackend for SimulatedBackend {
    async fn load(
        &self,
        uri: &str,
        options: LoadOptions,
        status: StatusCallback,
    ) -> Result<Box<dyn MediaPlayer>> {
        let url = Url::parse(uri).map_err(|e| HushError::load(format!("{uri}: {e}")))?;
        match url.scheme() {
            "http" | "https" => {}
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| HushError::load(format!("{uri} is not a local path")))?;
                if !tokio::fs::try_exists(&path).await? {
                    return Err(HushError::load(format!("{} does not exist", path.display())));
                }
            }
            other => return Err(HushError::load(format!("unsupported URI scheme {other}"))),
        }

        info!(uri = %uri, volume = options.volume, looping = options.looping, "Loaded player");
        let player = SimulatedPlayer::new(uri, options, status);
        player.report();
        Ok(Box::new(player))
    }
}

/// Player that only tracks transport state
pub struct SimulatedPlayer {
    uri: String,
    volume: f32,
    looping: bool,
    playing: bool,
    position: Duration,
    loaded: bool,
    status: StatusCallback,
}

impl SimulatedPlayer {
    fn new(uri: &str, options: LoadOptions, status: StatusCallback) -> Self {
        Self {
            uri: uri.to_string(),
            volume: options.volume,
            looping: options.looping,
            playing: false,
            position: Duration::ZERO,
            loaded: true,
            status,
        }
    }

    fn report(&self) {
        (self.status)(PlayerStatus {
            is_loaded: self.loaded,
            is_playing: self.playing,
            is_buffering: false,
            position: self.position,
            duration: None,
            did_just_finish: false,
            error: None,
        });
    }

    fn ensure_loaded(&self) -> Result<()> {
        if self.loaded {
            Ok(())
        } else {
            Err(HushError::playback(format!("{} was unloaded", self.uri)))
        }
    }
}

#[async_trait]
impl MediaPlayer for SimulatedPlayer {
    async fn play(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        debug!(uri = %self.uri, looping = self.looping, "play");
        self.playing = true;
        self.report();
        Ok(())
    }

    async fn pause(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        debug!(uri = %self.uri, "pause");
        self.playing = false;
        self.report();
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.ensure_loaded()?;
        debug!(uri = %self.uri, "stop");
        self.playing = false;
        self.position = Duration::ZERO;
        self.report();
        Ok(())
    }

    async fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.ensure_loaded()?;
        debug!(uri = %self.uri, volume, "set_volume");
        self.volume = volume;
        Ok(())
    }

    async fn seek(&mut self, position: Duration) -> Result<()> {
        self.ensure_loaded()?;
        debug!(uri = %self.uri, position_ms = position.as_millis() as u64, "seek");
        self.position = position;
        self.report();
        Ok(())
    }

    async fn unload(&mut self) -> Result<()> {
        if self.loaded {
            debug!(uri = %self.uri, "unload");
            self.loaded = false;
            self.playing = false;
        }
        Ok(())
    }
}
