//! Track handles
//!
//! A `TrackHandle` is the session's proxy for one loaded player. The real
//! player lives in a worker task that exclusively owns it and applies
//! commands strictly in the order they were issued. The worker reports back
//! through `SessionMessage::Handle`, tagging every event with the handle id
//! so the session can drop events from handles it has already replaced.

use crate::error::TrackError;
use crate::events::{HandleEvent, HandleMessage, SessionMessage, ToggleTicket};
use crate::types::{HandleId, HandleState};
use crate::volume::clamp_volume;
use hush_core::{LoadOptions, MediaBackend, MediaPlayer, PlayerStatus, TrackId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

/// Commands applied by the worker, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum HandleCommand {
    Play(Option<ToggleTicket>),
    Pause(Option<ToggleTicket>),
    Stop,
    SetVolume(f32),
    Seek(Duration),
    Dispose,
}

/// Session-side proxy for one player resource
#[derive(Debug)]
pub struct TrackHandle {
    id: HandleId,
    commands: mpsc::UnboundedSender<HandleCommand>,
    state: HandleState,
    status: PlayerStatus,
    error: Option<TrackError>,
    disposed: bool,
    task: Option<JoinHandle<()>>,
}

impl TrackHandle {
    /// Begin loading `uri` into a new player
    ///
    /// A missing or unparseable URI fails the handle immediately without
    /// calling the backend.
    pub(crate) fn load(
        id: HandleId,
        track_id: TrackId,
        uri: Option<&str>,
        options: LoadOptions,
        backend: Arc<dyn MediaBackend>,
        events: mpsc::UnboundedSender<SessionMessage>,
    ) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let mut handle = Self {
            id,
            commands,
            state: HandleState::Loading,
            status: PlayerStatus::default(),
            error: None,
            disposed: false,
            task: None,
        };

        let uri = match validate_uri(uri) {
            Ok(uri) => uri,
            Err(err) => {
                warn!(track_id = %track_id, handle = %id, error = %err, "Refusing to load track");
                handle.state = HandleState::Failed;
                handle.error = Some(err);
                return handle;
            }
        };

        debug!(track_id = %track_id, handle = %id, uri = %uri, "Loading track");
        let worker = HandleWorker {
            id,
            track_id,
            uri,
            options,
            backend,
            commands: receiver,
            events,
            state: HandleState::Loading,
        };
        handle.task = Some(tokio::spawn(worker.run()));
        handle
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Last state reported by the worker
    pub fn state(&self) -> HandleState {
        self.state
    }

    /// Last status pushed by the player
    pub fn status(&self) -> &PlayerStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&TrackError> {
        self.error.as_ref()
    }

    /// Whether the player reports buffering
    pub fn is_buffering(&self) -> bool {
        self.state != HandleState::Failed && self.status.is_buffering
    }

    pub(crate) fn play(&self, ticket: Option<ToggleTicket>) {
        self.send(HandleCommand::Play(ticket));
    }

    pub(crate) fn pause(&self, ticket: Option<ToggleTicket>) {
        self.send(HandleCommand::Pause(ticket));
    }

    pub(crate) fn stop(&self) {
        self.send(HandleCommand::Stop);
    }

    /// Clamp and apply a volume; queued until the player is ready
    pub(crate) fn set_volume(&self, volume: f32) -> f32 {
        let volume = clamp_volume(volume);
        self.send(HandleCommand::SetVolume(volume));
        volume
    }

    pub(crate) fn seek(&mut self, position: Duration) {
        self.status.position = position;
        self.send(HandleCommand::Seek(position));
    }

    /// Release the player; later calls are no-ops
    pub(crate) fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.send(HandleCommand::Dispose);
    }

    /// Dispose and hand back the worker task so the caller can await teardown
    pub(crate) fn into_task(mut self) -> Option<JoinHandle<()>> {
        self.dispose();
        self.task.take()
    }

    /// Fold a worker event into the mirrored state
    pub(crate) fn apply_event(&mut self, event: &HandleEvent) {
        match event {
            HandleEvent::State(state) => self.state = *state,
            HandleEvent::Status(status) => self.status = status.clone(),
            HandleEvent::Failed(err) => {
                self.state = HandleState::Failed;
                self.error = Some(err.clone());
            }
            HandleEvent::TransportSettled(_) => {}
        }
    }

    fn send(&self, command: HandleCommand) {
        if self.disposed && command != HandleCommand::Dispose {
            return;
        }
        // A closed channel means the worker already finished (failed load)
        let _ = self.commands.send(command);
    }
}

fn validate_uri(uri: Option<&str>) -> Result<String, TrackError> {
    let uri = uri
        .map(str::trim)
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| TrackError::Load("missing source URI".to_string()))?;
    Url::parse(uri).map_err(|e| TrackError::Load(format!("invalid source URI {uri:?}: {e}")))?;
    Ok(uri.to_string())
}

/// Owns one player resource for its whole life
struct HandleWorker {
    id: HandleId,
    track_id: TrackId,
    uri: String,
    options: LoadOptions,
    backend: Arc<dyn MediaBackend>,
    commands: mpsc::UnboundedReceiver<HandleCommand>,
    events: mpsc::UnboundedSender<SessionMessage>,
    state: HandleState,
}

impl HandleWorker {
    async fn run(mut self) {
        let (status_tx, mut status_rx) = mpsc::unbounded_channel();
        let on_status = Box::new(move |status: PlayerStatus| {
            let _ = status_tx.send(status);
        });

        let mut player = match self.backend.load(&self.uri, self.options, on_status).await {
            Ok(player) => player,
            Err(err) => {
                warn!(track_id = %self.track_id, handle = %self.id, error = %err, "Track failed to load");
                self.fail(TrackError::from_load(&err));
                return;
            }
        };
        self.set_state(HandleState::Ready);

        // Commands queued while loading; a pending dispose means the handle
        // was superseded, so the player is released without being started
        if self.apply_queued(&mut player).await {
            loop {
                tokio::select! {
                    command = self.commands.recv() => match command {
                        Some(HandleCommand::Dispose) | None => break,
                        Some(command) => self.apply(&mut player, command).await,
                    },
                    Some(status) = status_rx.recv() => self.on_status(status),
                }
            }
        } else {
            debug!(track_id = %self.track_id, handle = %self.id, "Handle disposed while loading");
        }

        if let Err(err) = player.unload().await {
            warn!(track_id = %self.track_id, handle = %self.id, error = %err, "Failed to unload player");
        }
        debug!(track_id = %self.track_id, handle = %self.id, "Player released");
        self.state = HandleState::Unloaded;
        self.emit(HandleEvent::State(HandleState::Unloaded));
    }

    /// Apply everything queued during the load
    ///
    /// Returns `false` without applying anything when a dispose is queued.
    async fn apply_queued(&mut self, player: &mut Box<dyn MediaPlayer>) -> bool {
        let mut queued = Vec::new();
        loop {
            match self.commands.try_recv() {
                Ok(HandleCommand::Dispose) | Err(TryRecvError::Disconnected) => return false,
                Ok(command) => queued.push(command),
                Err(TryRecvError::Empty) => break,
            }
        }
        for command in queued {
            self.apply(player, command).await;
        }
        true
    }

    async fn apply(&mut self, player: &mut Box<dyn MediaPlayer>, command: HandleCommand) {
        match command {
            HandleCommand::Play(ticket) => {
                if matches!(self.state, HandleState::Ready | HandleState::Paused) {
                    match player.play().await {
                        Ok(()) => self.set_state(HandleState::Playing),
                        Err(err) => self.fail(TrackError::from_playback(&err)),
                    }
                }
                self.emit(HandleEvent::TransportSettled(ticket));
            }
            HandleCommand::Pause(ticket) => {
                if self.state == HandleState::Playing {
                    match player.pause().await {
                        Ok(()) => self.set_state(HandleState::Paused),
                        Err(err) => self.fail(TrackError::from_playback(&err)),
                    }
                }
                self.emit(HandleEvent::TransportSettled(ticket));
            }
            HandleCommand::Stop => {
                if self.state.is_active() {
                    match player.stop().await {
                        Ok(()) => self.set_state(HandleState::Ready),
                        Err(err) => {
                            warn!(track_id = %self.track_id, error = %err, "Failed to stop player");
                        }
                    }
                }
            }
            HandleCommand::SetVolume(volume) => {
                if self.state.is_active() {
                    if let Err(err) = player.set_volume(volume).await {
                        warn!(track_id = %self.track_id, error = %err, "Failed to set volume");
                    }
                }
            }
            HandleCommand::Seek(position) => {
                if self.state.is_active() {
                    if let Err(err) = player.seek(position).await {
                        warn!(track_id = %self.track_id, error = %err, "Failed to seek");
                    }
                }
            }
            HandleCommand::Dispose => {}
        }
    }

    fn on_status(&mut self, status: PlayerStatus) {
        if let Some(message) = status.error.clone() {
            if self.state != HandleState::Failed {
                warn!(track_id = %self.track_id, handle = %self.id, error = %message, "Playback error");
                self.fail(TrackError::Playback(message));
            }
        }
        self.emit(HandleEvent::Status(status));
    }

    fn set_state(&mut self, state: HandleState) {
        if self.state != state {
            self.state = state;
            self.emit(HandleEvent::State(state));
        }
    }

    fn fail(&mut self, err: TrackError) {
        self.state = HandleState::Failed;
        self.emit(HandleEvent::Failed(err));
    }

    fn emit(&self, event: HandleEvent) {
        let _ = self.events.send(SessionMessage::Handle(HandleMessage {
            track_id: self.track_id.clone(),
            handle_id: self.id,
            event,
        }));
    }
}
