//! Playback session
//!
//! The session task is the single owner of the track list, the handles, the
//! volume map, the timer and the visibility state. UI surfaces talk to it
//! through [`SessionHandle`]s; completions from handle workers and resolution
//! tasks come back on an internal channel. Everything is applied on this
//! one task, so no locks are needed, but every late completion is checked
//! against the handle id or resolution ticket it was issued for.

use crate::buffering::BufferingIndicator;
use crate::commands::SessionCommand;
use crate::error::{Result, SessionError, TrackError};
use crate::events::{HandleEvent, HandleMessage, SessionMessage, SessionNotification, ToggleTicket};
use crate::history::{record_in_background, save_favorite, HistoryBridge};
use crate::resolve::spawn_resolution;
use crate::session_handle::SessionHandle;
use crate::timer::{SleepTimer, TimerTick};
use crate::track_handle::TrackHandle;
use crate::types::{HandleId, HandleState, SessionConfig, SessionSnapshot, TrackStatus, TrackView};
use crate::visibility::{HideOutcome, VisibilityController};
use crate::volume::Volumes;
use hush_core::{
    AudioSourceResolver, AuthContext, FavoriteId, FavoritesStore, HistoryRecorder, LoadOptions,
    MediaBackend, Track, TrackId,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const NOTIFICATION_CAPACITY: usize = 64;

/// External collaborators used by a session
#[derive(Clone)]
pub struct Collaborators {
    /// Platform media stack
    pub backend: Arc<dyn MediaBackend>,
    /// Where audio comes from
    pub resolver: Arc<dyn AudioSourceResolver>,
    pub history: Arc<dyn HistoryRecorder>,
    pub favorites: Arc<dyn FavoritesStore>,
    pub auth: Arc<dyn AuthContext>,
}

/// Where a track without a live handle stands
#[derive(Debug, Clone, PartialEq)]
enum TrackPhase {
    /// Nothing in flight; loaded on the next reconcile
    Idle,
    /// Resolution running under this ticket
    Resolving(u64),
    /// Resolution or load failed
    Failed(TrackError),
}

#[derive(Debug)]
struct TrackEntry {
    track: Track,
    phase: TrackPhase,
    /// Resolution that produced the current streaming URI
    source_ticket: Option<u64>,
    download_progress: Option<f32>,
}

impl TrackEntry {
    fn new(track: Track) -> Self {
        Self {
            track,
            phase: TrackPhase::Idle,
            source_ticket: None,
            download_progress: None,
        }
    }
}

/// The session task state
pub struct PlaybackSession {
    config: SessionConfig,
    deps: Collaborators,

    /// Tracks in display order
    tracks: Vec<TrackEntry>,
    /// Live handles; keys are always a subset of `tracks`
    handles: HashMap<TrackId, TrackHandle>,
    /// Workers of disposed handles still releasing their players
    retired: Vec<JoinHandle<()>>,
    volumes: Volumes,
    is_playing: bool,

    visibility: VisibilityController,
    buffering: BufferingIndicator,
    pending_toggle: Option<ToggleTicket>,
    timer: SleepTimer,
    history: HistoryBridge,

    next_handle: u64,
    next_ticket: u64,

    messages: mpsc::UnboundedSender<SessionMessage>,
    snapshot: watch::Sender<SessionSnapshot>,
    notifications: broadcast::Sender<SessionNotification>,
}

impl PlaybackSession {
    /// Start a session task and return the first handle to it
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(config: SessionConfig, deps: Collaborators) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::empty());
        let (notification_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        let session = Self {
            volumes: Volumes::new(config.default_volume),
            buffering: BufferingIndicator::new(config.buffering_debounce()),
            timer: SleepTimer::new(config.timer_tick()),
            config,
            deps,
            tracks: Vec::new(),
            handles: HashMap::new(),
            retired: Vec::new(),
            is_playing: false,
            visibility: VisibilityController::new(),
            pending_toggle: None,
            history: HistoryBridge::new(),
            next_handle: 0,
            next_ticket: 0,
            messages: message_tx,
            snapshot: snapshot_tx,
            notifications: notification_tx.clone(),
        };

        tokio::spawn(session.run(command_rx, message_rx));
        SessionHandle::new(command_tx, snapshot_rx, notification_tx)
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        mut messages: mpsc::UnboundedReceiver<SessionMessage>,
    ) {
        info!("Playback session started");
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown(done)) => {
                        self.shutdown().await;
                        let _ = done.send(());
                        break;
                    }
                    Some(command) => self.handle_command(command),
                    None => {
                        self.shutdown().await;
                        break;
                    }
                },
                Some(message) = messages.recv() => self.handle_message(message),
                () = self.buffering.elapsed() => {
                    debug!("Toggle still pending, showing buffering indicator");
                }
                tick = self.timer.tick() => self.on_timer_tick(tick),
            }
            self.publish();
        }
        info!("Playback session stopped");
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Open(tracks) => self.open(tracks),
            SessionCommand::Update(tracks) => self.update(tracks),
            SessionCommand::TogglePlay => self.toggle_play(),
            SessionCommand::Play => self.play(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::SetTrackVolume { id, volume } => self.set_track_volume(&id, volume),
            SessionCommand::Remove(id) => self.remove(&id),
            SessionCommand::Close { clear_tracks } => self.close(clear_tracks),
            SessionCommand::ShowMinimized => self.show(false),
            SessionCommand::ShowFullScreen => self.show(true),
            SessionCommand::StartTimer { minutes } => self.start_timer(minutes),
            SessionCommand::CancelTimer => self.cancel_timer(),
            SessionCommand::Seek { id, position } => self.seek(&id, position),
            SessionCommand::Skip { id, forward } => self.skip(&id, forward),
            SessionCommand::Retry(id) => self.retry(&id),
            SessionCommand::AddToFavorites(reply) => self.add_to_favorites(reply),
            SessionCommand::Shutdown(_) => {}
        }
    }

    // ------------------------------------------------------------------
    // Track set
    // ------------------------------------------------------------------

    fn open(&mut self, tracks: Vec<Track>) {
        let tracks = dedup_tracks(tracks);
        if tracks.is_empty() {
            debug!("Ignoring open with no tracks");
            return;
        }
        info!(tracks = tracks.len(), "Opening session");

        self.replace_tracks(tracks.clone(), true);
        self.visibility.show_minimized();
        self.set_playing(true, None);
        self.reconcile_handles();
        self.record_history(&tracks);
    }

    fn update(&mut self, tracks: Vec<Track>) {
        let tracks = dedup_tracks(tracks);
        if tracks.is_empty() || self.tracks.is_empty() {
            debug!("Ignoring update");
            return;
        }
        self.replace_tracks(tracks, false);
        self.reconcile_handles();
    }

    /// Make `tracks` the session's track list
    ///
    /// Handles of tracks that persist are kept untouched; a URI change on a
    /// track with a handle is metadata only. Tracks that are dropped have
    /// their handles disposed before leaving the list.
    fn replace_tracks(&mut self, tracks: Vec<Track>, reset_failed: bool) {
        let keep: HashSet<&TrackId> = tracks.iter().map(|track| &track.id).collect();
        let dropped: Vec<TrackId> = self
            .tracks
            .iter()
            .map(|entry| entry.track.id.clone())
            .filter(|id| !keep.contains(id))
            .collect();
        for id in &dropped {
            self.dispose_handle(id);
            self.volumes.remove(id);
        }

        let mut previous: HashMap<TrackId, TrackEntry> = self
            .tracks
            .drain(..)
            .map(|entry| (entry.track.id.clone(), entry))
            .collect();

        let mut next = Vec::with_capacity(tracks.len());
        for mut track in tracks {
            let Some(mut entry) = previous.remove(&track.id) else {
                next.push(TrackEntry::new(track));
                continue;
            };

            if track.source_uri.is_none() {
                track.source_uri = entry.track.source_uri.take();
            } else {
                if track.source_uri != entry.track.source_uri {
                    entry.source_ticket = None;
                }
                if matches!(entry.phase, TrackPhase::Resolving(_)) {
                    // An explicit URI supersedes the running resolution
                    entry.phase = TrackPhase::Idle;
                }
            }
            entry.track = track;

            if reset_failed {
                let handle_failed = self
                    .handles
                    .get(&entry.track.id)
                    .is_some_and(|handle| handle.state() == HandleState::Failed);
                if handle_failed {
                    self.dispose_handle(&entry.track.id);
                }
                if handle_failed || matches!(entry.phase, TrackPhase::Failed(_)) {
                    entry.phase = TrackPhase::Idle;
                }
            }
            next.push(entry);
        }
        self.tracks = next;
    }

    /// Start loading every track that has neither a handle nor work in flight
    ///
    /// Nothing is loaded while the session is hidden.
    fn reconcile_handles(&mut self) {
        if !self.visibility.is_visible() {
            return;
        }

        let pending: Vec<Track> = self
            .tracks
            .iter()
            .filter(|entry| entry.phase == TrackPhase::Idle)
            .filter(|entry| !self.handles.contains_key(&entry.track.id))
            .map(|entry| entry.track.clone())
            .collect();

        for track in pending {
            if track.source_uri.is_some() {
                self.create_handle(&track);
            } else {
                self.start_resolution(track);
            }
        }
    }

    fn start_resolution(&mut self, track: Track) {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        if let Some(entry) = self.entry_mut(&track.id) {
            entry.phase = TrackPhase::Resolving(ticket);
        }
        debug!(track_id = %track.id, ticket, "Resolving track source");
        spawn_resolution(
            Arc::clone(&self.deps.resolver),
            track,
            ticket,
            self.messages.clone(),
        );
    }

    fn create_handle(&mut self, track: &Track) {
        self.next_handle += 1;
        let id = HandleId(self.next_handle);
        let options = LoadOptions {
            volume: self.volumes.get(&track.id),
            looping: self.config.loop_tracks && track.loops(),
        };

        let handle = TrackHandle::load(
            id,
            track.id.clone(),
            track.source_uri.as_deref(),
            options,
            Arc::clone(&self.deps.backend),
            self.messages.clone(),
        );

        if let Some(err) = handle.error().cloned() {
            self.mark_failed(&track.id, err);
            return;
        }
        if self.is_playing {
            handle.play(None);
        }
        if let Some(entry) = self.entry_mut(&track.id) {
            entry.phase = TrackPhase::Idle;
        }
        self.handles.insert(track.id.clone(), handle);
    }

    /// Stop and dispose the handle for `id`, if any
    fn dispose_handle(&mut self, id: &TrackId) {
        let Some(handle) = self.handles.remove(id) else {
            return;
        };
        debug!(track_id = %id, handle = %handle.id(), "Disposing handle");
        handle.stop();
        if let Some(task) = handle.into_task() {
            self.retired.retain(|retired| !retired.is_finished());
            self.retired.push(task);
        }
    }

    fn dispose_all_handles(&mut self) {
        let ids: Vec<TrackId> = self.handles.keys().cloned().collect();
        for id in &ids {
            self.dispose_handle(id);
        }
    }

    fn remove(&mut self, id: &TrackId) {
        let Some(index) = self.tracks.iter().position(|entry| &entry.track.id == id) else {
            debug!(track_id = %id, "Ignoring remove of unknown track");
            return;
        };

        self.dispose_handle(id);
        self.tracks.remove(index);
        self.volumes.remove(id);
        info!(track_id = %id, remaining = self.tracks.len(), "Removed track");

        if self.tracks.is_empty() {
            self.hide_session(true);
        } else if self.pending_toggle.is_some() && !self.can_settle_toggle() {
            self.settle_toggle();
        }
    }

    fn close(&mut self, clear_tracks: bool) {
        info!(clear_tracks, "Closing session");
        self.settle_toggle();
        self.history.reset();
        self.hide_session(clear_tracks);
    }

    /// Hide every surface, then release or pause the tracks
    fn hide_session(&mut self, clear_tracks: bool) {
        match self.visibility.hide(clear_tracks) {
            HideOutcome::ClearTracks => self.clear_session(),
            HideOutcome::KeepTracks => self.set_playing(false, None),
        }
    }

    /// Back to an empty session
    fn clear_session(&mut self) {
        self.dispose_all_handles();
        self.tracks.clear();
        self.volumes.clear();
        self.timer.cancel();
        self.settle_toggle();
        self.history.reset();
        self.is_playing = false;
    }

    fn show(&mut self, full_screen: bool) {
        if self.tracks.is_empty() {
            return;
        }
        if full_screen {
            self.visibility.show_full_screen();
        } else {
            self.visibility.show_minimized();
        }
        self.reconcile_handles();
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    /// Send play or pause to every handle
    ///
    /// Each handle gets its own command; a failing handle does not stop the
    /// others from receiving theirs.
    fn set_playing(&mut self, playing: bool, ticket: Option<ToggleTicket>) {
        self.is_playing = playing;
        for handle in self.handles.values() {
            if playing {
                handle.play(ticket);
            } else {
                handle.pause(ticket);
            }
        }
    }

    fn toggle_play(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        if !self.visibility.is_visible() {
            debug!("Ignoring toggle while hidden");
            return;
        }
        self.next_ticket += 1;
        let ticket = ToggleTicket(self.next_ticket);
        let playing = !self.is_playing;
        debug!(playing, "Toggling playback");

        if self.can_settle_toggle() {
            self.pending_toggle = Some(ticket);
            self.buffering.begin();
        }
        self.set_playing(playing, Some(ticket));
    }

    fn play(&mut self) {
        if self.tracks.is_empty() || self.is_playing || !self.visibility.is_visible() {
            return;
        }
        self.set_playing(true, None);
    }

    fn pause(&mut self) {
        if self.is_playing {
            self.set_playing(false, None);
        }
    }

    /// Whether some handle is still able to answer a toggle
    fn can_settle_toggle(&self) -> bool {
        self.handles
            .values()
            .any(|handle| handle.state() != HandleState::Failed)
    }

    fn settle_toggle(&mut self) {
        self.pending_toggle = None;
        self.buffering.settle();
    }

    fn set_track_volume(&mut self, id: &TrackId, volume: f32) {
        if self.entry(id).is_none() {
            debug!(track_id = %id, "Ignoring volume for unknown track");
            return;
        }
        let level = self.volumes.set(id, volume);
        if let Some(handle) = self.handles.get(id) {
            handle.set_volume(level);
        }
        debug!(track_id = %id, volume = level, "Track volume set");
    }

    fn seek(&mut self, id: &TrackId, position: Duration) {
        let Some(handle) = self.handles.get_mut(id) else {
            return;
        };
        let position = match handle.status().duration {
            Some(duration) => position.min(duration),
            None => position,
        };
        handle.seek(position);
    }

    fn skip(&mut self, id: &TrackId, forward: bool) {
        let Some(handle) = self.handles.get(id) else {
            return;
        };
        let current = handle.status().position;
        let step = self.config.skip_interval();
        let target = if forward {
            current.saturating_add(step)
        } else {
            current.saturating_sub(step)
        };
        self.seek(id, target);
    }

    fn retry(&mut self, id: &TrackId) {
        let Some(status) = self.entry(id).map(|entry| self.status_of(entry)) else {
            return;
        };
        if !status.is_failed() {
            debug!(track_id = %id, "Retry ignored, track has not failed");
            return;
        }

        info!(track_id = %id, "Retrying track");
        self.dispose_handle(id);
        if let Some(entry) = self.entry_mut(id) {
            if entry.track.remote_path.is_some() {
                entry.track.source_uri = None;
            }
            entry.phase = TrackPhase::Idle;
            entry.source_ticket = None;
            entry.download_progress = None;
        }
        self.reconcile_handles();
    }

    // ------------------------------------------------------------------
    // Timer
    // ------------------------------------------------------------------

    fn start_timer(&mut self, minutes: u32) {
        if self.tracks.is_empty() {
            return;
        }
        let minutes = minutes.min(self.config.max_timer_minutes);
        let duration = self.timer.start(minutes);
        info!(minutes, "Sleep timer started");
        self.notify(SessionNotification::TimerStarted { duration });
    }

    fn cancel_timer(&mut self) {
        if self.timer.cancel() {
            info!("Sleep timer cancelled");
            self.notify(SessionNotification::TimerCancelled);
        }
    }

    fn on_timer_tick(&mut self, tick: TimerTick) {
        if tick == TimerTick::Expired {
            info!("Sleep timer expired");
            self.pause();
            self.notify(SessionNotification::TimerExpired);
        }
    }

    // ------------------------------------------------------------------
    // History and favorites
    // ------------------------------------------------------------------

    fn record_history(&mut self, tracks: &[Track]) {
        let Some(user) = self.deps.auth.current_user_id() else {
            return;
        };
        if let Some(entry) = self.history.entry_for_open(tracks) {
            record_in_background(Arc::clone(&self.deps.history), user, entry);
        }
    }

    fn add_to_favorites(&mut self, reply: oneshot::Sender<Result<Option<FavoriteId>>>) {
        let tracks: Vec<Track> = self.tracks.iter().map(|entry| entry.track.clone()).collect();
        if tracks.is_empty() {
            let _ = reply.send(Ok(None));
            return;
        }
        let Some(user) = self.deps.auth.current_user_id() else {
            let _ = reply.send(Err(SessionError::NotAuthenticated));
            return;
        };

        let store = Arc::clone(&self.deps.favorites);
        tokio::spawn(async move {
            let _ = reply.send(save_favorite(store, user, tracks).await);
        });
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Handle(message) => self.on_handle_event(message),
            SessionMessage::Resolved {
                track_id,
                ticket,
                result,
            } => self.on_resolved(&track_id, ticket, result),
            SessionMessage::DownloadProgress { track_id, progress } => {
                if let Some(entry) = self.entry_mut(&track_id) {
                    entry.download_progress = Some(progress);
                }
            }
            SessionMessage::LocalReady {
                track_id,
                ticket,
                uri,
            } => self.on_local_ready(&track_id, ticket, uri),
        }
    }

    fn on_handle_event(&mut self, message: HandleMessage) {
        let HandleMessage {
            track_id,
            handle_id,
            event,
        } = message;

        let Some(handle) = self.handles.get_mut(&track_id) else {
            return;
        };
        if handle.id() != handle_id {
            debug!(track_id = %track_id, handle = %handle_id, "Dropping event from stale handle");
            return;
        }
        handle.apply_event(&event);

        match event {
            HandleEvent::TransportSettled(Some(ticket)) if self.pending_toggle == Some(ticket) => {
                self.settle_toggle();
            }
            HandleEvent::Failed(err) => {
                warn!(track_id = %track_id, handle = %handle_id, error = %err, "Track failed");
                self.notify(SessionNotification::TrackFailed { track_id, error: err });
                if self.pending_toggle.is_some() && !self.can_settle_toggle() {
                    self.settle_toggle();
                }
                self.check_all_failed();
            }
            _ => {}
        }
    }

    fn on_resolved(
        &mut self,
        track_id: &TrackId,
        ticket: u64,
        result: std::result::Result<String, TrackError>,
    ) {
        let Some(entry) = self.entry_mut(track_id) else {
            debug!(track_id = %track_id, "Resolution finished for a removed track");
            return;
        };
        if entry.phase != TrackPhase::Resolving(ticket) {
            debug!(track_id = %track_id, ticket, "Dropping stale resolution");
            return;
        }

        match result {
            Ok(uri) => {
                entry.track.source_uri = Some(uri);
                entry.phase = TrackPhase::Idle;
                entry.source_ticket = Some(ticket);
                let track = entry.track.clone();
                if self.visibility.is_visible() {
                    self.create_handle(&track);
                }
            }
            Err(err) => {
                warn!(track_id = %track_id, error = %err, "Track source could not be resolved");
                self.mark_failed(track_id, err);
            }
        }
    }

    fn on_local_ready(&mut self, track_id: &TrackId, ticket: u64, uri: String) {
        let Some(entry) = self.entry_mut(track_id) else {
            return;
        };
        if entry.source_ticket != Some(ticket) {
            debug!(track_id = %track_id, ticket, "Dropping local copy from a superseded resolution");
            return;
        }
        entry.source_ticket = None;
        entry.track.source_uri = Some(uri);
        entry.download_progress = None;
        self.notify(SessionNotification::LocalCopyReady {
            track_id: track_id.clone(),
        });
    }

    fn mark_failed(&mut self, track_id: &TrackId, err: TrackError) {
        if let Some(entry) = self.entry_mut(track_id) {
            entry.phase = TrackPhase::Failed(err.clone());
        }
        self.notify(SessionNotification::TrackFailed {
            track_id: track_id.clone(),
            error: err,
        });
        self.check_all_failed();
    }

    /// Hide the session when nothing in it can play
    fn check_all_failed(&mut self) {
        if !self.visibility.is_visible() || self.tracks.is_empty() {
            return;
        }
        let all_failed = self
            .tracks
            .iter()
            .all(|entry| self.status_of(entry).is_failed());
        if all_failed {
            warn!("Every track failed, hiding the player");
            self.settle_toggle();
            self.hide_session(false);
            self.notify(SessionNotification::AutoHidden);
        }
    }

    async fn shutdown(&mut self) {
        self.settle_toggle();
        self.timer.cancel();

        let mut tasks = std::mem::take(&mut self.retired);
        for (_, handle) in self.handles.drain() {
            tasks.extend(handle.into_task());
        }
        for task in tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "Track worker ended abnormally");
            }
        }
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    fn entry(&self, id: &TrackId) -> Option<&TrackEntry> {
        self.tracks.iter().find(|entry| &entry.track.id == id)
    }

    fn entry_mut(&mut self, id: &TrackId) -> Option<&mut TrackEntry> {
        self.tracks.iter_mut().find(|entry| &entry.track.id == id)
    }

    fn status_of(&self, entry: &TrackEntry) -> TrackStatus {
        if let Some(handle) = self.handles.get(&entry.track.id) {
            return match handle.state() {
                HandleState::Loading => TrackStatus::Loading,
                HandleState::Ready => TrackStatus::Ready,
                HandleState::Playing => TrackStatus::Playing,
                HandleState::Paused => TrackStatus::Paused,
                HandleState::Failed => TrackStatus::Failed(
                    handle
                        .error()
                        .cloned()
                        .unwrap_or_else(|| TrackError::Playback("unknown error".to_string())),
                ),
                HandleState::Unloaded => TrackStatus::Idle,
            };
        }
        match &entry.phase {
            TrackPhase::Idle => TrackStatus::Idle,
            TrackPhase::Resolving(_) => TrackStatus::Resolving,
            TrackPhase::Failed(err) => TrackStatus::Failed(err.clone()),
        }
    }

    fn build_snapshot(&self) -> SessionSnapshot {
        let tracks: Vec<TrackView> = self
            .tracks
            .iter()
            .map(|entry| {
                let handle = self.handles.get(&entry.track.id);
                TrackView {
                    track: entry.track.clone(),
                    status: self.status_of(entry),
                    volume: self.volumes.get(&entry.track.id),
                    handle_id: handle.map(TrackHandle::id),
                    buffering: handle.is_some_and(TrackHandle::is_buffering),
                    position: handle.map(|h| h.status().position).unwrap_or_default(),
                    duration: handle.and_then(|h| h.status().duration),
                    download_progress: entry.download_progress,
                }
            })
            .collect();

        SessionSnapshot {
            is_buffering: self.buffering.is_showing() || tracks.iter().any(|view| view.buffering),
            is_loading: tracks.iter().any(|view| view.status.is_pending()),
            tracks,
            is_playing: self.is_playing,
            visibility: self.visibility.visibility(),
            full_player_open: self.visibility.full_player_open(),
            volumes: self.volumes.explicit().clone(),
            timer_remaining: self.timer.remaining(),
        }
    }

    fn publish(&self) {
        let next = self.build_snapshot();
        self.snapshot.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn notify(&self, notification: SessionNotification) {
        // No subscribers is fine
        let _ = self.notifications.send(notification);
    }
}

/// Drop repeated ids, keeping the first occurrence
fn dedup_tracks(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|track| seen.insert(track.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        let tracks = vec![
            Track::with_uri("rain", "Rain", "file:///rain.wav"),
            Track::with_uri("birds", "Birds", "file:///birds.wav"),
            Track::with_uri("rain", "Rain again", "file:///other.wav"),
        ];
        let tracks = dedup_tracks(tracks);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].display_name, "Rain");
        assert_eq!(tracks[1].id.as_str(), "birds");
    }
}
