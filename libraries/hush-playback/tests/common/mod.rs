//! Shared test infrastructure: fake collaborators and session helpers

use async_trait::async_trait;
use futures_util::FutureExt;
use hush_core::{
    AudioSourceResolver, DownloadProgress, FavoriteId, FavoritesStore, HistoryEntry,
    HistoryRecorder, HushError, LoadOptions, LocalFile, MediaBackend, MediaPlayer, PlayerStatus,
    ProgressCallback, StaticAuth, StatusCallback, StreamingSource, Track, UserId,
};
use hush_playback::{
    Collaborators, PlaybackSession, SessionConfig, SessionHandle, SessionNotification,
    SessionSnapshot, TrackStatus,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

// ============================================================================
// Media backend
// ============================================================================

/// Everything a fake player was asked to do
#[derive(Debug, Clone, Default)]
pub struct PlayerRecord {
    pub uri: String,
    pub options: LoadOptions,
    pub plays: usize,
    pub pauses: usize,
    pub stops: usize,
    pub unloads: usize,
    pub volumes: Vec<f32>,
    pub seeks: Vec<Duration>,
}

#[derive(Default)]
struct BackendState {
    attempts: usize,
    players: Vec<PlayerRecord>,
    callbacks: Vec<Arc<StatusCallback>>,
    failing_loads: Vec<String>,
    load_delay: Duration,
    transport_delay: Duration,
}

/// Media backend that records calls instead of playing audio
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    /// Make loads of URIs containing `fragment` fail
    pub fn fail_loads_matching(&self, fragment: &str) {
        self.state.lock().unwrap().failing_loads.push(fragment.to_string());
    }

    pub fn set_load_delay(&self, delay: Duration) {
        self.state.lock().unwrap().load_delay = delay;
    }

    /// Delay applied to every play/pause call
    pub fn set_transport_delay(&self, delay: Duration) {
        self.state.lock().unwrap().transport_delay = delay;
    }

    /// Number of load calls, successful or not
    pub fn load_attempts(&self) -> usize {
        self.state.lock().unwrap().attempts
    }

    pub fn players(&self) -> Vec<PlayerRecord> {
        self.state.lock().unwrap().players.clone()
    }

    /// Players whose URI contains `fragment`
    pub fn players_for(&self, fragment: &str) -> Vec<PlayerRecord> {
        self.players()
            .into_iter()
            .filter(|player| player.uri.contains(fragment))
            .collect()
    }

    /// The only player whose URI contains `fragment`
    pub fn player(&self, fragment: &str) -> PlayerRecord {
        let mut players = self.players_for(fragment);
        assert_eq!(players.len(), 1, "expected exactly one player for {fragment}");
        players.remove(0)
    }

    /// Push a status report as the platform would
    pub fn emit_status(&self, fragment: &str, status: PlayerStatus) {
        let callback = {
            let state = self.state.lock().unwrap();
            let index = state
                .players
                .iter()
                .rposition(|player| player.uri.contains(fragment))
                .expect("no player for fragment");
            Arc::clone(&state.callbacks[index])
        };
        (*callback)(status);
    }

    fn update(&self, index: usize, apply: impl FnOnce(&mut PlayerRecord)) {
        apply(&mut self.state.lock().unwrap().players[index]);
    }

    fn transport_delay(&self) -> Duration {
        self.state.lock().unwrap().transport_delay
    }
}

#[async_trait]
impl MediaBackend for FakeBackend {
    async fn load(
        &self,
        uri: &str,
        options: LoadOptions,
        status: StatusCallback,
    ) -> hush_core::Result<Box<dyn MediaPlayer>> {
        let delay = self.state.lock().unwrap().load_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let index = {
            let mut state = self.state.lock().unwrap();
            state.attempts += 1;
            if state.failing_loads.iter().any(|fragment| uri.contains(fragment)) {
                return Err(HushError::load(format!("cannot open {uri}")));
            }
            state.players.push(PlayerRecord {
                uri: uri.to_string(),
                options,
                ..Default::default()
            });
            state.callbacks.push(Arc::new(status));
            state.players.len() - 1
        };

        Ok(Box::new(FakePlayer {
            index,
            backend: self.clone(),
        }))
    }
}

struct FakePlayer {
    index: usize,
    backend: FakeBackend,
}

#[async_trait]
impl MediaPlayer for FakePlayer {
    async fn play(&mut self) -> hush_core::Result<()> {
        let delay = self.backend.transport_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.backend.update(self.index, |player| player.plays += 1);
        Ok(())
    }

    async fn pause(&mut self) -> hush_core::Result<()> {
        let delay = self.backend.transport_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.backend.update(self.index, |player| player.pauses += 1);
        Ok(())
    }

    async fn stop(&mut self) -> hush_core::Result<()> {
        self.backend.update(self.index, |player| player.stops += 1);
        Ok(())
    }

    async fn set_volume(&mut self, volume: f32) -> hush_core::Result<()> {
        self.backend
            .update(self.index, |player| player.volumes.push(volume));
        Ok(())
    }

    async fn seek(&mut self, position: Duration) -> hush_core::Result<()> {
        self.backend
            .update(self.index, |player| player.seeks.push(position));
        Ok(())
    }

    async fn unload(&mut self) -> hush_core::Result<()> {
        self.backend.update(self.index, |player| player.unloads += 1);
        Ok(())
    }
}

// ============================================================================
// Audio source resolver
// ============================================================================

#[derive(Default)]
struct ResolverState {
    cached: HashSet<String>,
    failing: HashSet<String>,
    download_time: Option<Duration>,
    resolve_delay: Duration,
    streams: usize,
}

/// Resolver backed by in-memory rules
///
/// Uncached tracks stream from `https://cdn.test/<remote path>`; their local
/// copy lands after the configured download time (never, by default).
#[derive(Clone, Default)]
pub struct FakeResolver {
    state: Arc<Mutex<ResolverState>>,
}

impl FakeResolver {
    /// Pretend `file_ref` is already in the local cache
    pub fn cache(&self, file_ref: &str) {
        self.state.lock().unwrap().cached.insert(file_ref.to_string());
    }

    /// Make streaming `remote_path` fail
    pub fn fail(&self, remote_path: &str) {
        self.state.lock().unwrap().failing.insert(remote_path.to_string());
    }

    pub fn heal(&self, remote_path: &str) {
        self.state.lock().unwrap().failing.remove(remote_path);
    }

    pub fn set_download_time(&self, download_time: Duration) {
        self.state.lock().unwrap().download_time = Some(download_time);
    }

    pub fn set_resolve_delay(&self, delay: Duration) {
        self.state.lock().unwrap().resolve_delay = delay;
    }

    pub fn streams(&self) -> usize {
        self.state.lock().unwrap().streams
    }
}

#[async_trait]
impl AudioSourceResolver for FakeResolver {
    async fn resolve_local(&self, file_ref: &str) -> hush_core::Result<LocalFile> {
        let delay = self.state.lock().unwrap().resolve_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let exists = self.state.lock().unwrap().cached.contains(file_ref);
        Ok(LocalFile {
            exists,
            uri: format!("file:///cache/{file_ref}"),
        })
    }

    async fn resolve_streaming(
        &self,
        remote_path: &str,
        file_ref: &str,
        progress: Option<ProgressCallback>,
    ) -> hush_core::Result<StreamingSource> {
        let (failing, download_time) = {
            let mut state = self.state.lock().unwrap();
            state.streams += 1;
            (state.failing.contains(remote_path), state.download_time)
        };
        if failing {
            return Err(HushError::resolution(format!("{remote_path} not found")));
        }

        if let Some(progress) = progress {
            progress(DownloadProgress {
                bytes_received: 50,
                bytes_total: Some(100),
                progress: 0.5,
            });
        }

        let local_uri = format!("file:///cache/{file_ref}");
        let local = async move {
            match download_time {
                Some(download_time) => {
                    tokio::time::sleep(download_time).await;
                    Ok::<_, HushError>(local_uri)
                }
                None => std::future::pending().await,
            }
        }
        .boxed();

        Ok(StreamingSource {
            streaming_uri: format!("https://cdn.test/{remote_path}"),
            local_uri: local,
        })
    }
}

// ============================================================================
// History and favorites
// ============================================================================

#[derive(Clone, Default)]
pub struct RecordingHistory {
    entries: Arc<Mutex<Vec<(UserId, HistoryEntry)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingHistory {
    pub fn entries(&self) -> Vec<(UserId, HistoryEntry)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl HistoryRecorder for RecordingHistory {
    async fn record(&self, user: &UserId, entry: HistoryEntry) -> hush_core::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HushError::history("history service offline"));
        }
        self.entries.lock().unwrap().push((user.clone(), entry));
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeFavorites {
    saved: Arc<Mutex<Vec<(UserId, HistoryEntry)>>>,
}

impl FakeFavorites {
    pub fn saved(&self) -> Vec<(UserId, HistoryEntry)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl FavoritesStore for FakeFavorites {
    async fn add_favorite(
        &self,
        user: &UserId,
        entry: HistoryEntry,
    ) -> hush_core::Result<FavoriteId> {
        let mut saved = self.saved.lock().unwrap();
        saved.push((user.clone(), entry));
        Ok(FavoriteId::new(format!("fav-{}", saved.len())))
    }

    async fn find_favorite(
        &self,
        user: &UserId,
        item_id: &str,
    ) -> hush_core::Result<Option<FavoriteId>> {
        let saved = self.saved.lock().unwrap();
        let found = saved
            .iter()
            .position(|(owner, entry)| owner == user && entry.item_id() == item_id);
        Ok(found.map(|index| FavoriteId::new(format!("fav-{}", index + 1))))
    }
}

// ============================================================================
// Session harness
// ============================================================================

pub struct Harness {
    pub session: SessionHandle,
    pub backend: FakeBackend,
    pub resolver: FakeResolver,
    pub history: RecordingHistory,
    pub favorites: FakeFavorites,
}

impl Harness {
    /// Session with a signed-in user and default configuration
    pub fn new() -> Self {
        Self::build(SessionConfig::default(), StaticAuth::signed_in("user-1"))
    }

    pub fn anonymous() -> Self {
        Self::build(SessionConfig::default(), StaticAuth::anonymous())
    }

    pub fn build(config: SessionConfig, auth: StaticAuth) -> Self {
        let backend = FakeBackend::default();
        let resolver = FakeResolver::default();
        let history = RecordingHistory::default();
        let favorites = FakeFavorites::default();

        let session = PlaybackSession::spawn(
            config,
            Collaborators {
                backend: Arc::new(backend.clone()),
                resolver: Arc::new(resolver.clone()),
                history: Arc::new(history.clone()),
                favorites: Arc::new(favorites.clone()),
                auth: Arc::new(auth),
            },
        );

        Self {
            session,
            backend,
            resolver,
            history,
            favorites,
        }
    }

    /// Wait (in virtual time) until the session state satisfies `predicate`
    pub async fn wait(&self, predicate: impl FnMut(&SessionSnapshot) -> bool) -> SessionSnapshot {
        self.wait_within(Duration::from_secs(30), predicate).await
    }

    pub async fn wait_within(
        &self,
        limit: Duration,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> SessionSnapshot {
        tokio::time::timeout(limit, self.session.wait_for(predicate))
            .await
            .expect("timed out waiting for session state")
            .expect("session closed")
    }

    /// Wait until every listed track reports `status`
    pub async fn wait_all(&self, ids: &[&str], status: TrackStatus) -> SessionSnapshot {
        self.wait(|snapshot| {
            ids.iter()
                .all(|id| snapshot.track(id).is_some_and(|view| view.status == status))
        })
        .await
    }

    /// Release every player and wait for all workers to finish
    pub async fn shutdown(&self) {
        self.session.shutdown().await.expect("session already closed");
    }
}

/// Ambient sound resolved through the resolver
pub fn sound(id: &str) -> Track {
    Track::sound(id, id, "icon-outline", format!("whiteNoises_1.0/{id}.wav"))
}

/// Track with a known playable URI
pub fn direct(id: &str) -> Track {
    Track::with_uri(id, id, format!("https://cdn.test/direct/{id}.wav"))
}

pub fn status_of(snapshot: &SessionSnapshot, id: &str) -> TrackStatus {
    snapshot
        .track(id)
        .map(|view| view.status.clone())
        .expect("track not in session")
}

/// Let spawned fire-and-forget tasks run
pub async fn let_tasks_run() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Everything broadcast so far
pub fn drain(receiver: &mut broadcast::Receiver<SessionNotification>) -> Vec<SessionNotification> {
    let mut notifications = Vec::new();
    while let Ok(notification) = receiver.try_recv() {
        notifications.push(notification);
    }
    notifications
}
