/// JSON-lines store tests
/// Covers history and favorites persistence through the collaborator traits
use hush_cli::JsonLinesStore;
use hush_core::{FavoritesStore, HistoryEntry, HistoryRecorder, Track, UserId};
use tempfile::TempDir;

fn store(dir: &TempDir) -> JsonLinesStore {
    JsonLinesStore::new(
        dir.path().join("data/history.jsonl"),
        dir.path().join("data/favorites.jsonl"),
    )
}

fn rain() -> Track {
    Track::sound("rain", "Rain", "rainy-outline", "whiteNoises_1.0/Rain.wav")
}

fn ocean() -> Track {
    Track::sound("ocean", "Ocean", "water-outline", "whiteNoises_1.0/Ocean.wav")
}

/// Test history is appended per user and read back in order
#[tokio::test]
async fn test_history_round_trip_per_user() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let sam = UserId::new("sam");
    let alex = UserId::new("alex");

    store.record(&sam, HistoryEntry::single(&rain())).await.unwrap();
    store.record(&alex, HistoryEntry::single(&ocean())).await.unwrap();
    store
        .record(&sam, HistoryEntry::mix(&[rain(), ocean()]))
        .await
        .unwrap();

    let history = store.history(&sam).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].entry.item_id(), "rain");
    assert!(history[1].entry.item_id().starts_with("mix-"));
    assert_eq!(store.history(&alex).await.unwrap().len(), 1);
}

/// Test reading before anything was written yields nothing
#[tokio::test]
async fn test_missing_files_read_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let sam = UserId::new("sam");

    assert!(store.history(&sam).await.unwrap().is_empty());
    assert!(store.favorites(&sam).await.unwrap().is_empty());
    assert_eq!(store.find_favorite(&sam, "rain").await.unwrap(), None);
}

/// Test a saved single sound can be found again, mixes cannot
#[tokio::test]
async fn test_find_favorite_matches_single_sounds() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let sam = UserId::new("sam");

    let id = store
        .add_favorite(&sam, HistoryEntry::single(&rain()))
        .await
        .unwrap();
    let mix = HistoryEntry::mix(&[rain(), ocean()]);
    let mix_id = mix.item_id().to_string();
    store.add_favorite(&sam, mix).await.unwrap();

    assert_eq!(store.find_favorite(&sam, "rain").await.unwrap(), Some(id));
    assert_eq!(store.find_favorite(&sam, &mix_id).await.unwrap(), None);
    assert_eq!(
        store.find_favorite(&UserId::new("alex"), "rain").await.unwrap(),
        None
    );
    assert_eq!(store.favorites(&sam).await.unwrap().len(), 2);
}

/// Test unreadable lines are skipped instead of failing the whole file
#[tokio::test]
async fn test_corrupt_lines_skipped() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let sam = UserId::new("sam");

    store.record(&sam, HistoryEntry::single(&rain())).await.unwrap();
    let path = dir.path().join("data/history.jsonl");
    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("{not json\n");
    std::fs::write(&path, contents).unwrap();
    store.record(&sam, HistoryEntry::single(&ocean())).await.unwrap();

    let history = store.history(&sam).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].entry.item_id(), "ocean");
}
