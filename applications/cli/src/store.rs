//! JSON-lines history and favorites store
//!
//! Each record is one JSON object per line, appended to `history.jsonl` or
//! `favorites.jsonl`. Lines that cannot be parsed are skipped when reading.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hush_core::{FavoriteId, FavoritesStore, HistoryEntry, HistoryRecorder, HushError, Result, UserId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// One listening event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub user_id: UserId,
    pub entry: HistoryEntry,
}

/// One saved favorite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub saved_at: DateTime<Utc>,
    pub entry: HistoryEntry,
}

pub struct JsonLinesStore {
    history_path: PathBuf,
    favorites_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesStore {
    pub fn new(history_path: impl Into<PathBuf>, favorites_path: impl Into<PathBuf>) -> Self {
        Self {
            history_path: history_path.into(),
            favorites_path: favorites_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// History of `user`, oldest first
    pub async fn history(&self, user: &UserId) -> Result<Vec<HistoryRecord>> {
        let records: Vec<HistoryRecord> = read_lines(&self.history_path).await?;
        Ok(records.into_iter().filter(|r| &r.user_id == user).collect())
    }

    /// Favorites of `user`, oldest first
    pub async fn favorites(&self, user: &UserId) -> Result<Vec<FavoriteRecord>> {
        let records: Vec<FavoriteRecord> = read_lines(&self.favorites_path).await?;
        Ok(records.into_iter().filter(|r| &r.user_id == user).collect())
    }

    async fn append<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryRecorder for JsonLinesStore {
    async fn record(&self, user: &UserId, entry: HistoryEntry) -> Result<()> {
        debug!(user = %user, item = %entry.item_id(), "Recording history");
        let record = HistoryRecord {
            user_id: user.clone(),
            entry,
        };
        self.append(&self.history_path, &record)
            .await
            .map_err(|e| HushError::history(e.to_string()))
    }
}

#[async_trait]
impl FavoritesStore for JsonLinesStore {
    async fn add_favorite(&self, user: &UserId, entry: HistoryEntry) -> Result<FavoriteId> {
        let record = FavoriteRecord {
            id: FavoriteId::generate(),
            user_id: user.clone(),
            saved_at: Utc::now(),
            entry,
        };
        self.append(&self.favorites_path, &record)
            .await
            .map_err(|e| HushError::favorites(e.to_string()))?;
        Ok(record.id)
    }

    async fn find_favorite(&self, user: &UserId, item_id: &str) -> Result<Option<FavoriteId>> {
        let favorites = self.favorites(user).await?;
        Ok(favorites
            .into_iter()
            .find(|record| {
                matches!(record.entry, HistoryEntry::Sound { .. })
                    && record.entry.item_id() == item_id
            })
            .map(|record| record.id))
    }
}

async fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut records = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(path = %path.display(), line = number + 1, error = %e, "Skipping unreadable record"),
        }
    }
    Ok(records)
}
