//! Background downloads into the cache directory

use crate::error::{CacheError, Result};
use futures_util::StreamExt;
use hush_core::{DownloadProgress, ProgressCallback};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

/// Download `url` to `dest`, reporting progress after every chunk
///
/// The body is written to a `.part` file next to `dest` and renamed once
/// complete, so a cache lookup never sees a half-written file. Every
/// download gets its own part file, so concurrent downloads of the same
/// file never write into each other.
pub(crate) async fn download_file(
    http: &Client,
    url: &Url,
    dest: &Path,
    progress: Option<ProgressCallback>,
) -> Result<u64> {
    debug!(url = %url, dest = %dest.display(), "Downloading audio file");

    let response = http.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CacheError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let total_size = response.content_length();

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let partial = partial_path(dest);
    let result = write_body(response, &partial, total_size, progress.as_ref()).await;
    let downloaded = match result {
        Ok(downloaded) => downloaded,
        Err(err) => {
            // Leave nothing behind that could be mistaken for a cached file
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err);
        }
    };

    tokio::fs::rename(&partial, dest).await?;

    info!(
        dest = %dest.display(),
        size = downloaded,
        "Audio file cached"
    );
    Ok(downloaded)
}

async fn write_body(
    response: reqwest::Response,
    partial: &Path,
    total_size: Option<u64>,
    progress: Option<&ProgressCallback>,
) -> Result<u64> {
    let mut file = File::create(partial).await?;
    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;

        if let Some(progress) = progress {
            let fraction = total_size
                .filter(|total| *total > 0)
                .map(|total| downloaded as f32 / total as f32)
                .unwrap_or(0.0);
            progress(DownloadProgress {
                bytes_received: downloaded,
                bytes_total: total_size,
                progress: fraction.min(1.0),
            });
        }
    }

    if let Some(total) = total_size {
        if downloaded < total {
            return Err(CacheError::DownloadAborted(format!(
                "received {downloaded} of {total} bytes"
            )));
        }
    }

    file.flush().await?;
    Ok(downloaded)
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.part", Uuid::new_v4().simple()));
    dest.with_file_name(name)
}
