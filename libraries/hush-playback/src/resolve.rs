//! Source resolution for tracks without a playable URI
//!
//! Order of preference: a cached local copy, then a streaming URI whose
//! background download later replaces it. Each resolution runs as its own
//! task and reports back with the ticket it was started under.

use crate::error::TrackError;
use crate::events::SessionMessage;
use hush_core::{AudioSourceResolver, DownloadProgress, Track, TrackId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Spawn a resolution task for `track`
pub(crate) fn spawn_resolution(
    resolver: Arc<dyn AudioSourceResolver>,
    track: Track,
    ticket: u64,
    events: mpsc::UnboundedSender<SessionMessage>,
) {
    tokio::spawn(async move {
        let track_id = track.id.clone();
        let result = resolve(resolver.as_ref(), &track, &events).await;
        let local = match result {
            Ok(resolution) => {
                let _ = events.send(SessionMessage::Resolved {
                    track_id: track_id.clone(),
                    ticket,
                    result: Ok(resolution.uri),
                });
                resolution.local
            }
            Err(err) => {
                let _ = events.send(SessionMessage::Resolved {
                    track_id,
                    ticket,
                    result: Err(err),
                });
                return;
            }
        };

        let Some(local) = local else {
            return;
        };
        match local.await {
            Ok(uri) => {
                info!(track_id = %track_id, "Local copy ready");
                let _ = events.send(SessionMessage::LocalReady {
                    track_id,
                    ticket,
                    uri,
                });
            }
            Err(err) => {
                warn!(track_id = %track_id, error = %err, "Background download failed");
            }
        }
    });
}

struct Resolution {
    uri: String,
    local: Option<futures_util::future::BoxFuture<'static, hush_core::Result<String>>>,
}

async fn resolve(
    resolver: &dyn AudioSourceResolver,
    track: &Track,
    events: &mpsc::UnboundedSender<SessionMessage>,
) -> Result<Resolution, TrackError> {
    let (Some(remote_path), Some(file_ref)) = (track.remote_path.as_deref(), track.cache_file_name())
    else {
        return Err(TrackError::Resolution(format!(
            "{} is not available",
            track.display_name
        )));
    };

    match resolver.resolve_local(&file_ref).await {
        Ok(local) if local.exists => {
            debug!(track_id = %track.id, uri = %local.uri, "Using cached copy");
            return Ok(Resolution {
                uri: local.uri,
                local: None,
            });
        }
        Ok(_) => {}
        Err(err) => {
            // A broken cache lookup still allows streaming
            warn!(track_id = %track.id, error = %err, "Local cache lookup failed");
        }
    }

    let progress = progress_reporter(track.id.clone(), events.clone());
    let source = resolver
        .resolve_streaming(remote_path, &file_ref, Some(progress))
        .await
        .map_err(|err| TrackError::from_resolution(&err))?;

    debug!(track_id = %track.id, uri = %source.streaming_uri, "Streaming while downloading");
    Ok(Resolution {
        uri: source.streaming_uri,
        local: Some(source.local_uri),
    })
}

fn progress_reporter(
    track_id: TrackId,
    events: mpsc::UnboundedSender<SessionMessage>,
) -> hush_core::ProgressCallback {
    Box::new(move |progress: DownloadProgress| {
        let _ = events.send(SessionMessage::DownloadProgress {
            track_id: track_id.clone(),
            progress: progress.progress.clamp(0.0, 1.0),
        });
    })
}
