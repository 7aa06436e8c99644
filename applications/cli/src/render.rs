//! Terminal rendering of session state

use hush_core::HistoryEntry;
use hush_playback::{format_remaining, SessionNotification, SessionSnapshot, TrackStatus};

/// One-line summary of the session, without the timer countdown
pub fn status_line(snapshot: &SessionSnapshot) -> String {
    if snapshot.tracks.is_empty() {
        return "(no tracks)".to_string();
    }

    let transport = if snapshot.is_buffering {
        "buffering"
    } else if snapshot.is_playing {
        "playing"
    } else {
        "paused"
    };

    let tracks = snapshot
        .tracks
        .iter()
        .map(|view| {
            let mut line = format!(
                "{} [{}] {:.0}%",
                view.track.display_name,
                status_label(&view.status),
                view.volume * 100.0
            );
            if let Some(progress) = view.download_progress {
                line.push_str(&format!(" (caching {:.0}%)", progress * 100.0));
            }
            line
        })
        .collect::<Vec<_>>()
        .join(" | ");

    format!("{transport}: {tracks}")
}

pub fn status_label(status: &TrackStatus) -> String {
    match status {
        TrackStatus::Idle => "idle".to_string(),
        TrackStatus::Resolving => "resolving".to_string(),
        TrackStatus::Loading => "loading".to_string(),
        TrackStatus::Ready => "ready".to_string(),
        TrackStatus::Playing => "playing".to_string(),
        TrackStatus::Paused => "paused".to_string(),
        TrackStatus::Failed(err) => format!("failed: {err}"),
    }
}

pub fn notification_line(notification: &SessionNotification) -> String {
    match notification {
        SessionNotification::TimerStarted { duration } => {
            format!("Timer Set: playback stops in {}", format_remaining(*duration))
        }
        SessionNotification::TimerCancelled => "Timer Cancelled".to_string(),
        SessionNotification::TimerExpired => "Timer Ended: playback stopped".to_string(),
        SessionNotification::TrackFailed { track_id, error } => {
            format!("{track_id} failed: {error}")
        }
        SessionNotification::LocalCopyReady { track_id } => format!("{track_id} is now cached"),
        SessionNotification::AutoHidden => "No track could be played".to_string(),
    }
}

pub fn history_line(entry: &HistoryEntry) -> String {
    match entry {
        HistoryEntry::Sound { track, played_at } => {
            format!("{}  {} ({})", played_at.format("%Y-%m-%d %H:%M"), track.name, track.id)
        }
        HistoryEntry::Mix {
            name,
            sounds,
            played_at,
            ..
        } => {
            let names = sounds
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}  {name}: {names}", played_at.format("%Y-%m-%d %H:%M"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hush_core::Track;
    use hush_playback::{SessionVisibility, TrackView};
    use std::time::Duration;

    fn view(name: &str, status: TrackStatus) -> TrackView {
        TrackView {
            track: Track::sound(name, name, "", format!("whiteNoises_1.0/{name}.wav")),
            status,
            volume: 0.5,
            handle_id: None,
            buffering: false,
            position: Duration::ZERO,
            duration: None,
            download_progress: None,
        }
    }

    #[test]
    fn summarises_tracks() {
        let mut snapshot = SessionSnapshot::empty();
        assert_eq!(status_line(&snapshot), "(no tracks)");

        snapshot.visibility = SessionVisibility::Minimized;
        snapshot.is_playing = true;
        snapshot.tracks = vec![
            view("Rain", TrackStatus::Playing),
            view("Ocean", TrackStatus::Loading),
        ];
        assert_eq!(
            status_line(&snapshot),
            "playing: Rain [playing] 50% | Ocean [loading] 50%"
        );
    }

    #[test]
    fn timer_notifications_read_like_alerts() {
        let started = SessionNotification::TimerStarted {
            duration: Duration::from_secs(30 * 60),
        };
        assert_eq!(notification_line(&started), "Timer Set: playback stops in 30:00");
        assert_eq!(
            notification_line(&SessionNotification::TimerExpired),
            "Timer Ended: playback stopped"
        );
    }
}
