//! Sleep timer
//!
//! Counts down to an absolute end time and reports expiry exactly once.
//! The timer never touches players itself: its owner pauses the session
//! when `tick` reports `Expired`.

use std::future::pending;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Sleep timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No countdown running
    Idle,
    /// Counting down
    Armed {
        /// Duration the user asked for
        requested: Duration,
        /// Absolute end time
        ends_at: Instant,
    },
}

/// Result of one timer check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Still counting down
    Remaining(Duration),
    /// End time reached; the timer is already back to `Idle`
    Expired,
}

/// Countdown that pauses playback when it runs out
#[derive(Debug)]
pub struct SleepTimer {
    state: TimerState,
    interval: Option<Interval>,
    tick_every: Duration,
    remaining: Option<Duration>,
}

impl SleepTimer {
    /// Create an idle timer checking every `tick_every`
    pub fn new(tick_every: Duration) -> Self {
        Self {
            state: TimerState::Idle,
            interval: None,
            tick_every,
            remaining: None,
        }
    }

    /// Arm the timer for `minutes`, replacing any running countdown
    pub fn start(&mut self, minutes: u32) -> Duration {
        let requested = Duration::from_secs(u64::from(minutes) * 60);
        let now = Instant::now();
        self.state = TimerState::Armed {
            requested,
            ends_at: now + requested,
        };
        self.remaining = Some(requested);

        let mut interval = interval_at(now + self.tick_every, self.tick_every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);

        requested
    }

    /// Disarm the timer; returns whether a countdown was running
    pub fn cancel(&mut self) -> bool {
        let was_armed = self.is_armed();
        self.state = TimerState::Idle;
        self.interval = None;
        self.remaining = None;
        was_armed
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, TimerState::Armed { .. })
    }

    /// Remaining time as of the last tick (or the start)
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    /// Wait for the next check and evaluate it
    ///
    /// Pends forever while idle. On expiry the timer transitions to `Idle`
    /// before returning, so a countdown can only expire once.
    pub async fn tick(&mut self) -> TimerTick {
        let Some(interval) = self.interval.as_mut() else {
            return pending().await;
        };
        interval.tick().await;

        match self.state {
            TimerState::Armed { ends_at, .. } => {
                let now = Instant::now();
                if now >= ends_at {
                    self.cancel();
                    TimerTick::Expired
                } else {
                    let remaining = ends_at - now;
                    self.remaining = Some(remaining);
                    TimerTick::Remaining(remaining)
                }
            }
            TimerState::Idle => {
                self.interval = None;
                pending().await
            }
        }
    }
}

/// Round a selector value to the snap interval and clamp it to `[0, max]`
pub fn snap_timer_minutes(value: f32, snap: u32, max: u32) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let snap = snap.max(1) as f32;
    let snapped = (value / snap).round() * snap;
    (snapped as u32).min(max)
}

/// Format a remaining duration as `M:SS`
pub fn format_remaining(remaining: Duration) -> String {
    let total_seconds = remaining.as_secs();
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
