//! Debounced buffering indicator
//!
//! A global play/pause toggle fans out to every track handle. If none of
//! them has settled within a short delay the UI shows a buffering spinner;
//! fast toggles never flash it.

use std::future::pending;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// A single-shot timer that can be re-armed and cancelled
///
/// The timer is just a deadline polled by its owner, so dropping or
/// clearing it can never leave a callback firing later.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer from now
    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Disarm the timer; returns whether it was armed
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Completes when the armed deadline passes; pends forever when disarmed
    ///
    /// Cancel safe: dropping the future leaves the timer armed.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => pending::<()>().await,
        }
    }
}

/// Buffering spinner state for global toggles
#[derive(Debug, Clone)]
pub struct BufferingIndicator {
    debounce: Debounce,
    showing: bool,
}

impl BufferingIndicator {
    pub fn new(delay: Duration) -> Self {
        Self {
            debounce: Debounce::new(delay),
            showing: false,
        }
    }

    /// A toggle was issued; show the spinner unless it settles in time
    pub fn begin(&mut self) {
        self.debounce.arm();
    }

    /// The first handle answered the toggle
    pub fn settle(&mut self) {
        self.debounce.cancel();
        self.showing = false;
    }

    /// Drop any pending or visible indicator (session hidden or torn down)
    pub fn reset(&mut self) {
        self.settle();
    }

    /// Whether a toggle is still awaiting its first answer
    pub fn is_pending(&self) -> bool {
        self.debounce.is_armed() || self.showing
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    /// Completes when the debounce delay elapses without a settle
    pub async fn elapsed(&mut self) {
        self.debounce.fired().await;
        self.showing = true;
    }
}
