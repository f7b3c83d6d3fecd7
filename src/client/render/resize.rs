//! Trailing-edge debounce for viewport resizes.

use std::time::{Duration, Instant};

/// Quiet period after the last resize before interactions are re-initialized.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record a resize, restarting the quiet period.
    pub fn on_resize(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// `true` exactly once, when the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending deadline.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}
