//! Rate limiting for pointer-move painting.

use std::time::{Duration, Instant};

use glam::Vec3;

/// Allows at most one brush invocation per interval.
///
/// Positions offered inside the window replace each other; only the latest
/// survives and is released by [`Throttle::poll`] once the window elapses
/// (trailing edge). Dropped positions are never queued.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fire: Option<Instant>,
    pending: Option<Vec3>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Record an invocation made outside the throttle (the pointer-down dab)
    pub fn mark_fired(&mut self, now: Instant) {
        self.last_fire = Some(now);
        self.pending = None;
    }

    /// Offer a new position. Returns it if it may be painted immediately,
    /// otherwise keeps it as the pending trailing position.
    pub fn offer(&mut self, position: Vec3, now: Instant) -> Option<Vec3> {
        if self.window_elapsed(now) {
            self.mark_fired(now);
            Some(position)
        } else {
            self.pending = Some(position);
            None
        }
    }

    /// Release the pending position if its window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<Vec3> {
        if self.pending.is_none() || !self.window_elapsed(now) {
            return None;
        }
        self.last_fire = Some(now);
        self.pending.take()
    }

    /// Release the pending position regardless of timing (gesture end)
    pub fn flush(&mut self) -> Option<Vec3> {
        self.pending.take()
    }

    /// Drop the pending position without painting it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn window_elapsed(&self, now: Instant) -> bool {
        self.last_fire
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }
}
