//! Frame delta time.
//!
//! The game loop ticks one [`Time`] at the start of every redraw, before
//! [`Game::update`](crate::app::Game::update) runs. A frame that took longer
//! than [`MAX_DELTA`] (a window drag, a debugger pause) reports `MAX_DELTA`,
//! so the simulation never jumps by seconds at once.

use std::time::{Duration, Instant};

/// Upper bound on one frame's delta.
pub const MAX_DELTA: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy)]
pub struct Time {
    last_tick: Instant,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Time {
    pub(crate) fn new() -> Self {
        Self::started(Instant::now())
    }

    fn started(now: Instant) -> Self {
        Self {
            last_tick: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    pub(crate) fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_tick).min(MAX_DELTA);
        self.last_tick = now;
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta in seconds, the multiplier for per-second speeds.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Simulated time: the sum of all (clamped) deltas.
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_frames_are_clamped() {
        let start = Instant::now();
        let mut time = Time::started(start);

        time.tick_at(start + Duration::from_millis(16));
        assert_eq!(time.delta(), Duration::from_millis(16));

        time.tick_at(start + Duration::from_secs(3));
        assert_eq!(time.delta(), MAX_DELTA);
        assert!((time.elapsed_secs() - 0.266).abs() < 1e-6);
        assert_eq!(time.frame_count(), 2);
    }
}
