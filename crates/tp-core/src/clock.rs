//! Session and frame clocks
//!
//! [`RenderClock`] is the scene's elapsed-time source for shader animation.
//! [`FrameClock`] measures per-frame deltas for camera damping and the FPS readout.
//! Both take the current `Instant` from the caller so the frame loop reads
//! the time once per tick.

use std::time::{Duration, Instant};

use crate::constants::{MAX_FRAME_DELTA, MIN_FRAME_DELTA};

/// Monotonic elapsed-seconds counter started at the first tick.
#[derive(Debug, Clone, Default)]
pub struct RenderClock {
    start: Option<Instant>,
    elapsed: f32,
}

impl RenderClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_started(&self) -> bool {
        self.start.is_some()
    }

    /// Advance to `now` and return seconds since the first tick.
    ///
    /// The returned value never decreases, even if `now` goes backwards.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let start = *self.start.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start).as_secs_f32();
        self.elapsed = self.elapsed.max(elapsed);
        self.elapsed
    }

    /// Seconds as of the last tick
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,
    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped to avoid pathological values when the window
/// is minimized or the loop stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
    smoothed_dt: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(
            Duration::from_secs_f32(MIN_FRAME_DELTA),
            Duration::from_secs_f32(MAX_FRAME_DELTA),
        )
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: None,
            frame_index: 0,
            dt_min,
            dt_max,
            smoothed_dt: 1.0 / 60.0,
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let raw = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => self.dt_min,
        };
        let dt = raw.clamp(self.dt_min, self.dt_max).as_secs_f32();
        self.last = Some(now);

        self.smoothed_dt += (dt - self.smoothed_dt) * 0.1;

        let ft = FrameTime {
            dt,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Exponentially smoothed frames per second
    pub fn fps(&self) -> f32 {
        1.0 / self.smoothed_dt
    }

    /// Exponentially smoothed frame time in milliseconds
    pub fn frame_time_ms(&self) -> f32 {
        self.smoothed_dt * 1000.0
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_render_clock_starts_at_first_tick() {
        let t0 = Instant::now();
        let mut clock = RenderClock::new();
        assert!(!clock.is_started());
        assert_eq!(clock.tick(t0 + Duration::from_secs(5)), 0.0);
        assert_relative_eq!(clock.tick(t0 + Duration::from_millis(6500)), 1.5, epsilon = 1e-4);
    }

    #[test]
    fn test_render_clock_is_monotonic() {
        let t0 = Instant::now() + Duration::from_secs(10);
        let mut clock = RenderClock::new();
        clock.tick(t0);
        let later = clock.tick(t0 + Duration::from_secs(2));
        // An earlier instant must not move the clock back
        let earlier = clock.tick(t0 + Duration::from_secs(1));
        assert!(earlier >= later);
    }

    #[test]
    fn test_frame_clock_clamps_delta() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick(t0);
        let stalled = clock.tick(t0 + Duration::from_secs(3));
        assert_relative_eq!(stalled.dt, MAX_FRAME_DELTA, epsilon = 1e-6);
        let tight = clock.tick(t0 + Duration::from_secs(3));
        assert_relative_eq!(tight.dt, MIN_FRAME_DELTA, epsilon = 1e-6);
        assert_eq!(tight.frame_index, 2);
    }
}
