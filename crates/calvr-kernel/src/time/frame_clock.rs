use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Duration of the previous frame in seconds (clamped).
    pub dt: f64,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Instantaneous frame rate implied by `dt`.
    #[inline]
    pub fn fps(&self) -> f64 {
        if self.dt > 0.0 { 1.0 / self.dt } else { 0.0 }
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped so that a debugger pause or a minimized window does
/// not read as a 0 fps frame and collapse the zone grid in one go.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    last_dt: f64,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Clamps: 0.1 ms .. 250 ms.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            last_dt: dt_min.as_secs_f64(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline, e.g. after the surface was reconfigured.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Duration of the most recent frame, in seconds.
    pub fn last_frame_duration(&self) -> f64 {
        self.last_dt
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        self.advance_to(now)
    }

    fn advance_to(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;
        self.last_dt = dt.as_secs_f64();

        let ft = FrameTime {
            dt: self.last_dt,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_counts_frames() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
    }

    #[test]
    fn dt_is_clamped_high() {
        let mut clock = FrameClock::new();
        let later = clock.last + Duration::from_secs(5);
        let ft = clock.advance_to(later);
        assert!((ft.dt - 0.25).abs() < 1e-9);
        assert!((clock.last_frame_duration() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn dt_is_clamped_low() {
        let mut clock = FrameClock::new();
        let same = clock.last;
        let ft = clock.advance_to(same);
        assert!((ft.dt - 0.0001).abs() < 1e-9);
    }

    #[test]
    fn fps_from_dt() {
        let mut clock = FrameClock::new();
        let later = clock.last + Duration::from_millis(50);
        let ft = clock.advance_to(later);
        assert!((ft.fps() - 20.0).abs() < 1e-6);
    }
}
