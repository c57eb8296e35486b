use std::time::{Duration, Instant};

/// Frame clock driving the session's notion of time.
///
/// Can run against the wall clock ([`tick`](Self::tick)) or be stepped with a fixed or
/// measured delta ([`advance`](Self::advance)), which keeps headless runs deterministic.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_update: Option<Instant>,
    /// Time since last tick, in seconds
    pub delta: f32,
    /// Total elapsed time, in seconds
    pub elapsed: f32,
    /// Total number of ticks
    pub frame_count: u64,
    /// Upper bound on a single delta, so a stalled frame cannot skip whole cues.
    pub max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_update: None,
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
            max_delta: 0.1,
        }
    }

    /// Steps by the wall-clock time since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last_update
            .map_or(Duration::ZERO, |last| now.duration_since(last))
            .as_secs_f32();
        self.last_update = Some(now);
        self.advance(dt)
    }

    /// Steps by `dt` seconds (clamped to `[0, max_delta]`) and returns the applied delta.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, self.max_delta) } else { 0.0 };
        self.delta = dt;
        self.elapsed += dt;
        self.frame_count += 1;
        dt
    }

    #[must_use]
    pub fn now(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_clamps_spikes() {
        let mut clock = FrameClock::new();
        assert!((clock.advance(1.0 / 60.0) - 1.0 / 60.0).abs() < 1e-7);
        assert!((clock.advance(5.0) - 0.1).abs() < 1e-7);
        assert!((clock.advance(-1.0)).abs() < 1e-7);
        assert_eq!(clock.frame_count, 3);
        assert!((clock.now() - (1.0 / 60.0 + 0.1)).abs() < 1e-6);
    }
}
