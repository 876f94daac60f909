pub use instant::Instant;

/// Timing information handed to an episode once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the animation loop started (timestamp × 0.001).
    pub time: f64,
    /// Seconds since the previous frame; zero on the first frame.
    pub delta: f64,
}

/// Converts the high-resolution timestamps delivered by the animation loop
/// into [`FrameTime`]s.
///
/// Mirrors the usual "get delta" clock: it starts on the first frame, so the
/// first delta is always zero.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    previous_ms: Option<f64>,
    elapsed: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, timestamp_ms: f64) -> FrameTime {
        let delta = match self.previous_ms {
            Some(previous) => ((timestamp_ms - previous) * 0.001).max(0.0),
            None => 0.0,
        };
        self.previous_ms = Some(timestamp_ms);
        self.elapsed += delta;

        FrameTime {
            time: timestamp_ms * 0.001,
            delta,
        }
    }

    /// Sum of all deltas handed out so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Milliseconds between `start` and now, the way a display-synchronised
/// callback timestamp is measured.
pub fn timestamp_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delta_is_zero() {
        let mut clock = Clock::new();
        let frame = clock.tick(1500.0);
        assert_eq!(frame.delta, 0.0);
        assert_eq!(frame.time, 1.5);
    }

    #[test]
    fn deltas_follow_timestamps() {
        let mut clock = Clock::new();
        clock.tick(0.0);
        let a = clock.tick(16.0);
        let b = clock.tick(48.0);

        assert!((a.delta - 0.016).abs() < 1e-12);
        assert!((b.delta - 0.032).abs() < 1e-12);
        assert!((clock.elapsed() - 0.048).abs() < 1e-12);
    }

    #[test]
    fn timestamps_going_backwards_do_not_produce_negative_delta() {
        let mut clock = Clock::new();
        clock.tick(100.0);
        assert_eq!(clock.tick(50.0).delta, 0.0);
    }
}
