use std::time::Instant;

/// Frame timer
///
/// Tracks the time since creation (drives the rotation angle) and the
/// time between ticks (drives movement)
pub struct Timer {
    start_time: Instant,
    last_tick: Instant,
}

impl Timer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_tick: now,
        }
    }

    /// Returns the seconds since the previous tick (or since creation) and
    /// starts a new interval
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    pub fn elapsed_start(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
