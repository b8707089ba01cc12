//! Frame timing, owned by the app shell rather than a process-wide global.

use std::time::Instant;

/// Per-frame clock: delta time, exponentially smoothed FPS and total
/// elapsed time since creation.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    last: Instant,
    delta: f32,
    fps_smooth: f32,
    elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            delta: 0.0,
            fps_smooth: 0.0,
            elapsed: 0.0,
        }
    }

    /// Advance to the current instant and return the frame delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;

        if self.delta > 0.0 {
            let instantaneous = 1.0 / self.delta;
            self.fps_smooth = if self.fps_smooth == 0.0 {
                instantaneous
            } else {
                0.9 * self.fps_smooth + 0.1 * instantaneous
            };
        }

        self.elapsed += self.delta;
        self.delta
    }

    /// Seconds covered by the last tick.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// FPS smoothed over recent frames.
    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
