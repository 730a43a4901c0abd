//! Elapsed-time source for the animation tick.

use instant::Instant;

/// Wall-clock elapsed time since construction or the last restart.
///
/// Frontends read `elapsed_seconds` once per frame and feed it to
/// [`crate::scene::Scene::tick`]; the animation itself is a pure function of
/// that value, so tests bypass the clock entirely.
pub struct FrameClock {
    started: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    pub fn restart(&mut self) {
        self.started = Instant::now();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames-per-second sampler for a diagnostic overlay.
///
/// Counts frames and reports a rate once per sampling window.
pub struct FpsCounter {
    window_started: Instant,
    window: f32,
    frames: u32,
}

impl FpsCounter {
    pub fn new(window_seconds: f32) -> Self {
        Self {
            window_started: Instant::now(),
            window: window_seconds.max(0.1),
            frames: 0,
        }
    }

    /// Record one frame. Returns the measured rate when a sampling window
    /// has elapsed, `None` otherwise.
    pub fn frame(&mut self) -> Option<f32> {
        self.frames += 1;
        let elapsed = self.window_started.elapsed().as_secs_f32();
        if elapsed < self.window {
            return None;
        }
        let rate = self.frames as f32 / elapsed;
        self.frames = 0;
        self.window_started = Instant::now();
        Some(rate)
    }
}
