//! Frame clock.
//!
//! [`Time`] is the single source of `(elapsed, delta)` for the frame loop.
//! The viewer calls [`Time::update`] once per redraw; tests and benches drive
//! it by hand with [`Time::advance`].
//!
//! ```ignore
//! let mut time = Time::new();
//!
//! // In the redraw handler:
//! let (elapsed, delta) = time.update();
//! scene.step(delta, elapsed);
//! ```

use std::time::{Duration, Instant};

/// Elapsed time, delta time, frame count and FPS.
#[derive(Debug)]
pub struct Time {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    /// Elapsed time at the last FPS calculation.
    fps_update_elapsed: f32,
    fps_update_interval: f32,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
}

impl Time {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_elapsed: 0.0,
            fps_update_interval: 0.5,
            fixed_delta: None,
        }
    }

    /// Create a clock that advances by exactly `delta` seconds per update.
    pub fn fixed(delta: f32) -> Self {
        let mut time = Self::new();
        time.set_fixed_delta(Some(delta));
        time
    }

    /// Sample the wall clock. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience. With a fixed
    /// delta set, elapsed time is the sum of fixed steps instead.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        match self.fixed_delta {
            Some(delta) => self.advance(delta),
            None => {
                let elapsed = now.duration_since(self.start).as_secs_f32();
                self.step_to(elapsed, raw_delta)
            }
        }
    }

    /// Advance by `delta` seconds without looking at the wall clock.
    pub fn advance(&mut self, delta: f32) -> (f32, f32) {
        let delta = delta.max(0.0);
        self.step_to(self.elapsed_secs + delta, delta)
    }

    fn step_to(&mut self, elapsed: f32, delta: f32) -> (f32, f32) {
        self.elapsed_secs = elapsed;
        self.delta_secs = delta;
        self.frame_count += 1;

        // Update FPS periodically
        let window = self.elapsed_secs - self.fps_update_elapsed;
        if window >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / window;
            self.fps_frame_count = self.frame_count;
            self.fps_update_elapsed = self.elapsed_secs;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Elapsed time as a `Duration`, the unit the intro timeline uses.
    #[inline]
    pub fn elapsed_duration(&self) -> Duration {
        Duration::from_secs_f32(self.elapsed_secs)
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Set a fixed delta time for deterministic updates.
    ///
    /// Pass `None` to use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
