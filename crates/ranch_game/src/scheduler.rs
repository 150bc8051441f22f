//! Frame scheduler
//!
//! Clamps the host's raw frame time and drives the fixed stage order:
//!
//! ```text
//! input → logic → collision → reconcile → render
//! ```
//!
//! Every stage of a frame sees the same [`FrameTime`].

use serde::{Deserialize, Serialize};

/// Default upper bound on one frame's delta
pub const DEFAULT_MAX_DELTA_MS: f32 = 50.0;

/// Time of the frame being run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Clamped delta in milliseconds
    pub delta_ms: f32,
    /// Sum of clamped deltas
    pub elapsed_ms: f64,
    /// Frame number, starting at 1
    pub frame: u64,
}

impl FrameTime {
    pub fn delta_secs(&self) -> f32 {
        self.delta_ms / 1000.0
    }
}

/// Frames-per-second estimate over whole seconds of raw time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    fps: f32,
    window_ms: f32,
    window_frames: u32,
    /// Longest raw delta seen
    pub max_raw_delta_ms: f32,
    /// Frames whose raw delta exceeded the clamp
    pub clamped_frames: u64,
}

impl FrameStats {
    pub fn fps(&self) -> f32 {
        self.fps
    }

    fn record(&mut self, raw_ms: f32, clamped: bool) {
        self.max_raw_delta_ms = self.max_raw_delta_ms.max(raw_ms);
        if clamped {
            self.clamped_frames += 1;
        }

        self.window_ms += raw_ms;
        self.window_frames += 1;
        if self.window_ms >= 1000.0 {
            self.fps = self.window_frames as f32 * 1000.0 / self.window_ms;
            self.window_ms = 0.0;
            self.window_frames = 0;
        }
    }
}

/// Stages of one frame, run in declaration order
pub trait FrameStages {
    fn input(&mut self, time: &FrameTime);
    fn logic(&mut self, time: &FrameTime);
    fn collision(&mut self, time: &FrameTime);
    fn reconcile(&mut self, time: &FrameTime);
    fn render(&mut self, time: &FrameTime);
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    max_delta_ms: f32,
    time: FrameTime,
    stats: FrameStats,
    log_every_frames: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA_MS)
    }
}

impl FrameScheduler {
    pub fn new(max_delta_ms: f32) -> Self {
        Self {
            max_delta_ms,
            time: FrameTime::default(),
            stats: FrameStats::default(),
            log_every_frames: 0,
        }
    }

    /// Log frame statistics every `frames` frames; 0 disables
    pub fn with_log_every(mut self, frames: u64) -> Self {
        self.log_every_frames = frames;
        self
    }

    pub fn max_delta_ms(&self) -> f32 {
        self.max_delta_ms
    }

    /// The last frame run
    pub fn time(&self) -> FrameTime {
        self.time
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Clamp a raw delta; negative and non-finite values become 0
    pub fn clamp_delta(&self, raw_ms: f32) -> f32 {
        if !raw_ms.is_finite() || raw_ms <= 0.0 {
            return 0.0;
        }
        raw_ms.min(self.max_delta_ms)
    }

    /// Advance the clock by one frame without running stages
    pub fn advance(&mut self, raw_ms: f32) -> FrameTime {
        let delta_ms = self.clamp_delta(raw_ms);
        let raw = if raw_ms.is_finite() { raw_ms.max(0.0) } else { delta_ms };
        self.stats.record(raw, raw_ms > self.max_delta_ms);

        self.time = FrameTime {
            delta_ms,
            elapsed_ms: self.time.elapsed_ms + delta_ms as f64,
            frame: self.time.frame + 1,
        };

        if self.log_every_frames > 0 && self.time.frame % self.log_every_frames == 0 {
            log::info!(
                "Frame {}: {:.1} fps, {:.0} ms elapsed, {} clamped",
                self.time.frame,
                self.stats.fps,
                self.time.elapsed_ms,
                self.stats.clamped_frames
            );
        }
        self.time
    }

    /// Run one frame through every stage
    pub fn pump(&mut self, stages: &mut impl FrameStages, raw_ms: f32) -> FrameTime {
        let time = self.advance(raw_ms);
        stages.input(&time);
        stages.logic(&time);
        stages.collision(&time);
        stages.reconcile(&time);
        stages.render(&time);
        time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(&'static str, f32)>,
    }

    impl FrameStages for Recorder {
        fn input(&mut self, t: &FrameTime) {
            self.calls.push(("input", t.delta_ms));
        }
        fn logic(&mut self, t: &FrameTime) {
            self.calls.push(("logic", t.delta_ms));
        }
        fn collision(&mut self, t: &FrameTime) {
            self.calls.push(("collision", t.delta_ms));
        }
        fn reconcile(&mut self, t: &FrameTime) {
            self.calls.push(("reconcile", t.delta_ms));
        }
        fn render(&mut self, t: &FrameTime) {
            self.calls.push(("render", t.delta_ms));
        }
    }

    #[test]
    fn test_stage_order_and_shared_delta() {
        let mut scheduler = FrameScheduler::default();
        let mut recorder = Recorder::default();
        scheduler.pump(&mut recorder, 16.0);

        let names: Vec<_> = recorder.calls.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["input", "logic", "collision", "reconcile", "render"]);
        assert!(recorder.calls.iter().all(|(_, d)| *d == 16.0));
    }

    #[test]
    fn test_clamps_long_frames() {
        let mut scheduler = FrameScheduler::default();
        let time = scheduler.advance(500.0);
        assert_eq!(time.delta_ms, 50.0);
        assert_eq!(time.frame, 1);
        assert_eq!(scheduler.stats().clamped_frames, 1);
    }

    #[test]
    fn test_degenerate_deltas() {
        let scheduler = FrameScheduler::default();
        assert_eq!(scheduler.clamp_delta(-5.0), 0.0);
        assert_eq!(scheduler.clamp_delta(f32::NAN), 0.0);
        assert_eq!(scheduler.clamp_delta(f32::INFINITY), 0.0);
        assert_eq!(scheduler.clamp_delta(0.0), 0.0);
    }

    #[test]
    fn test_fps_over_a_second() {
        let mut scheduler = FrameScheduler::default();
        for _ in 0..50 {
            scheduler.advance(20.0);
        }
        assert!((scheduler.stats().fps() - 50.0).abs() < 1e-3);
        assert!((scheduler.time().elapsed_ms - 1000.0).abs() < 1e-3);
    }
}
