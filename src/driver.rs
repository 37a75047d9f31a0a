//! Drivers - realtime and offline clocks for a timeline
//!
//! The timeline never reads a clock itself; a driver feeds it timestamps.
//! - Realtime: wall-clock ticks at a fixed frame rate, slept with spin_sleep
//! - Offline: explicit stepping for faster-than-realtime, reproducible runs
//!
//! Timestamps are in milliseconds.

use crate::timeline::Timeline;
use spin_sleep::SpinSleeper;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Configuration for driving a timeline.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Ticks per second.
    pub fps: f64,
    /// Time dilation: logical milliseconds per wall millisecond (realtime only).
    pub rate: f64,
    /// Safety cap on the number of ticks a run may take.
    pub max_frames: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            rate: 1.0,
            max_frames: 1_000_000,
        }
    }
}

fn clamp_pos(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 {
        x
    } else {
        1.0
    }
}

/// True once the timeline will not react to further ticks.
pub fn is_finished(timeline: &Timeline) -> bool {
    timeline.is_stopped() || timeline.is_ended() || timeline.is_destroyed() || timeline.is_error()
}

/// Steps a timeline through logical time without sleeping.
pub struct OfflineRunner {
    timeline: Timeline,
    now: f64,
    frame_ms: f64,
    max_frames: usize,
}

impl OfflineRunner {
    /// Wrap `timeline`; nothing ticks until the runner is driven.
    pub fn new(timeline: Timeline, config: DriverConfig) -> Self {
        Self {
            timeline,
            now: 0.0,
            frame_ms: 1000.0 / clamp_pos(config.fps),
            max_frames: config.max_frames,
        }
    }

    /// Current offline timestamp.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// The driven timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Mutable access, e.g. to pause between steps.
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    /// Give the timeline back.
    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    /// Tick at `target`. Never moves backwards.
    pub fn advance_to(&mut self, target: f64) {
        if target.is_finite() && target > self.now {
            self.now = target;
        }
        self.timeline.update(self.now);
    }

    /// Step by milliseconds.
    pub fn step_ms(&mut self, dt: f64) {
        let s = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.advance_to(self.now + s);
    }

    /// Step by one frame.
    pub fn step_frame(&mut self) {
        self.step_ms(self.frame_ms);
    }

    /// Step by N frames.
    pub fn step_frames(&mut self, n: usize) {
        for _ in 0..n {
            self.step_frame();
        }
    }

    /// Tick frame by frame until the timeline finishes. Returns frames stepped.
    pub fn run_to_completion(&mut self) -> usize {
        self.advance_to(self.now);

        let mut frames = 0;
        while !is_finished(&self.timeline) {
            if frames >= self.max_frames {
                warn!(
                    frames,
                    now = self.now,
                    "offline run hit max_frames before the timeline finished"
                );
                break;
            }
            self.step_frame();
            frames += 1;
        }
        debug!(frames, now = self.now, "offline run complete");
        frames
    }
}

/// Ticks a timeline from the wall clock.
pub struct RealtimeRunner {
    timeline: Timeline,
    sleeper: SpinSleeper,
    frame: Duration,
    rate: f64,
    max_frames: usize,
}

impl RealtimeRunner {
    /// Wrap `timeline`; nothing ticks until the runner is driven.
    pub fn new(timeline: Timeline, config: DriverConfig) -> Self {
        Self {
            timeline,
            sleeper: SpinSleeper::default(),
            frame: Duration::from_secs_f64(1.0 / clamp_pos(config.fps)),
            rate: clamp_pos(config.rate),
            max_frames: config.max_frames,
        }
    }

    /// The driven timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Mutable access, e.g. to pause between steps.
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    /// Give the timeline back.
    pub fn into_timeline(self) -> Timeline {
        self.timeline
    }

    /// Run until the timeline finishes. Returns ticks taken.
    pub fn run_until_complete(&mut self) -> usize {
        self.run_until(is_finished)
    }

    /// Run until the given condition holds after a tick, or `max_frames`
    /// ticks have passed. Returns ticks taken.
    pub fn run_until<F>(&mut self, mut is_done: F) -> usize
    where
        F: FnMut(&Timeline) -> bool,
    {
        let origin = Instant::now();
        let mut frames = 0;
        loop {
            let now = origin.elapsed().as_secs_f64() * 1000.0 * self.rate;
            self.timeline.update(now);
            frames += 1;

            if is_done(&self.timeline) {
                break;
            }
            if frames >= self.max_frames {
                warn!(
                    frames,
                    now,
                    status = ?self.timeline.status(),
                    "realtime run hit max_frames before the timeline finished"
                );
                break;
            }

            self.sleeper.sleep(self.frame);
        }
        debug!(frames, "realtime run complete");
        frames
    }
}

/// Convenience function to drive a timeline offline.
pub fn launch_offline(timeline: Timeline) -> OfflineRunner {
    OfflineRunner::new(timeline, DriverConfig::default())
}

/// Convenience function to drive a timeline offline with config.
pub fn launch_offline_with_config(timeline: Timeline, config: DriverConfig) -> OfflineRunner {
    OfflineRunner::new(timeline, config)
}

/// Convenience function to drive a timeline in realtime.
pub fn launch_realtime(timeline: Timeline) -> RealtimeRunner {
    RealtimeRunner::new(timeline, DriverConfig::default())
}

/// Convenience function to drive a timeline in realtime with config.
pub fn launch_realtime_with_config(timeline: Timeline, config: DriverConfig) -> RealtimeRunner {
    RealtimeRunner::new(timeline, config)
}
