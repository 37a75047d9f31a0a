//! Virtual clock
//!
//! Turns driver timestamps into timeline-elapsed time. Elapsed time is kept
//! as an anchor pair (timestamp, elapsed) so that speed changes and pauses
//! never make it jump.

/// Clamp to positive, finite value. Returns 1.0 for invalid inputs.
fn clamp_speed(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 {
        x
    } else {
        1.0
    }
}

#[derive(Clone, Debug)]
pub struct VirtualClock {
    speed: f64,
    /// Timestamp at which `anchor_elapsed` was valid.
    anchor_stamp: f64,
    anchor_elapsed: f64,
    last_update: Option<f64>,
    paused_at: Option<f64>,
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl VirtualClock {
    /// A clock that has not started yet. Invalid speeds fall back to 1.0.
    pub fn new(speed: f64) -> Self {
        Self {
            speed: clamp_speed(speed),
            anchor_stamp: 0.0,
            anchor_elapsed: 0.0,
            last_update: None,
            paused_at: None,
        }
    }

    /// Reset so that `now` is elapsed zero.
    pub fn start(&mut self, now: f64) {
        self.anchor_stamp = now;
        self.anchor_elapsed = 0.0;
        self.last_update = None;
        self.paused_at = None;
    }

    /// Current speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Change speed from the last tick on.
    pub fn set_speed(&mut self, speed: f64) {
        let s = clamp_speed(speed);
        let stamp = self.last_update.unwrap_or(self.anchor_stamp);
        self.anchor_elapsed = self.elapsed_at(stamp);
        self.anchor_stamp = stamp;
        self.speed = s;
    }

    /// Elapsed virtual time at `now`. Not clamped.
    pub fn elapsed_at(&self, now: f64) -> f64 {
        self.anchor_elapsed + (now - self.anchor_stamp) * self.speed
    }

    /// Timestamp of the last accepted tick.
    pub fn last_update(&self) -> Option<f64> {
        self.last_update
    }

    /// Record a tick and return its scaled delta, or `None` if `now` is
    /// earlier than the previous tick.
    pub fn tick(&mut self, now: f64) -> Option<f64> {
        let delta = match self.last_update {
            Some(last) if now < last => return None,
            Some(last) => (now - last) * self.speed,
            None => 0.0,
        };
        self.last_update = Some(now);
        Some(delta)
    }

    /// True between `pause` and `resume`.
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Remember when the pause began. A second pause keeps the first timestamp.
    pub fn pause(&mut self, now: f64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Shift the anchors forward by the time spent paused.
    pub fn resume(&mut self, now: f64) {
        let Some(paused_at) = self.paused_at.take() else {
            return;
        };
        let gap = (now - paused_at).max(0.0);
        self.anchor_stamp += gap;
        if let Some(last) = self.last_update.as_mut() {
            *last += gap;
        }
    }
}
