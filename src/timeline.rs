//! Timeline - one virtual clock driving many interval-bound tasks
//!
//! Tasks are added with a breakpoint list describing when they are active.
//! Each call to [`Timeline::update`] converts the driver timestamp into
//! elapsed timeline time and reconciles every task against its interval:
//! starting, resuming, pausing and stopping it as needed, in insertion order.
//!
//! While no duration has been pinned, the duration is the furthest declared
//! end among all tasks, and open-ended tasks (odd breakpoint lists) are
//! stretched to it whenever it grows.

use crate::clock::VirtualClock;
use crate::error::{IntervalError, TimelineError};
use crate::interval::Interval;
use crate::lifecycle::{LifeCycle, Status, Transition};
use crate::task::{Runnable, Task};
use std::fmt;
use tracing::{debug, trace, warn};

/// Handle to a task registered on a timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(usize);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Configuration for a new timeline.
#[derive(Clone, Debug)]
pub struct TimelineConfig {
    /// Pinned duration. `None` infers it from the added tasks.
    pub duration: Option<f64>,
    pub speed: f64,
    pub auto_start: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            duration: None,
            speed: 1.0,
            auto_start: true,
        }
    }
}

struct Entry {
    task: Task,
    interval: Interval,
    /// Paused by `Timeline::pause`, to be resumed by `Timeline::resume`.
    held: bool,
}

/// Progress observer, called with a percentage after every tick.
pub type ProgressCallback = Box<dyn FnMut(f64)>;

pub struct Timeline {
    lifecycle: LifeCycle,
    clock: VirtualClock,
    duration: f64,
    duration_explicit: bool,
    auto_start: bool,
    elapsed: f64,
    entries: Vec<Entry>,
    on_progress: Option<ProgressCallback>,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    /// An empty timeline: speed 1, auto-start, duration inferred from tasks.
    pub fn new() -> Self {
        Self {
            lifecycle: LifeCycle::new("timeline"),
            clock: VirtualClock::default(),
            duration: 0.0,
            duration_explicit: false,
            auto_start: true,
            elapsed: 0.0,
            entries: Vec::new(),
            on_progress: None,
        }
    }

    /// Build from `config`. Fails if the pinned duration is invalid.
    pub fn with_config(config: TimelineConfig) -> Result<Self, TimelineError> {
        let mut timeline = Self::new();
        timeline.clock = VirtualClock::new(config.speed);
        timeline.auto_start = config.auto_start;
        if let Some(duration) = config.duration {
            timeline.set_duration(duration)?;
        }
        Ok(timeline)
    }

    // --- Configuration ---

    /// Current duration in timeline milliseconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// True once `set_duration` pinned the duration.
    pub fn is_duration_explicit(&self) -> bool {
        self.duration_explicit
    }

    /// Pin the duration. Open-ended tasks are stretched or cut to it.
    ///
    /// Shrinking below the progress of running tasks is allowed; they are
    /// stopped on the next tick.
    pub fn set_duration(&mut self, value: f64) -> Result<&mut Self, TimelineError> {
        if !value.is_finite() || value < 0.0 {
            return Err(TimelineError::InvalidDuration(value));
        }
        self.duration_explicit = true;
        self.apply_duration(value);
        Ok(self)
    }

    /// Speed multiplier.
    pub fn speed(&self) -> f64 {
        self.clock.speed()
    }

    /// Scale elapsed time and deltas. Takes effect from the last tick.
    pub fn set_speed(&mut self, speed: f64) -> &mut Self {
        self.clock.set_speed(speed);
        self
    }

    /// Whether the first `update` starts the timeline.
    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    /// Change auto-start; only matters while the timeline is `Initial`.
    pub fn set_auto_start(&mut self, auto_start: bool) -> &mut Self {
        self.auto_start = auto_start;
        self
    }

    // --- Tasks ---

    /// Register a runnable, active during `breakpoints`.
    pub fn add(
        &mut self,
        runnable: impl Runnable + 'static,
        breakpoints: &[f64],
    ) -> Result<TaskId, TimelineError> {
        self.add_task(Task::new(runnable), breakpoints)
    }

    /// Register a prepared task, active during `breakpoints`.
    pub fn add_task(&mut self, mut task: Task, breakpoints: &[f64]) -> Result<TaskId, TimelineError> {
        let Some(&last) = breakpoints.last() else {
            return Err(IntervalError::Empty.into());
        };

        // Validate against the duration this add would produce before
        // touching any existing interval.
        let duration = if !self.duration_explicit && last > self.duration {
            last
        } else {
            self.duration
        };
        let interval = Interval::new(breakpoints, duration)?;
        if duration != self.duration {
            debug!(from = self.duration, to = duration, "duration grows");
            self.apply_duration(duration);
        }

        let id = TaskId(self.entries.len());
        task.lifecycle_mut().set_label(id.to_string());
        self.entries.push(Entry {
            task,
            interval,
            held: false,
        });
        debug!(task = %id, ?breakpoints, "task added");
        Ok(id)
    }

    /// Look up a task.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.entries.get(id.0).map(|e| &e.task)
    }

    /// Look up a task mutably.
    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.entries.get_mut(id.0).map(|e| &mut e.task)
    }

    /// The interval a task was registered with.
    pub fn interval(&self, id: TaskId) -> Option<&Interval> {
        self.entries.get(id.0).map(|e| &e.interval)
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no task was added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn apply_duration(&mut self, value: f64) {
        self.duration = value;
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if let Err(err) = entry.interval.set_end_time(value) {
                warn!(
                    task = %TaskId(index),
                    error = %err,
                    "open-ended interval left as is; timeline stop truncates it"
                );
            }
        }
    }

    // --- Time ---

    /// Elapsed timeline time as of the last tick, within `[0, duration]`.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Elapsed timeline time the clock would report at `now`.
    pub fn elapsed_at(&self, now: f64) -> f64 {
        self.clock.elapsed_at(now).clamp(0.0, self.duration)
    }

    /// Progress in percent, as of the last tick.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            100.0 * self.elapsed / self.duration
        } else {
            100.0
        }
    }

    /// Advance the timeline to the driver timestamp `now`.
    ///
    /// A timestamp earlier than the previous tick is dropped.
    pub fn update(&mut self, now: f64) -> &mut Self {
        if !now.is_finite() {
            warn!(now, "non-finite timestamp, dropped");
            return self;
        }
        if !self.lifecycle.is_running() {
            if !self.lifecycle.is_initial() || !self.auto_start {
                return self;
            }
            self.start(now);
            if !self.lifecycle.is_running() {
                return self;
            }
        }

        let Some(delta) = self.clock.tick(now) else {
            warn!(
                now,
                last = ?self.clock.last_update(),
                "timestamp earlier than previous tick, dropped"
            );
            return self;
        };

        let raw = self.clock.elapsed_at(now);
        let finished = raw >= self.duration;
        let elapsed = raw.clamp(0.0, self.duration);
        self.elapsed = elapsed;
        trace!(now, elapsed, delta, "tick");

        let entries = &mut self.entries;
        self.lifecycle.transition(Transition::Update, || {
            dispatch(entries, elapsed, delta);
            Ok(())
        });

        if finished {
            self.stop();
        }
        self.report_progress();
        self
    }

    fn report_progress(&mut self) {
        let progress = self.progress();
        if let Some(cb) = self.on_progress.as_mut() {
            cb(progress);
        }
    }

    // --- Lifecycle ---

    /// The timeline's own lifecycle.
    pub fn lifecycle(&self) -> &LifeCycle {
        &self.lifecycle
    }

    /// Status of the timeline itself.
    pub fn status(&self) -> Status {
        self.lifecycle.status()
    }

    /// Start the clock at `now`.
    pub fn start(&mut self, now: f64) -> &mut Self {
        let clock = &mut self.clock;
        let elapsed = &mut self.elapsed;
        self.lifecycle.transition(Transition::Start, || {
            clock.start(now);
            *elapsed = 0.0;
            Ok(())
        });
        self
    }

    /// Freeze the clock at `now` and pause every running task.
    pub fn pause(&mut self, now: f64) -> &mut Self {
        let clock = &mut self.clock;
        let entries = &mut self.entries;
        self.lifecycle.transition(Transition::Pause, || {
            clock.pause(now);
            for entry in entries.iter_mut().filter(|e| e.task.is_running()) {
                entry.task.pause();
                entry.held = entry.task.is_paused();
            }
            Ok(())
        });
        self
    }

    /// Continue from where `pause` left off, resuming the tasks it paused.
    pub fn resume(&mut self, now: f64) -> &mut Self {
        let clock = &mut self.clock;
        let entries = &mut self.entries;
        self.lifecycle.transition(Transition::Resume, || {
            clock.resume(now);
            for entry in entries.iter_mut().filter(|e| e.held) {
                entry.held = false;
                if entry.task.is_paused() {
                    entry.task.resume();
                }
            }
            Ok(())
        });
        self
    }

    /// Stop the timeline, truncating every task still running or paused.
    pub fn stop(&mut self) -> &mut Self {
        let entries = &mut self.entries;
        self.lifecycle.transition(Transition::Stop, || {
            stop_active(entries);
            Ok(())
        });
        self
    }

    /// Jump to the end: flush every task to its final value, then end them.
    pub fn end(&mut self) -> &mut Self {
        let entries = &mut self.entries;
        let elapsed = &mut self.elapsed;
        let duration = self.duration;
        let ended = self.lifecycle.transition(Transition::End, || {
            *elapsed = duration;
            dispatch(entries, duration, 0.0);
            stop_active(entries);
            for entry in entries.iter_mut() {
                entry.task.end();
            }
            Ok(())
        });
        if ended {
            self.report_progress();
        }
        self
    }

    /// Destroy every task, then the timeline itself.
    pub fn destroy(&mut self) -> &mut Self {
        let entries = &mut self.entries;
        self.lifecycle.transition(Transition::Destroy, || {
            for entry in entries.iter_mut() {
                entry.task.destroy();
            }
            Ok(())
        });
        self
    }

    /// Callback when the timeline starts.
    pub fn on_start(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.lifecycle.on_start(callback);
        self
    }

    /// Callback when the timeline pauses.
    pub fn on_pause(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.lifecycle.on_pause(callback);
        self
    }

    /// Callback when the timeline resumes.
    pub fn on_resume(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.lifecycle.on_resume(callback);
        self
    }

    /// Callback when the timeline stops, including on reaching its duration.
    pub fn on_stop(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.lifecycle.on_stop(callback);
        self
    }

    /// Callback when the timeline ends.
    pub fn on_end(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.lifecycle.on_end(callback);
        self
    }

    /// Callback after each dispatch.
    pub fn on_update(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.lifecycle.on_update(callback);
        self
    }

    /// Callback when the timeline is destroyed.
    pub fn on_destroy(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.lifecycle.on_destroy(callback);
        self
    }

    /// Observe progress in percent after every tick and on `end`.
    pub fn on_progress(&mut self, callback: impl FnMut(f64) + 'static) -> &mut Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// True in `Initial`.
    pub fn is_initial(&self) -> bool {
        self.lifecycle.is_initial()
    }

    /// True in `Running`.
    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    /// True in `Paused`.
    pub fn is_paused(&self) -> bool {
        self.lifecycle.is_paused()
    }

    /// True in `Stopped`.
    pub fn is_stopped(&self) -> bool {
        self.lifecycle.is_stopped()
    }

    /// True in `Ended`.
    pub fn is_ended(&self) -> bool {
        self.lifecycle.is_ended()
    }

    /// True in `Destroyed`.
    pub fn is_destroyed(&self) -> bool {
        self.lifecycle.is_destroyed()
    }

    /// True in `Error`.
    pub fn is_error(&self) -> bool {
        self.lifecycle.is_error()
    }
}

/// Reconcile every task against `elapsed`, in insertion order.
fn dispatch(entries: &mut [Entry], elapsed: f64, delta: f64) {
    for Entry { task, interval, .. } in entries.iter_mut() {
        let mut updated = false;

        if interval.includes(elapsed) {
            if task.is_paused() {
                task.resume();
            }
            task.update(interval.active_time(elapsed), delta);
            updated = true;
        }

        if interval.is_over(elapsed) && !task.is_stopped() {
            if !updated {
                // A paused task would swallow its terminal value.
                if task.is_paused() {
                    task.resume();
                }
                task.update(interval.end_time(), delta);
            }
            task.stop();
        } else if let Some(gap_start) = interval.pause_point(elapsed) {
            if task.is_running() {
                if !updated {
                    task.update(gap_start, delta);
                }
                task.pause();
            }
        }
    }
}

fn stop_active(entries: &mut [Entry]) {
    for entry in entries.iter_mut() {
        if entry.task.is_running() || entry.task.is_paused() {
            entry.task.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HookResult;
    use crate::task::from_update;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn noop() -> impl Runnable {
        from_update(|_, _| {})
    }

    #[test]
    fn test_duration_inferred_from_tasks() {
        let mut tl = Timeline::new();
        tl.add(noop(), &[0.0, 100.0]).unwrap();
        assert_eq!(tl.duration(), 100.0);
        tl.add(noop(), &[50.0, 400.0]).unwrap();
        assert_eq!(tl.duration(), 400.0);
        tl.add(noop(), &[10.0, 20.0]).unwrap();
        assert_eq!(tl.duration(), 400.0);
        assert!(!tl.is_duration_explicit());
    }

    #[test]
    fn test_open_ended_interval_widens_with_duration() {
        let mut tl = Timeline::new();
        tl.add(noop(), &[0.0, 200.0]).unwrap();
        let open = tl.add(noop(), &[100.0]).unwrap();
        assert_eq!(tl.interval(open).unwrap().end_time(), 200.0);

        tl.add(noop(), &[300.0, 700.0]).unwrap();
        assert_eq!(tl.duration(), 700.0);
        assert_eq!(tl.interval(open).unwrap().end_time(), 700.0);
    }

    #[test]
    fn test_open_ended_task_needs_room() {
        let mut tl = Timeline::new();
        let err = tl.add(noop(), &[100.0]).unwrap_err();
        assert!(matches!(
            err,
            TimelineError::InvalidInterval(IntervalError::NonIncreasing { .. })
        ));
        assert!(tl.is_empty());
        assert_eq!(tl.duration(), 0.0);

        tl.set_duration(300.0).unwrap();
        let id = tl.add(noop(), &[100.0]).unwrap();
        assert_eq!(tl.interval(id).unwrap().end_time(), 300.0);
    }

    #[test]
    fn test_rejected_add_leaves_duration_alone() {
        let mut tl = Timeline::new();
        tl.add(noop(), &[0.0, 100.0]).unwrap();
        assert!(tl.add(noop(), &[0.0, 300.0, 200.0, 400.0]).is_err());
        assert_eq!(tl.duration(), 100.0);
        assert_eq!(tl.len(), 1);
    }

    #[test]
    fn test_set_duration_pins_and_updates_open_intervals() {
        let mut tl = Timeline::new();
        tl.add(noop(), &[0.0, 100.0]).unwrap();
        let open = tl.add(noop(), &[50.0]).unwrap();
        let closed = tl.add(noop(), &[0.0, 80.0]).unwrap();

        tl.set_duration(1000.0).unwrap();
        assert!(tl.is_duration_explicit());
        assert_eq!(tl.interval(open).unwrap().end_time(), 1000.0);
        assert_eq!(tl.interval(closed).unwrap().end_time(), 80.0);

        // Pinned: later adds no longer move it
        tl.add(noop(), &[0.0, 5000.0]).unwrap();
        assert_eq!(tl.duration(), 1000.0);

        assert_eq!(
            tl.set_duration(-1.0).err(),
            Some(TimelineError::InvalidDuration(-1.0))
        );
    }

    #[test]
    fn test_set_duration_truncates_running_task() {
        let updates = Rc::new(RefCell::new(Vec::new()));
        let u = updates.clone();
        let mut tl = Timeline::new();
        let id = tl
            .add(from_update(move |t, _| u.borrow_mut().push(t)), &[0.0, 500.0])
            .unwrap();

        tl.update(0.0).update(300.0);
        tl.set_duration(200.0).unwrap();
        tl.update(310.0);

        assert!(tl.is_stopped());
        assert!(tl.task(id).unwrap().is_stopped());
        assert_eq!(*updates.borrow(), vec![0.0, 300.0, 200.0]);
    }

    #[test]
    fn test_degenerate_shrink_is_tolerated() {
        let mut tl = Timeline::new();
        tl.add(noop(), &[0.0, 500.0]).unwrap();
        let open = tl.add(noop(), &[300.0]).unwrap();

        tl.set_duration(200.0).unwrap();
        assert_eq!(tl.duration(), 200.0);
        assert_eq!(tl.interval(open).unwrap().end_time(), 500.0);

        tl.update(0.0).update(250.0);
        assert!(tl.is_stopped());
        // Never reached its window, so never started
        assert!(tl.task(open).unwrap().is_initial());
    }

    #[test]
    fn test_repeated_timestamp_does_not_advance() {
        let updates = Rc::new(RefCell::new(Vec::new()));
        let u = updates.clone();
        let mut tl = Timeline::new();
        tl.add(from_update(move |t, dt| u.borrow_mut().push((t, dt))), &[0.0, 500.0])
            .unwrap();

        tl.update(1000.0).update(1250.0).update(1250.0);

        assert_eq!(tl.elapsed(), 250.0);
        assert_eq!(
            *updates.borrow(),
            vec![(0.0, 0.0), (250.0, 250.0), (250.0, 0.0)]
        );
    }

    #[test]
    fn test_backwards_timestamp_is_dropped() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let mut tl = Timeline::new();
        tl.add(from_update(move |_, _| c.set(c.get() + 1)), &[0.0, 500.0])
            .unwrap();

        tl.update(100.0).update(200.0).update(150.0);

        assert_eq!(count.get(), 2);
        assert_eq!(tl.elapsed(), 100.0);
        assert!(tl.is_running());
    }

    #[test]
    fn test_pause_resume_keeps_elapsed() {
        let mut tl = Timeline::new();
        let id = tl.add(noop(), &[0.0, 1000.0]).unwrap();

        tl.update(0.0).update(300.0);
        let before = tl.elapsed_at(300.0);

        tl.pause(300.0);
        assert!(tl.is_paused());
        assert!(tl.task(id).unwrap().is_paused());

        // Ticks while paused are ignored
        tl.update(600.0);
        assert_eq!(tl.elapsed(), 300.0);

        tl.resume(5000.0);
        assert!((tl.elapsed_at(5000.0) - before).abs() < 1e-10);
        assert!(tl.task(id).unwrap().is_running());

        tl.update(5100.0);
        assert!(tl.task(id).unwrap().is_running());
        assert!((tl.elapsed() - 400.0).abs() < 1e-10);
    }

    #[test]
    fn test_speed_scales_elapsed() {
        let updates = Rc::new(RefCell::new(Vec::new()));
        let u = updates.clone();
        let mut tl = Timeline::with_config(TimelineConfig {
            speed: 2.0,
            ..Default::default()
        })
        .unwrap();
        tl.add(from_update(move |t, dt| u.borrow_mut().push((t, dt))), &[0.0, 1000.0])
            .unwrap();

        tl.update(0.0).update(100.0);
        tl.set_speed(1.0);
        tl.update(200.0);

        assert_eq!(
            *updates.borrow(),
            vec![(0.0, 0.0), (200.0, 200.0), (300.0, 100.0)]
        );
    }

    #[test]
    fn test_no_auto_start() {
        let mut tl = Timeline::with_config(TimelineConfig {
            auto_start: false,
            ..Default::default()
        })
        .unwrap();
        let id = tl.add(noop(), &[0.0, 100.0]).unwrap();

        tl.update(50.0);
        assert!(tl.is_initial());
        assert!(tl.task(id).unwrap().is_initial());

        tl.start(50.0).update(100.0);
        assert!(tl.task(id).unwrap().is_running());
        assert_eq!(tl.elapsed(), 50.0);
    }

    #[test]
    fn test_progress_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let mut tl = Timeline::new();
        tl.add(noop(), &[0.0, 200.0]).unwrap();
        tl.on_progress(move |p| s.borrow_mut().push(p));

        tl.update(0.0).update(50.0).update(100.0).update(400.0);

        assert_eq!(*seen.borrow(), vec![0.0, 25.0, 50.0, 100.0]);
        assert!(tl.is_stopped());
    }

    #[test]
    fn test_broken_task_does_not_stop_siblings() {
        struct Broken;
        impl Runnable for Broken {
            fn update(&mut self, _time: f64, _delta: f64) -> HookResult {
                Err("renderer lost".into())
            }
        }

        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let mut tl = Timeline::new();
        let broken = tl.add(Broken, &[0.0, 300.0]).unwrap();
        let healthy = tl
            .add(from_update(move |_, _| c.set(c.get() + 1)), &[0.0, 300.0])
            .unwrap();

        tl.update(0.0).update(100.0).update(300.0);

        assert!(tl.task(broken).unwrap().is_error());
        assert!(tl.task(healthy).unwrap().is_stopped());
        assert_eq!(count.get(), 3);
        assert!(tl.is_stopped());
        assert!(!tl.is_error());
    }

    #[test]
    fn test_panicking_task_is_contained() {
        let mut tl = Timeline::new();
        let id = tl
            .add(from_update(|t, _| assert!(t < 50.0, "overshoot")), &[0.0, 100.0])
            .unwrap();

        tl.update(0.0).update(60.0).update(100.0);

        assert!(tl.task(id).unwrap().is_error());
        assert!(tl.is_stopped());
    }

    #[test]
    fn test_stop_truncates_active_tasks() {
        let mut tl = Timeline::new();
        let running = tl.add(noop(), &[0.0, 400.0]).unwrap();
        let paused = tl.add(noop(), &[0.0, 50.0, 300.0, 400.0]).unwrap();
        let waiting = tl.add(noop(), &[350.0, 400.0]).unwrap();

        tl.update(0.0).update(100.0);
        assert!(tl.task(paused).unwrap().is_paused());

        tl.stop();
        assert!(tl.task(running).unwrap().is_stopped());
        assert!(tl.task(paused).unwrap().is_stopped());
        assert!(tl.task(waiting).unwrap().is_initial());

        // A stopped timeline ignores ticks
        tl.update(200.0);
        assert_eq!(tl.elapsed(), 100.0);
    }

    #[test]
    fn test_resume_only_releases_tasks_held_by_pause() {
        let mut tl = Timeline::new();
        let running = tl.add(noop(), &[0.0, 400.0]).unwrap();
        let gapped = tl.add(noop(), &[0.0, 50.0, 300.0, 400.0]).unwrap();

        tl.update(0.0).update(100.0);
        assert!(tl.task(gapped).unwrap().is_paused());

        tl.pause(100.0).resume(100.0);
        assert!(tl.task(running).unwrap().is_running());
        assert!(tl.task(gapped).unwrap().is_paused());
    }

    #[test]
    fn test_end_flushes_tasks() {
        let updates = Rc::new(RefCell::new(Vec::new()));
        let u = updates.clone();
        let ended = Rc::new(Cell::new(false));
        let e = ended.clone();

        let mut tl = Timeline::new();
        let id = tl
            .add(from_update(move |t, _| u.borrow_mut().push(t)), &[0.0, 100.0, 200.0, 300.0])
            .unwrap();
        tl.on_end(move || e.set(true));

        tl.update(0.0).update(50.0).end();

        assert!(tl.is_ended());
        assert!(ended.get());
        assert_eq!(tl.progress(), 100.0);
        assert!(tl.task(id).unwrap().is_ended());
        assert_eq!(*updates.borrow(), vec![0.0, 50.0, 200.0]);
    }

    #[test]
    fn test_destroy_cascades() {
        let mut tl = Timeline::new();
        let a = tl.add(noop(), &[0.0, 100.0]).unwrap();
        let b = tl.add(noop(), &[50.0, 100.0]).unwrap();

        tl.update(0.0).destroy();

        assert!(tl.is_destroyed());
        assert!(tl.task(a).unwrap().is_destroyed());
        assert!(tl.task(b).unwrap().is_destroyed());
    }

    #[test]
    fn test_lifecycle_callbacks() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut tl = Timeline::new();
        tl.add(noop(), &[0.0, 100.0]).unwrap();

        let l = log.clone();
        tl.on_start(move || l.borrow_mut().push("start"));
        let l = log.clone();
        tl.on_pause(move || l.borrow_mut().push("pause"));
        let l = log.clone();
        tl.on_resume(move || l.borrow_mut().push("resume"));
        let l = log.clone();
        tl.on_stop(move || l.borrow_mut().push("stop"));

        tl.update(0.0).pause(10.0).resume(20.0).update(200.0);

        assert_eq!(*log.borrow(), vec!["start", "pause", "resume", "stop"]);
    }

    #[test]
    fn test_empty_timeline_stops_immediately() {
        let mut tl = Timeline::new();
        tl.update(42.0);
        assert!(tl.is_stopped());
        assert_eq!(tl.progress(), 100.0);
    }
}
