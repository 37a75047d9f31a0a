//! Task - adapts a runnable object onto a lifecycle
//!
//! A runnable implements any subset of the lifecycle capabilities; every
//! method defaults to a no-op. The task forwards each transition to the
//! runnable and commits the lifecycle state around it.

use crate::error::HookResult;
use crate::lifecycle::{LifeCycle, Status, Transition};
use std::cell::RefCell;
use std::rc::Rc;

/// Something a timeline can drive.
///
/// `update` receives the task's own active time (gaps excluded) and the
/// delta since the previous tick.
pub trait Runnable {
    fn start(&mut self) -> HookResult {
        Ok(())
    }

    fn pause(&mut self) -> HookResult {
        Ok(())
    }

    fn resume(&mut self) -> HookResult {
        Ok(())
    }

    fn stop(&mut self) -> HookResult {
        Ok(())
    }

    fn end(&mut self) -> HookResult {
        Ok(())
    }

    fn update(&mut self, _time: f64, _delta: f64) -> HookResult {
        Ok(())
    }

    fn destroy(&mut self) -> HookResult {
        Ok(())
    }
}

/// Shared runnables: the caller keeps a handle to inspect state between ticks.
impl<R: Runnable + ?Sized> Runnable for Rc<RefCell<R>> {
    fn start(&mut self) -> HookResult {
        self.borrow_mut().start()
    }

    fn pause(&mut self) -> HookResult {
        self.borrow_mut().pause()
    }

    fn resume(&mut self) -> HookResult {
        self.borrow_mut().resume()
    }

    fn stop(&mut self) -> HookResult {
        self.borrow_mut().stop()
    }

    fn end(&mut self) -> HookResult {
        self.borrow_mut().end()
    }

    fn update(&mut self, time: f64, delta: f64) -> HookResult {
        self.borrow_mut().update(time, delta)
    }

    fn destroy(&mut self) -> HookResult {
        self.borrow_mut().destroy()
    }
}

/// A runnable that only reacts to updates.
pub struct UpdateFn<F>(F);

impl<F> Runnable for UpdateFn<F>
where
    F: FnMut(f64, f64),
{
    fn update(&mut self, time: f64, delta: f64) -> HookResult {
        (self.0)(time, delta);
        Ok(())
    }
}

/// Wrap an update closure as a runnable.
pub fn from_update<F>(f: F) -> UpdateFn<F>
where
    F: FnMut(f64, f64),
{
    UpdateFn(f)
}

/// A runnable bound to a lifecycle.
pub struct Task {
    runnable: Box<dyn Runnable>,
    lifecycle: LifeCycle,
    auto_start: bool,
}

impl Task {
    /// Create a task that starts itself on its first update.
    pub fn new(runnable: impl Runnable + 'static) -> Self {
        Self::with_auto_start(runnable, true)
    }

    /// Create a task. With `auto_start` false, updates are ignored until
    /// `start` is called explicitly.
    pub fn with_auto_start(runnable: impl Runnable + 'static, auto_start: bool) -> Self {
        Self {
            runnable: Box::new(runnable),
            lifecycle: LifeCycle::new("task"),
            auto_start,
        }
    }

    /// Whether the first update starts the task.
    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    /// Change auto-start; only matters while the task is `Initial`.
    pub fn set_auto_start(&mut self, auto_start: bool) {
        self.auto_start = auto_start;
    }

    /// The task's lifecycle.
    pub fn lifecycle(&self) -> &LifeCycle {
        &self.lifecycle
    }

    /// Access to the lifecycle, mainly to register callbacks.
    pub fn lifecycle_mut(&mut self) -> &mut LifeCycle {
        &mut self.lifecycle
    }

    /// Current lifecycle status.
    pub fn status(&self) -> Status {
        self.lifecycle.status()
    }

    /// Call the runnable's `start`, then enter `Running`.
    pub fn start(&mut self) -> &mut Self {
        let runnable = &mut self.runnable;
        self.lifecycle.transition(Transition::Start, || runnable.start());
        self
    }

    /// Call the runnable's `pause`, then enter `Paused`.
    pub fn pause(&mut self) -> &mut Self {
        let runnable = &mut self.runnable;
        self.lifecycle.transition(Transition::Pause, || runnable.pause());
        self
    }

    /// Call the runnable's `resume`, then return to `Running`.
    pub fn resume(&mut self) -> &mut Self {
        let runnable = &mut self.runnable;
        self.lifecycle.transition(Transition::Resume, || runnable.resume());
        self
    }

    /// Call the runnable's `stop`, then enter `Stopped`.
    pub fn stop(&mut self) -> &mut Self {
        let runnable = &mut self.runnable;
        self.lifecycle.transition(Transition::Stop, || runnable.stop());
        self
    }

    /// Call the runnable's `end`, then enter `Ended`.
    pub fn end(&mut self) -> &mut Self {
        let runnable = &mut self.runnable;
        self.lifecycle.transition(Transition::End, || runnable.end());
        self
    }

    /// Call the runnable's `destroy`, then enter `Destroyed`.
    pub fn destroy(&mut self) -> &mut Self {
        let runnable = &mut self.runnable;
        self.lifecycle.transition(Transition::Destroy, || runnable.destroy());
        self
    }

    /// Advance the runnable to `time`, starting it first if needed.
    pub fn update(&mut self, time: f64, delta: f64) -> &mut Self {
        if !self.lifecycle.is_running() {
            if !self.lifecycle.is_initial() || !self.auto_start {
                return self;
            }
            self.start();
            if !self.lifecycle.is_running() {
                return self;
            }
        }
        let runnable = &mut self.runnable;
        self.lifecycle
            .transition(Transition::Update, || runnable.update(time, delta));
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
