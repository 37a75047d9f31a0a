//! LifeCycle - the state machine shared by tasks and timelines
//!
//! Every transition runs the owner's hook, then the user callback registered
//! for it, then commits the new status. A hook that returns `Err` or panics,
//! or a callback that panics, leaves the entity in `Error` instead; the
//! failure is logged and the call returns normally so that one broken task
//! cannot stall the shared clock.

use crate::error::HookResult;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Initial,
    Running,
    Paused,
    Stopped,
    Ended,
    Destroyed,
    Error,
}

/// A lifecycle transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    Start,
    Pause,
    Resume,
    Stop,
    End,
    Update,
    Destroy,
}

impl Transition {
    /// Whether this transition may be taken from `status`.
    pub fn permitted_from(self, status: Status) -> bool {
        use Status::*;
        match self {
            Transition::Start => status == Initial,
            Transition::Pause => status == Running,
            Transition::Resume => status == Paused,
            Transition::Stop => matches!(status, Initial | Running | Paused | Ended),
            Transition::End => matches!(status, Initial | Running | Paused | Stopped),
            Transition::Update => !matches!(status, Destroyed | Error),
            Transition::Destroy => status != Destroyed,
        }
    }

    /// Status committed after a successful transition. `None` for `Update`.
    pub fn target(self) -> Option<Status> {
        match self {
            Transition::Start | Transition::Resume => Some(Status::Running),
            Transition::Pause => Some(Status::Paused),
            Transition::Stop => Some(Status::Stopped),
            Transition::End => Some(Status::Ended),
            Transition::Destroy => Some(Status::Destroyed),
            Transition::Update => None,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transition::Start => "start",
            Transition::Pause => "pause",
            Transition::Resume => "resume",
            Transition::Stop => "stop",
            Transition::End => "end",
            Transition::Update => "update",
            Transition::Destroy => "destroy",
        };
        f.write_str(name)
    }
}

/// Observer invoked after a transition's hook succeeds.
pub type Callback = Box<dyn FnMut()>;

/// Status plus per-transition callbacks.
pub struct LifeCycle {
    label: String,
    status: Status,
    callbacks: HashMap<Transition, Callback>,
}

impl Default for LifeCycle {
    fn default() -> Self {
        Self::new("lifecycle")
    }
}

impl fmt::Debug for LifeCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifeCycle")
            .field("label", &self.label)
            .field("status", &self.status)
            .finish()
    }
}

impl LifeCycle {
    /// Create a lifecycle in `Initial`. The label only appears in diagnostics.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: Status::Initial,
            callbacks: HashMap::new(),
        }
    }

    /// Name used in log lines.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Rename for diagnostics.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Run `transition` with the owner's `hook`.
    ///
    /// Returns true if the transition completed. A transition that is not
    /// permitted from the current status is skipped without running anything.
    pub fn transition<F>(&mut self, transition: Transition, hook: F) -> bool
    where
        F: FnOnce() -> HookResult,
    {
        if !transition.permitted_from(self.status) {
            debug!(
                lifecycle = %self.label,
                %transition,
                status = ?self.status,
                "transition not permitted, skipped"
            );
            return false;
        }

        let callback = self.callbacks.get_mut(&transition);
        let outcome = panic::catch_unwind(AssertUnwindSafe(move || -> HookResult {
            hook()?;
            if let Some(cb) = callback {
                cb();
            }
            Ok(())
        }));

        let failure = match outcome {
            Ok(Ok(())) => {
                if let Some(next) = transition.target() {
                    self.status = next;
                }
                return true;
            }
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        error!(
            lifecycle = %self.label,
            %transition,
            error = %failure,
            "broken on {}",
            transition
        );
        self.status = Status::Error;
        false
    }

    /// Register the callback for `transition`, replacing any previous one.
    pub fn on(&mut self, transition: Transition, callback: impl FnMut() + 'static) -> &mut Self {
        self.callbacks.insert(transition, Box::new(callback));
        self
    }

    /// `Initial` to `Running`.
    pub fn start(&mut self) -> &mut Self {
        self.transition(Transition::Start, || Ok(()));
        self
    }

    /// `Running` to `Paused`.
    pub fn pause(&mut self) -> &mut Self {
        self.transition(Transition::Pause, || Ok(()));
        self
    }

    /// `Paused` to `Running`.
    pub fn resume(&mut self) -> &mut Self {
        self.transition(Transition::Resume, || Ok(()));
        self
    }

    /// Into `Stopped`, from any state but `Stopped`, `Destroyed` and `Error`.
    pub fn stop(&mut self) -> &mut Self {
        self.transition(Transition::Stop, || Ok(()));
        self
    }

    /// Into `Ended`.
    pub fn end(&mut self) -> &mut Self {
        self.transition(Transition::End, || Ok(()));
        self
    }

    /// Fire the update callback without changing status.
    pub fn update(&mut self) -> &mut Self {
        self.transition(Transition::Update, || Ok(()));
        self
    }

    /// Into `Destroyed`, from anywhere.
    pub fn destroy(&mut self) -> &mut Self {
        self.transition(Transition::Destroy, || Ok(()));
        self
    }

    /// Callback after a successful `start`.
    pub fn on_start(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on(Transition::Start, callback)
    }

    /// Callback after a successful `pause`.
    pub fn on_pause(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on(Transition::Pause, callback)
    }

    /// Callback after a successful `resume`.
    pub fn on_resume(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on(Transition::Resume, callback)
    }

    /// Callback after a successful `stop`.
    pub fn on_stop(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on(Transition::Stop, callback)
    }

    /// Callback after a successful `end`.
    pub fn on_end(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on(Transition::End, callback)
    }

    /// Callback after every successful `update`.
    pub fn on_update(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on(Transition::Update, callback)
    }

    /// Callback after a successful `destroy`.
    pub fn on_destroy(&mut self, callback: impl FnMut() + 'static) -> &mut Self {
        self.on(Transition::Destroy, callback)
    }

    /// True in `Initial`.
    pub fn is_initial(&self) -> bool {
        self.status == Status::Initial
    }

    /// True in `Running`.
    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    /// True in `Paused`.
    pub fn is_paused(&self) -> bool {
        self.status == Status::Paused
    }

    /// True in `Stopped`.
    pub fn is_stopped(&self) -> bool {
        self.status == Status::Stopped
    }

    /// True in `Ended`.
    pub fn is_ended(&self) -> bool {
        self.status == Status::Ended
    }

    /// True in `Destroyed`.
    pub fn is_destroyed(&self) -> bool {
        self.status == Status::Destroyed
    }

    /// True in `Error`.
    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
