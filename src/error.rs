//! Error types
//!
//! Integrator mistakes (bad breakpoints, bad durations) are reported through
//! these enums. Runtime failures inside tasks never surface here; they are
//! contained by the lifecycle and show up as the `Error` status instead.

use thiserror::Error;

/// A malformed breakpoint list or end-time change.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntervalError {
    #[error("breakpoint list is empty")]
    Empty,

    #[error("breakpoint {value} is not a finite, non-negative time")]
    InvalidBreakpoint { value: f64 },

    #[error("interval [{start}, {end}] does not move forward in time")]
    NonIncreasing { start: f64, end: f64 },

    #[error("interval starting at {start} overlaps the previous one ending at {previous_end}")]
    Overlapping { previous_end: f64, start: f64 },

    #[error("end time {end} must be greater than the last interval start {start}")]
    DegenerateEnd { start: f64, end: f64 },
}

/// Errors raised by timeline configuration calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    #[error(transparent)]
    InvalidInterval(#[from] IntervalError),

    #[error("duration {0} must be a finite, non-negative number")]
    InvalidDuration(f64),
}

/// Error type returned by lifecycle hooks and runnables.
pub type HookError = Box<dyn std::error::Error + 'static>;

/// Result of a single lifecycle hook.
pub type HookResult = Result<(), HookError>;
