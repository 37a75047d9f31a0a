//! Rust Timeline Library
//!
//! A deterministic single-clock timeline scheduler with:
//! - Interval algebra (active windows, gaps, task-local active time)
//! - A lifecycle state machine with contained hook failures
//! - Per-tick dispatch that starts, pauses, resumes and stops tasks from a timestamp
//! - Realtime (spin_sleep) and offline (stepping API) drivers

pub mod error;
pub mod interval;
pub mod lifecycle;
pub mod task;
pub mod clock;
pub mod timeline;
pub mod driver;


pub use error::{HookError, HookResult, IntervalError, TimelineError};
pub use interval::Interval;
pub use lifecycle::{LifeCycle, Status, Transition};
pub use task::{from_update, Runnable, Task, UpdateFn};
pub use timeline::{TaskId, Timeline, TimelineConfig};
pub use driver::{
    launch_offline, launch_offline_with_config, launch_realtime, launch_realtime_with_config,
    DriverConfig, OfflineRunner, RealtimeRunner,
};
