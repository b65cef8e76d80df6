// pacer: cooperative interval task scheduler for no_std targets.
// clock:  monotonic time-source contract (+ optional embassy-time binding)
// timer:  fixed-capacity due-time queue shared by all tasks
// task:   ScheduledTask wrapper and the runner-facing Task contract
// runner: TaskRunner poll-pass driver and forever loop
//
// Single core, no preemption, no allocation. Tasks are registered once
// at runner construction and fire forever at their own intervals; each
// firing re-arms the task at now + interval.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod runner;
pub mod task;
pub mod timer;

pub use clock::Clock;
#[cfg(feature = "embassy-time")]
pub use clock::EmbassyClock;
pub use runner::{BuildError, TaskRunner};
pub use task::{ScheduledTask, Task};
pub use timer::{DueSet, InsertError, Rearm, TimerQueue, WorkerId};
