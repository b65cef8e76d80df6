// Task-side contract: what the runner needs from a periodic task, plus
// ScheduledTask, the callback-wrapping implementation most embeddings
// use. Implement Task by hand instead when a task has to retune its own
// interval from inside a firing; fire() gets the whole &mut self.

use log::warn;

use crate::timer::{Rearm, WorkerId};

/// A periodic unit of work, as the runner sees it.
///
/// There is no one-shot variant: a fired task is always re-inserted
/// before the poll pass that fired it completes, and the only exit from
/// the cycle is dropping the owning runner.
pub trait Task {
    /// Run the work once, synchronously, to completion, then re-insert
    /// into `timers` at snapshot-now + current interval. A failed
    /// re-insert must be reported, never swallowed.
    fn fire(&mut self, timers: &mut dyn Rearm);

    /// Delay between successive firings. The runner uses this for the
    /// initial insertion at registration.
    fn interval_ms(&self) -> u32;

    /// Attach the substrate entry handle. Called once by the runner at
    /// registration; not part of the user-facing surface.
    fn bind(&mut self, worker: WorkerId);
}

/// Couples one zero-argument callback with a mutable interval.
///
/// The `F: FnMut()` bound is the callable-shape check: anything taking
/// arguments or returning a value is rejected at compile time. An
/// interval of 0 is legal and means "due on every poll pass".
pub struct ScheduledTask<F: FnMut()> {
    interval_ms: u32,
    callback: F,
    worker: Option<WorkerId>,
}

impl<F: FnMut()> ScheduledTask<F> {
    pub const fn new(interval_ms: u32, callback: F) -> Self {
        Self {
            interval_ms,
            callback,
            worker: None,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Replace the interval used for future re-arms. An entry already
    /// pending in the queue is not moved; the new value applies the
    /// next time the task fires and re-arms.
    pub fn set_interval_ms(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
    }
}

impl<F: FnMut()> Task for ScheduledTask<F> {
    fn fire(&mut self, timers: &mut dyn Rearm) {
        (self.callback)();

        // interval read after the callback, so a change made during
        // this firing is picked up by this re-arm
        match self.worker {
            Some(worker) => {
                if let Err(err) = timers.insert_due(worker, self.interval_ms) {
                    warn!("sched: re-arm failed, worker dropped: {err}");
                }
            }
            None => warn!("sched: fired unbound task, nothing to re-arm"),
        }
    }

    fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    fn bind(&mut self, worker: WorkerId) {
        self.worker = Some(worker);
    }
}
