// TaskRunner: owns the task slots and the timer queue, drives poll
// passes.
//
// One pass snapshots the clock once, drains every entry due at or
// before the snapshot, and fires those tasks in due order (registration
// order for ties). A task re-armed for a time still inside the snapshot
// waits for the next pass, so a zero-interval task gets exactly one
// firing per pass and cannot starve the rest.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::info;

use crate::clock::Clock;
use crate::task::Task;
use crate::timer::{InsertError, TimerQueue, WorkerId};

// pacing between poll passes in run_forever
const POLL_PERIOD_MS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// A runner needs at least one task
    NoTasks,
    /// Timer queue rejected a registration, contains the rejected worker
    Full(WorkerId),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::NoTasks => write!(f, "runner needs at least one task"),
            BuildError::Full(worker) => {
                write!(f, "timer queue full, rejected worker {worker}")
            }
        }
    }
}

impl From<InsertError> for BuildError {
    fn from(err: InsertError) -> Self {
        match err {
            InsertError::Full(worker) => BuildError::Full(worker),
        }
    }
}

/// Drives a fixed set of tasks sharing one timer queue.
///
/// The runner exclusively owns its task slots for its whole lifetime;
/// there is no cancellation and no way to add tasks after construction.
/// Heterogeneous callback types live together behind `&mut dyn Task`
/// fat pointers, so nothing here allocates.
pub struct TaskRunner<'a, C: Clock, const N: usize> {
    timers: TimerQueue<C, N>,
    tasks: [&'a mut dyn Task; N],
}

impl<'a, C: Clock, const N: usize> TaskRunner<'a, C, N> {
    /// Register `tasks` into a fresh timer queue. Each task's first due
    /// time is construction time + its interval; array order fixes the
    /// dispatch order for entries that come due at the same instant.
    pub fn new(clock: C, mut tasks: [&'a mut dyn Task; N]) -> Result<Self, BuildError> {
        if N == 0 {
            return Err(BuildError::NoTasks);
        }
        let mut timers = TimerQueue::new(clock);
        for (index, task) in tasks.iter_mut().enumerate() {
            let worker = WorkerId::new(index);
            let every = task.interval_ms();
            task.bind(worker);
            timers.insert_due(worker, every)?;
            info!("sched: worker {worker} armed every {every} ms");
        }
        Ok(Self { timers, tasks })
    }

    /// One non-blocking poll pass: fire every task due right now, once
    /// each, and return how many fired. A no-op when nothing is due.
    pub fn poll(&mut self) -> usize {
        let due = self.timers.poll_due();
        for worker in due.iter() {
            self.tasks[worker.index()].fire(&mut self.timers);
        }
        due.len()
    }

    /// Poll until the end of time, yielding to `delay` between passes.
    /// Termination is external only: reset, power loss, watchdog.
    pub fn run_forever<D: DelayNs>(&mut self, delay: &mut D) -> ! {
        info!("sched: running {N} workers forever");
        loop {
            self.poll();
            delay.delay_ms(POLL_PERIOD_MS);
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::{Cell, RefCell};

    use super::*;
    use crate::task::ScheduledTask;

    struct TestClock<'a>(&'a Cell<u64>);

    impl Clock for TestClock<'_> {
        fn now_us(&self) -> u64 {
            self.0.get()
        }
    }

    #[test]
    fn zero_tasks_is_a_construction_error() {
        let time = Cell::new(0);
        let runner = TaskRunner::<_, 0>::new(TestClock(&time), []);
        assert_eq!(runner.err(), Some(BuildError::NoTasks));
    }

    #[test]
    fn nothing_due_is_a_no_op() {
        let time = Cell::new(0);
        let hits = Cell::new(0);
        let mut task = ScheduledTask::new(100, || hits.set(hits.get() + 1));
        let mut runner =
            TaskRunner::new(TestClock(&time), [&mut task as &mut dyn Task]).unwrap();

        assert_eq!(runner.poll(), 0);
        assert_eq!(runner.poll(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn zero_interval_fires_once_per_pass_while_slow_task_waits() {
        let time = Cell::new(0);
        let fast_hits = Cell::new(0);
        let slow_hits = Cell::new(0);
        let mut fast = ScheduledTask::new(0, || fast_hits.set(fast_hits.get() + 1));
        let mut slow = ScheduledTask::new(1_000, || slow_hits.set(slow_hits.get() + 1));
        let mut runner =
            TaskRunner::new(TestClock(&time), [&mut fast as &mut dyn Task, &mut slow])
                .unwrap();

        for pass in 1..=5 {
            assert_eq!(runner.poll(), 1);
            assert_eq!(fast_hits.get(), pass);
        }
        assert_eq!(slow_hits.get(), 0);
    }

    #[test]
    fn same_instant_tasks_fire_in_registration_order() {
        let time = Cell::new(0);
        let order = RefCell::new(Vec::new());
        let mut a = ScheduledTask::new(10, || order.borrow_mut().push('a'));
        let mut b = ScheduledTask::new(10, || order.borrow_mut().push('b'));
        let mut runner =
            TaskRunner::new(TestClock(&time), [&mut a as &mut dyn Task, &mut b]).unwrap();

        time.set(10_000);
        assert_eq!(runner.poll(), 2);
        time.set(20_000);
        assert_eq!(runner.poll(), 2);
        assert_eq!(*order.borrow(), ['a', 'b', 'a', 'b']);
    }

    #[test]
    fn task_fires_once_per_elapsed_interval() {
        let time = Cell::new(0);
        let hits = Cell::new(0u32);
        let mut task = ScheduledTask::new(20, || hits.set(hits.get() + 1));
        let mut runner =
            TaskRunner::new(TestClock(&time), [&mut task as &mut dyn Task]).unwrap();

        for pass in 1..=5u32 {
            time.set(u64::from(pass) * 20_000);
            assert_eq!(runner.poll(), 1);
        }
        assert_eq!(hits.get(), 5);
    }
}
