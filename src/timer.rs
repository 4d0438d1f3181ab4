use std::{
    fmt,
    mem,
    time::{Duration, Instant},
};

#[cfg(test)]
use std::{cell::Cell, rc::Rc};

/// A source of time for scheduled work.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// A clock backed by [Instant::now].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves forward when told to.
///
/// Clones share the same underlying instant.
#[cfg(test)]
#[derive(Clone, Debug)]
pub(crate) struct ManualClock {
    now: Rc<Cell<Instant>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self { now: Rc::new(Cell::new(Instant::now())) }
    }

    pub(crate) fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    pub(crate) fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Identifies a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

#[derive(Debug)]
struct Scheduled<T> {
    handle: TimerHandle,
    deadline: Instant,
    task: T,
}

/// Tracks delayed tasks so they can be fired once due or cancelled all at once.
///
/// Nothing runs on its own: the owner calls [TimerRegistry::take_due] from its event loop and
/// gets back the tasks whose deadline has passed, ordered by deadline.
#[derive(Debug)]
pub struct TimerRegistry<T> {
    pending: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Default for TimerRegistry<T> {
    fn default() -> Self {
        Self { pending: Vec::new(), next_id: 0 }
    }
}

impl<T> TimerRegistry<T> {
    /// Schedule a task to be due at the given instant.
    pub fn schedule(&mut self, deadline: Instant, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled { handle, deadline, task });
        handle
    }

    /// Schedule a task to be due `delay` after `now`.
    pub fn schedule_after(&mut self, now: Instant, delay: Duration, task: T) -> TimerHandle {
        self.schedule(now + delay, task)
    }

    /// Cancel every pending task, returning them in the order they were scheduled.
    pub fn cancel_all(&mut self) -> Vec<T> {
        mem::take(&mut self.pending).into_iter().map(|scheduled| scheduled.task).collect()
    }

    /// Remove and return every task whose deadline is at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            mem::take(&mut self.pending).into_iter().partition(|scheduled| scheduled.deadline <= now);
        self.pending = pending;
        // Ties are broken by scheduling order.
        due.sort_by_key(|scheduled| (scheduled.deadline, scheduled.handle.0));
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }

    /// The earliest deadline among pending tasks.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|scheduled| scheduled.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn due_tasks_are_ordered_by_deadline() {
        let clock = ManualClock::new();
        let now = clock.now();
        let mut timers = TimerRegistry::default();
        timers.schedule_after(now, Duration::from_millis(500), "complete");
        timers.schedule_after(now, Duration::from_millis(100), "reveal");
        timers.schedule_after(now, Duration::from_millis(300), "cleanup");

        clock.advance_millis(99);
        assert!(timers.take_due(clock.now()).is_empty());

        clock.advance_millis(401);
        assert_eq!(timers.take_due(clock.now()), &["reveal", "cleanup", "complete"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn ties_keep_scheduling_order() {
        let now = Instant::now();
        let mut timers = TimerRegistry::default();
        timers.schedule(now, 1);
        timers.schedule(now, 2);
        timers.schedule(now, 3);
        assert_eq!(timers.take_due(now), &[1, 2, 3]);
    }

    #[test]
    fn cancel_all() {
        let now = Instant::now();
        let mut timers = TimerRegistry::default();
        timers.schedule(now + Duration::from_secs(1), "late");
        timers.schedule(now, "early");
        assert_eq!(timers.next_deadline(), Some(now));
        assert_eq!(timers.cancel_all(), &["late", "early"]);
        assert_eq!(timers.next_deadline(), None);
        assert!(timers.take_due(now + Duration::from_secs(5)).is_empty());
    }
}
