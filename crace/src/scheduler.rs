use std::{
    cell::Cell,
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    time::Duration,
};

/// Source of the current time for the scheduler, so it never has to read a
/// wall clock itself.
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock(Cell<Duration>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.0.set(to);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.0.get()
    }
}

#[derive(Debug)]
struct Task<T> {
    due: Duration,
    seq: u64,
    payload: T,
}

impl<T> Task<T> {
    fn key(&self) -> Reverse<(Duration, u64)> {
        Reverse((self.due, self.seq))
    }
}

impl<T> Ord for Task<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<T> PartialOrd for Task<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Task<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Task<T> {}

/// Cooperative task queue in virtual time.
///
/// Tasks come out ordered by due time, tasks due at the same instant come out
/// in the order they were scheduled.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    seq: u64,
    tasks: BinaryHeap<Task<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            tasks: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.peek().map(|task| task.due)
    }

    /// Tasks due in the past run at the current time.
    pub fn schedule_at(&mut self, due: Duration, payload: T) {
        self.tasks.push(Task {
            due: due.max(self.now),
            seq: self.seq,
            payload,
        });
        self.seq += 1;
    }

    pub fn schedule_in(&mut self, delay: Duration, payload: T) {
        self.schedule_at(self.now + delay, payload);
    }

    /// Takes the next task due at or before `until` and moves the current time
    /// to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<(Duration, T)> {
        if self.next_due()? > until {
            return None;
        }

        let task = self.tasks.pop()?;
        self.now = self.now.max(task.due);
        Some((task.due, task.payload))
    }

    /// Moves the current time forward, never backwards.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn drain(sched: &mut Scheduler<&'static str>, until: Duration) -> Vec<&'static str> {
        let out = std::iter::from_fn(|| sched.pop_due(until))
            .map(|(_, p)| p)
            .collect();
        sched.settle(until);
        out
    }

    #[test]
    fn orders_by_due_then_insertion() {
        let mut sched = Scheduler::new();
        sched.schedule_at(MS * 20, "c");
        sched.schedule_at(MS * 10, "a");
        sched.schedule_at(MS * 10, "b");
        sched.schedule_at(MS * 30, "d");

        assert_eq!(drain(&mut sched, MS * 25), ["a", "b", "c"]);
        assert_eq!(sched.now(), MS * 25);
        assert_eq!(sched.next_due(), Some(MS * 30));
        assert_eq!(drain(&mut sched, MS * 29), Vec::<&str>::new());
        assert_eq!(drain(&mut sched, MS * 30), ["d"]);
        assert!(sched.is_empty());
    }

    #[test]
    fn schedule_in_is_relative_to_now() {
        let mut sched = Scheduler::new();
        sched.settle(MS * 100);
        sched.schedule_in(MS * 50, "later");
        sched.schedule_at(MS * 10, "overdue");

        assert_eq!(sched.next_due(), Some(MS * 100));
        assert_eq!(drain(&mut sched, MS * 149), ["overdue"]);
        assert_eq!(drain(&mut sched, MS * 150), ["later"]);
    }

    #[test]
    fn time_never_goes_back() {
        let mut sched: Scheduler<()> = Scheduler::new();
        sched.settle(MS * 10);
        sched.settle(MS * 5);
        assert_eq!(sched.now(), MS * 10);
    }

    #[test]
    fn manual_clock() {
        let clock = ManualClock::new();
        clock.advance(MS * 50);
        clock.advance(MS * 50);
        assert_eq!(clock.elapsed(), MS * 100);
        clock.set(MS * 7);
        assert_eq!(clock.elapsed(), MS * 7);
    }
}
