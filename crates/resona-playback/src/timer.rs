//! One-shot timers for deferred playback continuations.
//!
//! The stop-at-end and interval waits are single-shot tasks keyed by
//! session identity plus the bound player's generation. A timer whose
//! generation no longer matches the player is stale — its session was
//! stopped or replaced — and is dropped on expiry instead of acting.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use resona_common::SessionId;

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// The playing clip reached its trim end.
    StopAtEnd,
    /// The inter-loop interval elapsed.
    IntervalEnd,
}

/// A scheduled one-shot task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTask {
    /// Session the task belongs to.
    pub session: SessionId,
    /// Player generation captured at scheduling time.
    pub generation: u64,
    /// Task kind.
    pub kind: TimerKind,
}

#[derive(Debug)]
struct Scheduled {
    due: f64,
    seq: u64,
    task: TimerTask,
}

// Min-heap by due time; FIFO among equal due times.
impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}
impl Eq for Scheduled {}
impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of pending one-shot timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl TimerQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a task to fire at absolute time `due`.
    pub fn schedule(&mut self, due: f64, task: TimerTask) {
        self.next_seq += 1;
        self.heap.push(Scheduled {
            due,
            seq: self.next_seq,
            task,
        });
    }

    /// Pops the next task due at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: f64) -> Option<TimerTask> {
        if self.heap.peek().is_some_and(|s| s.due <= now) {
            self.heap.pop().map(|s| s.task)
        } else {
            None
        }
    }

    /// Number of pending timers (including stale ones not yet drained).
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Checks whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(generation: u64, kind: TimerKind) -> TimerTask {
        TimerTask {
            session: SessionId::new(),
            generation,
            kind,
        }
    }

    #[test]
    fn test_pop_due_ordering() {
        let mut queue = TimerQueue::new();
        let late = task(0, TimerKind::StopAtEnd);
        let early = task(0, TimerKind::IntervalEnd);
        queue.schedule(2.0, late);
        queue.schedule(1.0, early);

        assert_eq!(queue.pop_due(0.5), None);
        assert_eq!(queue.pop_due(1.5), Some(early));
        assert_eq!(queue.pop_due(1.5), None);
        assert_eq!(queue.pop_due(2.0), Some(late));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_fifo_for_equal_due_times() {
        let mut queue = TimerQueue::new();
        let first = task(1, TimerKind::StopAtEnd);
        let second = task(2, TimerKind::StopAtEnd);
        queue.schedule(1.0, first);
        queue.schedule(1.0, second);

        assert_eq!(queue.pop_due(1.0), Some(first));
        assert_eq!(queue.pop_due(1.0), Some(second));
    }
}
