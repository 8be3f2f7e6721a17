use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fixed-capacity ring buffer, most-recent-last. Pushing into a full buffer
/// evicts the oldest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingWindow<T> {
    capacity: usize,
    entries: VecDeque<T>
}

impl<T> RollingWindow<T> {
    pub fn new(capacity: usize) -> RollingWindow<T> {
        RollingWindow {
            capacity: capacity.max(1),
            entries: VecDeque::with_capacity(capacity.max(1))
        }
    }

    pub fn push(&mut self, value: T) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The `n` most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &T> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }
}

/// Timestamped entries that are dropped once they fall out of a trailing
/// window. Pruning happens on every access that takes `now`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow<T> {
    entries: VecDeque<(DateTime<Utc>, T)>
}

impl<T> TimeWindow<T> {
    pub fn new() -> TimeWindow<T> {
        TimeWindow {
            entries: VecDeque::new()
        }
    }

    /// Entries must be recorded in non-decreasing time order; an earlier
    /// timestamp is still kept but is placed in order.
    pub fn record(&mut self, at: DateTime<Utc>, value: T) {
        let idx = self.entries.partition_point(|(t, _)| *t <= at);
        self.entries.insert(idx, (at, value));
    }

    /// Drops everything at or before `now - window`.
    pub fn prune(&mut self, now: DateTime<Utc>, window: Duration) {
        let cutoff = now - window;
        while self.entries.front().is_some_and(|(t, _)| *t <= cutoff) {
            self.entries.pop_front();
        }
    }

    /// Number of entries inside `(now - window, now]` after pruning.
    pub fn count_within(&mut self, now: DateTime<Utc>, window: Duration) -> usize {
        self.prune(now, window);
        self.entries.iter().filter(|(t, _)| *t <= now).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(DateTime<Utc>, T)> {
        self.entries.iter()
    }
}
