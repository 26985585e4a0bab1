//! Single-threaded deadline queue standing in for the browser's timer callbacks.
//!
//! Tasks are ordered by deadline, then by scheduling order, so two timers that
//! expire at the same instant fire in the order they were armed. Nothing runs
//! on its own: the owner pulls due tasks with [`Scheduler::pop_due`] while it
//! advances its clock.

use std::collections::{BTreeMap, HashMap};

use shared::domain::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    queue: BTreeMap<(Timestamp, TaskId), T>,
    deadlines: HashMap<TaskId, Timestamp>,
    next_id: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Timestamp, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.insert((at, id), task);
        self.deadlines.insert(id, at);
        id
    }

    /// Returns `false` when the task already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let Some(at) = self.deadlines.remove(&id) else {
            return false;
        };
        self.queue.remove(&(at, id)).is_some()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Remove and return the earliest task whose deadline is `<= now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(TaskId, Timestamp, T)> {
        let (&(at, id), _) = self.queue.first_key_value()?;
        if at > now {
            return None;
        }
        let task = self.queue.remove(&(at, id))?;
        self.deadlines.remove(&id);
        Some((id, at, task))
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
