//! Cancellable delayed tasks
//!
//! Restart countdowns and post-goal delays are queued here instead of living
//! in closures. Every task is keyed by a `TaskToken` the engine keeps, so a
//! reset or a re-staged restart can cancel whatever is still pending.

use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskToken(u64);

/// Delayed-task queue driven in whole seconds.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: u64,
    next_token: u64,
    /// (due, token) -> task; token order breaks ties deterministically
    queue: BTreeMap<(u64, TaskToken), T>,
    due_by_token: HashMap<TaskToken, u64>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_token: 0,
            queue: BTreeMap::new(),
            due_by_token: HashMap::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.due_by_token.contains_key(&token)
    }

    /// Queue `task` to fire `delay_seconds` from now.
    pub fn schedule(&mut self, delay_seconds: u64, task: T) -> TaskToken {
        self.next_token += 1;
        let token = TaskToken(self.next_token);
        let due = self.now.saturating_add(delay_seconds);
        self.queue.insert((due, token), task);
        self.due_by_token.insert(token, due);
        token
    }

    /// Cancel a pending task; returns it if it had not fired yet.
    pub fn cancel(&mut self, token: TaskToken) -> Option<T> {
        let due = self.due_by_token.remove(&token)?;
        self.queue.remove(&(due, token))
    }

    /// Drop every pending task. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.queue.len();
        self.queue.clear();
        self.due_by_token.clear();
        cancelled
    }

    /// Move time forward and hand back every task that became due, in order.
    pub fn advance(&mut self, seconds: u64) -> Vec<(TaskToken, T)> {
        self.now = self.now.saturating_add(seconds);
        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            let ((_, token), task) = entry.remove_entry();
            self.due_by_token.remove(&token);
            due.push((token, task));
        }
        due
    }
}
