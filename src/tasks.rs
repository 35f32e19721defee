//! Deferred work for the field, run later on the host's own thread.
//!
//! Posting a keyed task that is already queued drops the queued copy and
//! appends the new one at the back, so a pass is never scheduled twice.

use std::collections::VecDeque;

/// Deferred field operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Tokenize fragments queued by `append`
    HandlePendingChips,
    /// Add chips for each value, in order
    AddChips(Vec<String>),
    /// Turn the text watcher back on after a programmatic append or paste
    ResumeWatching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskKey {
    HandlePendingChips,
    ResumeWatching,
}

impl Task {
    fn key(&self) -> Option<TaskKey> {
        match self {
            Task::HandlePendingChips => Some(TaskKey::HandlePendingChips),
            Task::ResumeWatching => Some(TaskKey::ResumeWatching),
            Task::AddChips(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: VecDeque<Task>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, task: Task) {
        if let Some(key) = task.key() {
            self.tasks.retain(|queued| queued.key() != Some(key));
        }
        self.tasks.push_back(task);
    }

    pub fn pop(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
