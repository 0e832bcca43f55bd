//! Priority-aware, per-file deduplicated task queue.

use crate::task::{AnalysisTask, TaskKind, TaskPriority};
use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;

/// Ordered work list holding at most one task per file path.
///
/// High-priority tasks are inserted at the front, everything else at the back,
/// so high tasks take strict precedence while medium and low tasks keep FIFO
/// order among themselves.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<AnalysisTask>,
    last_enqueued_at: Option<DateTime<Utc>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `file_path`, replacing any task already queued for it.
    /// Returns the task as queued.
    pub fn enqueue(
        &mut self,
        file_path: &str,
        priority: TaskPriority,
        kind: TaskKind,
    ) -> AnalysisTask {
        self.remove(file_path);

        let task = AnalysisTask::new(file_path, priority, kind, self.next_timestamp());
        if priority == TaskPriority::High {
            self.tasks.push_front(task.clone());
        } else {
            self.tasks.push_back(task.clone());
        }
        task
    }

    pub fn dequeue(&mut self) -> Option<AnalysisTask> {
        self.tasks.pop_front()
    }

    pub fn remove(&mut self, file_path: &str) -> Option<AnalysisTask> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.file_path == file_path)?;
        self.tasks.remove(index)
    }

    pub fn contains(&self, file_path: &str) -> bool {
        self.tasks.iter().any(|task| task.file_path == file_path)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops every queued task, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.tasks.len();
        self.tasks.clear();
        dropped
    }

    /// Queued tasks in dequeue order.
    pub fn snapshot(&self) -> Vec<AnalysisTask> {
        self.tasks.iter().cloned().collect()
    }

    // Task ids embed the timestamp, so it must strictly increase.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_enqueued_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_enqueued_at = Some(next);
        next
    }
}
