//! Task scheduler
//!
//! Single-threaded turn queue. The deferred lifecycle entry points and
//! mutation batch delivery run here, one task per turn, so no lifecycle work
//! executes synchronously inside the caller that requested it.

use std::collections::VecDeque;

use vigil_dom::ElementId;

use crate::lifecycle::LoadOptions;

/// Deferred work executed by `Runtime::run_until_idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Task {
    Load {
        element: ElementId,
        options: LoadOptions,
    },
    Show {
        element: ElementId,
        options: LoadOptions,
    },
    DeliverBatch,
}

#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    tasks: VecDeque<Task>,
    batch_scheduled: bool,
}

impl TaskQueue {
    pub fn push(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    /// Schedule one batch delivery; further requests coalesce into it until
    /// it runs. Returns whether a new task was queued.
    pub fn schedule_batch(&mut self) -> bool {
        if self.batch_scheduled {
            return false;
        }
        self.batch_scheduled = true;
        self.tasks.push_back(Task::DeliverBatch);
        true
    }

    pub fn pop(&mut self) -> Option<Task> {
        let task = self.tasks.pop_front();
        if matches!(task, Some(Task::DeliverBatch)) {
            self.batch_scheduled = false;
        }
        task
    }

    pub fn batch_scheduled(&self) -> bool {
        self.batch_scheduled
    }

    /// Drop any queued batch delivery.
    pub fn cancel_batch(&mut self) {
        self.tasks.retain(|t| !matches!(t, Task::DeliverBatch));
        self.batch_scheduled = false;
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
