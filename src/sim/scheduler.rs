use std::collections::VecDeque;

use crate::host::{DeferredTask, Scheduler};

#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<DeferredTask>,
}

impl TaskQueue {
    pub fn pop(&mut self) -> Option<DeferredTask> {
        self.tasks.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Scheduler for TaskQueue {
    fn defer(&mut self, task: DeferredTask) {
        self.tasks.push_back(task);
    }
}
