use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TaskError {
    #[error("task text must not be empty")]
    EmptyText,
    #[error("no task with id {0}")]
    NotFound(u64),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Task {
    pub(crate) id: u64,
    pub(crate) text: String,
    pub(crate) priority: Priority,
    pub(crate) completed: bool,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TaskStats {
    pub(crate) total: usize,
    pub(crate) pending: usize,
    pub(crate) completed: usize,
}

/// Tasks in insertion order plus the next id to hand out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TaskList {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskList {
    /// Rebuilds a list from persisted parts. The counter is bumped past the
    /// largest stored id so ids are never reused.
    pub(crate) fn from_parts(tasks: Vec<Task>, next_id: Option<u64>) -> Self {
        let floor = tasks.iter().map(|task| task.id + 1).max().unwrap_or(0);
        Self {
            tasks,
            next_id: next_id.unwrap_or(0).max(floor),
        }
    }

    pub(crate) fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn add(
        &mut self,
        text: &str,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Result<&Task, TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            priority,
            completed: false,
            created_at: now,
        });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Flips completion and returns the new state.
    pub(crate) fn toggle(&mut self, id: u64) -> Result<bool, TaskError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskError::NotFound(id))?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    pub(crate) fn delete(&mut self, id: u64) -> Result<Task, TaskError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(TaskError::NotFound(id))?;
        Ok(self.tasks.remove(index))
    }

    /// Drops completed tasks and returns how many went.
    pub(crate) fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        before - self.tasks.len()
    }

    pub(crate) fn filtered(&self, filter: TaskFilter) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |task| filter.matches(task))
    }

    pub(crate) fn stats(&self) -> TaskStats {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        TaskStats {
            total: self.tasks.len(),
            pending: self.tasks.len() - completed,
            completed,
        }
    }
}
