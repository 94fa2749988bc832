//! Ordered task collection shared by the store implementations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::{NewTask, Task, TaskPatch};
use super::pagination::{paginate, PageRequest, StatusFilter, TaskPage};
use crate::{Error, Result};

/// Tasks in newest-first order plus the id counter.
///
/// Ids come from a monotonic counter and are never handed out twice, even
/// after the task holding one is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCollection {
    next_id: u64,
    tasks: Vec<Task>,
}

impl Default for TaskCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskCollection {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Build a collection from tasks already in newest-first order.
    ///
    /// The counter starts after the highest numeric id present.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = next_id_after(&tasks);
        Self { next_id, tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Repair a collection read from disk: the counter must stay ahead of
    /// every stored id.
    pub(crate) fn normalize(&mut self) {
        self.next_id = self.next_id.max(next_id_after(&self.tasks));
    }

    pub fn list(&self, filter: StatusFilter, request: PageRequest) -> TaskPage {
        paginate(&self.tasks, filter, request)
    }

    pub fn get(&self, id: &str) -> Result<Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }

    pub fn create(&mut self, new_task: NewTask, now: DateTime<Utc>) -> Result<Task> {
        new_task.validate()?;

        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| Error::Storage("task id counter exhausted".to_string()))?;
        let id = self.next_id.to_string();
        self.next_id = next_id;

        let task = new_task.into_task(id, now);
        self.tasks.insert(0, task.clone());
        debug!(task_id = %task.id, status = %task.status, "created task");
        Ok(task)
    }

    pub fn update(&mut self, id: &str, patch: TaskPatch, now: DateTime<Utc>) -> Result<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        patch.validate()?;
        patch.apply_to(task, now);
        debug!(task_id = %task.id, "updated task");
        Ok(task.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        self.tasks.remove(index);
        debug!(task_id = %id, "deleted task");
        Ok(())
    }
}

fn next_id_after(tasks: &[Task]) -> u64 {
    tasks
        .iter()
        .filter_map(|t| t.id.parse::<u64>().ok())
        .max()
        // u64::MAX is never assigned, so it doubles as the exhausted mark
        .map_or(1, |max| max.checked_add(1).unwrap_or(u64::MAX))
}
