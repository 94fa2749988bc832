//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;

use super::model::{NewTask, Task, TaskPatch};
use super::pagination::{PageRequest, StatusFilter, TaskPage};
use crate::Result;

/// Repository interface for task CRUD operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List one page of tasks, newest first, after applying `filter`
    async fn list(&self, filter: StatusFilter, page: PageRequest) -> Result<TaskPage>;

    /// Get a task by ID
    async fn get(&self, id: &str) -> Result<Task>;

    /// Create a new task and return the stored record
    async fn create(&self, new_task: NewTask) -> Result<Task>;

    /// Merge `patch` into an existing task and return the result
    async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task>;

    /// Delete a task by ID
    async fn delete(&self, id: &str) -> Result<()>;

    /// Number of live tasks
    async fn count(&self) -> Result<usize>;
}
