//! In-memory task storage implementation

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::collection::TaskCollection;
use super::model::{NewTask, Task, TaskPatch};
use super::pagination::{PageRequest, StatusFilter, TaskPage};
use super::repository::TaskRepository;
use super::seed::demo_tasks;
use crate::Result;

/// Non-durable task store living for one process lifetime.
///
/// Every operation takes the lock exactly once, so callers never observe a
/// half-applied mutation.
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<TaskCollection>,
}

impl InMemoryTaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the demo tasks
    pub fn seeded() -> Self {
        Self::with_tasks(demo_tasks())
    }

    /// Create a store from tasks in newest-first order
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(TaskCollection::with_tasks(tasks)),
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn list(&self, filter: StatusFilter, page: PageRequest) -> Result<TaskPage> {
        Ok(self.tasks.read().await.list(filter, page))
    }

    async fn get(&self, id: &str) -> Result<Task> {
        self.tasks.read().await.get(id)
    }

    async fn create(&self, new_task: NewTask) -> Result<Task> {
        self.tasks.write().await.create(new_task, Utc::now())
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        self.tasks.write().await.update(id, patch, Utc::now())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.tasks.write().await.delete(id)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.tasks.read().await.len())
    }
}
