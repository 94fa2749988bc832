//! File-based task storage implementation
//!
//! Keeps the collection in memory and snapshots it as JSON after every
//! successful mutation. This is best effort: there is no fsync and no
//! journal.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::collection::TaskCollection;
use super::model::{NewTask, Task, TaskPatch};
use super::pagination::{PageRequest, StatusFilter, TaskPage};
use super::repository::TaskRepository;
use super::seed::demo_tasks;
use crate::{Error, Result};

/// File-based task store using JSON
pub struct FileTaskStore {
    /// Path to the JSON file
    path: PathBuf,
    tasks: RwLock<TaskCollection>,
}

impl FileTaskStore {
    /// Open a FileTaskStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let collection = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let mut collection: TaskCollection = serde_json::from_str(&content)?;
            collection.normalize();
            info!(path = %path.display(), tasks = collection.len(), "loaded task snapshot");
            collection
        } else {
            TaskCollection::new()
        };

        Ok(Self {
            path,
            tasks: RwLock::new(collection),
        })
    }

    /// Open the store, loading the demo tasks when no snapshot exists yet.
    ///
    /// An existing snapshot is never reseeded, even if every task in it was
    /// deleted, so demo ids are not handed out again.
    pub async fn new_seeded(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Self::new(path).await;
        }

        let seeded = TaskCollection::with_tasks(demo_tasks());
        persist(&path, &seeded).await?;
        info!(path = %path.display(), tasks = seeded.len(), "seeded task snapshot");
        Ok(Self {
            path,
            tasks: RwLock::new(seeded),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `op` to a copy of the collection, write the copy to disk and
    /// only then make it current. A failed write leaves the store unchanged.
    async fn mutate<T>(&self, op: impl FnOnce(&mut TaskCollection) -> Result<T>) -> Result<T> {
        let mut tasks = self.tasks.write().await;
        let mut next = tasks.clone();
        let out = op(&mut next)?;
        if let Err(e) = persist(&self.path, &next).await {
            warn!(path = %self.path.display(), error = %e, "failed to write task snapshot");
            return Err(e);
        }
        *tasks = next;
        Ok(out)
    }
}

/// Persist the collection to disk
async fn persist(path: &Path, collection: &TaskCollection) -> Result<()> {
    let content = serde_json::to_string_pretty(collection)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(path, content)
        .await
        .map_err(|e| Error::Storage(format!("writing {}: {}", path.display(), e)))
}

#[async_trait]
impl TaskRepository for FileTaskStore {
    async fn list(&self, filter: StatusFilter, page: PageRequest) -> Result<TaskPage> {
        Ok(self.tasks.read().await.list(filter, page))
    }

    async fn get(&self, id: &str) -> Result<Task> {
        self.tasks.read().await.get(id)
    }

    async fn create(&self, new_task: NewTask) -> Result<Task> {
        let now = Utc::now();
        self.mutate(|tasks| tasks.create(new_task, now)).await
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        let now = Utc::now();
        self.mutate(|tasks| tasks.update(id, patch, now)).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.mutate(|tasks| tasks.delete(id)).await
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.tasks.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;
    use tempfile::TempDir;

    async fn create_test_store() -> (FileTaskStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        let store = FileTaskStore::new(&path).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_create_task() {
        let (store, _temp) = create_test_store().await;

        let created = store
            .create(NewTask::new("Test task").with_description("A test description"))
            .await
            .unwrap();

        assert_eq!(created.title, "Test task");
        assert_eq!(created.description, Some("A test description".to_string()));
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_update_task() {
        let (store, _temp) = create_test_store().await;
        let created = store.create(NewTask::new("Original title")).await.unwrap();

        let result = store
            .update(
                &created.id,
                TaskPatch::default()
                    .title("Updated title")
                    .status(TaskStatus::InProgress),
            )
            .await
            .unwrap();
        assert_eq!(result.title, "Updated title");
        assert_eq!(result.status, TaskStatus::InProgress);

        let retrieved = store.get(&created.id).await.unwrap();
        assert_eq!(retrieved.title, "Updated title");
    }

    #[tokio::test]
    async fn test_update_nonexistent_task() {
        let (store, _temp) = create_test_store().await;

        let result = store.update("42", TaskPatch::default().title("x")).await;
        match result.unwrap_err() {
            Error::TaskNotFound(id) => assert_eq!(id, "42"),
            e => panic!("Expected TaskNotFound error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_delete_task() {
        let (store, _temp) = create_test_store().await;
        let created = store.create(NewTask::new("Task to delete")).await.unwrap();

        store.delete(&created.id).await.unwrap();
        assert!(store.get(&created.id).await.unwrap_err().is_not_found());

        // Delete again reports the task as gone
        assert!(store.delete(&created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_persistence_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("tasks.json");

        let (older, newer) = {
            let store = FileTaskStore::new(&path).await.unwrap();
            let older = store
                .create(NewTask::new("Persistent task").with_description("Should survive reload"))
                .await
                .unwrap();
            let newer = store.create(NewTask::new("Newer task")).await.unwrap();
            (older, newer)
        };

        let store = FileTaskStore::new(&path).await.unwrap();
        assert_eq!(store.get(&older.id).await.unwrap(), older);

        let page = store.list(StatusFilter::All, PageRequest::default()).await.unwrap();
        let ids: Vec<&str> = page.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);

        // counter survives the reload
        store.delete(&newer.id).await.unwrap();
        let next = store.create(NewTask::new("After reload")).await.unwrap();
        assert_ne!(next.id, newer.id);
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_persisted() {
        let (store, _temp) = create_test_store().await;

        let err = store.create(NewTask::new("")).await.unwrap_err();
        assert!(err.is_validation());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_seeded_only_when_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let store = FileTaskStore::new_seeded(&path).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 5);
        store.delete("1").await.unwrap();
        drop(store);

        let store = FileTaskStore::new_seeded(&path).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_emptied_store_is_not_reseeded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");

        let store = FileTaskStore::new_seeded(&path).await.unwrap();
        let extra = store.create(NewTask::new("Extra")).await.unwrap();
        assert_eq!(extra.id, "6");
        for id in ["1", "2", "3", "4", "5", "6"] {
            store.delete(id).await.unwrap();
        }
        drop(store);

        let store = FileTaskStore::new_seeded(&path).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.get("1").await.unwrap_err().is_not_found());

        let next = store.create(NewTask::new("After restart")).await.unwrap();
        assert_eq!(next.id, "7");
    }
}
