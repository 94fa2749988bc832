//! Application state

use std::sync::Arc;

use taskdesk_core::task::{FileTaskStore, InMemoryTaskStore, TaskRepository};

use crate::config::{ServerConfig, StoreBackend};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    task_store: Arc<dyn TaskRepository>,
    backend: StoreBackend,
}

impl AppState {
    /// Build the task store described by `config`
    pub async fn new(config: &ServerConfig) -> taskdesk_core::Result<Self> {
        let task_store: Arc<dyn TaskRepository> = match (&config.data_file, config.seed_demo) {
            (Some(path), true) => Arc::new(FileTaskStore::new_seeded(path.clone()).await?),
            (Some(path), false) => Arc::new(FileTaskStore::new(path.clone()).await?),
            (None, true) => Arc::new(InMemoryTaskStore::seeded()),
            (None, false) => Arc::new(InMemoryTaskStore::new()),
        };

        Ok(Self::with_store(task_store, config.backend()))
    }

    /// Wrap an existing store
    pub fn with_store(task_store: Arc<dyn TaskRepository>, backend: StoreBackend) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                task_store,
                backend,
            }),
        }
    }

    /// Get reference to the task store
    pub fn task_store(&self) -> &dyn TaskRepository {
        self.inner.task_store.as_ref()
    }

    pub fn backend(&self) -> StoreBackend {
        self.inner.backend
    }
}
