//! Task module
//!
//! This module contains task-related types and logic.

mod collection;
mod file_store;
mod memory_store;
mod model;
mod pagination;
mod repository;
mod seed;

pub use collection::TaskCollection;
pub use file_store::FileTaskStore;
pub use memory_store::InMemoryTaskStore;
pub use model::*;
pub use pagination::*;
pub use repository::TaskRepository;
pub use seed::demo_tasks;
