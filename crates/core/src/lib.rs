//! Core library for Taskdesk
//!
//! This crate contains the task domain shared by the server and the client:
//! - Task model and validation rules
//! - Status filtering and pagination math
//! - Task store trait with in-memory and file-backed implementations

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
