//! Client side of Taskdesk
//!
//! - [`api`]: typed calls against the task REST API
//! - [`view`]: list view state derived from the URL query
//! - [`form`]: create/edit form validation
//! - [`controller`]: list and form flows tying the above together

pub mod api;
pub mod controller;
pub mod error;
pub mod form;
pub mod view;

pub use api::{ClientConfig, HttpTaskApi, TaskApi};
pub use error::{ClientError, Result};
