//! Task model definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Maximum title length, in characters
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum description length, in characters
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses, in board column order
    pub const ALL: [TaskStatus; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "TO_DO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::validation("status", format!("unknown status '{}'", s)))
    }
}

/// A task managed by a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl NewTask {
    /// Create a new task payload with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    /// Build the stored record. The caller is responsible for validation.
    pub(crate) fn into_task(self, id: String, now: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a task.
///
/// Only the fields present are written. Identity and timestamps are not
/// part of the patch and cannot be overwritten through it; unknown JSON
/// fields are dropped on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true when the patch carries no field
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    /// Merge the patch into `task`, field by field.
    ///
    /// `updated_at` never moves backwards, so `created_at <= updated_at`
    /// holds even if the wall clock steps back.
    pub(crate) fn apply_to(self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = Some(description);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        task.updated_at = now.max(task.updated_at);
    }
}

/// Check a title: required, non-blank, at most [`TITLE_MAX_CHARS`] characters
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::validation("title", "Title is required"));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(Error::validation(
            "title",
            format!("Title must be at most {} characters", TITLE_MAX_CHARS),
        ));
    }
    Ok(())
}

/// Check a description: at most [`DESCRIPTION_MAX_CHARS`] characters
pub fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(Error::validation(
            "description",
            format!(
                "Description must be at most {} characters",
                DESCRIPTION_MAX_CHARS
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&TaskStatus::ToDo).unwrap(), "\"TO_DO\"");
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(serde_json::to_string(&TaskStatus::Done).unwrap(), "\"DONE\"");
        assert_eq!("IN_PROGRESS".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("in_progress".parse::<TaskStatus>().is_err());
        assert!(serde_json::from_str::<TaskStatus>("\"BLOCKED\"").is_err());
    }

    #[test]
    fn test_new_task_defaults_to_todo() {
        let now = Utc::now();
        let task = NewTask::new("Write docs").into_task("7".to_string(), now);
        assert_eq!(task.id, "7");
        assert_eq!(task.status, TaskStatus::ToDo);
        assert!(task.description.is_none());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_title_validation() {
        assert!(validate_title("ok").is_ok());
        assert!(validate_title("   ").unwrap_err().is_validation());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"a".repeat(TITLE_MAX_CHARS)).is_ok());
        assert!(validate_title(&"a".repeat(TITLE_MAX_CHARS + 1)).is_err());
        // limits count characters, not bytes
        assert!(validate_title(&"é".repeat(TITLE_MAX_CHARS)).is_ok());
    }

    #[test]
    fn test_description_validation() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"d".repeat(DESCRIPTION_MAX_CHARS)).is_ok());
        match validate_description(&"d".repeat(DESCRIPTION_MAX_CHARS + 1)) {
            Err(Error::Validation { field, .. }) => assert_eq!(field, "description"),
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let now = Utc::now();
        let mut task = NewTask::new("Original")
            .with_description("Keep me")
            .into_task("1".to_string(), now);

        TaskPatch::default()
            .status(TaskStatus::Done)
            .apply_to(&mut task, now + Duration::seconds(5));

        assert_eq!(task.title, "Original");
        assert_eq!(task.description.as_deref(), Some("Keep me"));
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.created_at, now);
        assert_eq!(task.updated_at, now + Duration::seconds(5));
    }

    #[test]
    fn test_patch_never_moves_updated_at_backwards() {
        let now = Utc::now();
        let mut task = NewTask::new("Clock").into_task("1".to_string(), now);
        TaskPatch::default().apply_to(&mut task, now - Duration::seconds(30));
        assert_eq!(task.updated_at, now);
    }

    #[test]
    fn test_patch_ignores_identity_fields() {
        let patch: TaskPatch = serde_json::from_str(
            r#"{"id":"999","createdAt":"2000-01-01T00:00:00Z","title":"Renamed"}"#,
        )
        .unwrap();
        assert_eq!(patch, TaskPatch::default().title("Renamed"));
    }

    #[test]
    fn test_blank_title_patch_is_rejected() {
        assert!(TaskPatch::default().title("  ").validate().is_err());
        assert!(TaskPatch::default().validate().is_ok());
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn test_task_json_shape() {
        let now = Utc::now();
        let task = NewTask::new("Shape").into_task("3".to_string(), now);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], "3");
        assert_eq!(value["status"], "TO_DO");
        assert!(value.get("description").is_none());
        assert!(value["createdAt"].is_string());
        assert!(value["updatedAt"].is_string());
    }
}
