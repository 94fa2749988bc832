//! Create/edit form values and their validation

use std::collections::BTreeMap;

use taskdesk_core::task::{
    NewTask, Task, TaskPatch, TaskStatus, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
};

/// Form field names, as used for error keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Title,
    Description,
    Status,
}

/// Per-field messages shown next to the inputs
pub type FieldErrors = BTreeMap<FormField, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl TaskForm {
    /// Prefill the form from a stored task
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
        }
    }

    /// Set a field from raw input. An unknown status string leaves the
    /// status unchanged.
    pub fn set(&mut self, field: FormField, value: &str) {
        match field {
            FormField::Title => self.title = value.to_string(),
            FormField::Description => self.description = value.to_string(),
            FormField::Status => {
                if let Ok(status) = value.parse() {
                    self.status = status;
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.insert(FormField::Title, "Title is required".to_string());
        } else if self.title.chars().count() > TITLE_MAX_CHARS {
            errors.insert(
                FormField::Title,
                format!("Title must be less than {} characters", TITLE_MAX_CHARS),
            );
        }

        if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.insert(
                FormField::Description,
                format!(
                    "Description must be less than {} characters",
                    DESCRIPTION_MAX_CHARS
                ),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Create payload; an empty description is sent as absent
    pub fn to_new_task(&self) -> NewTask {
        let mut new_task = NewTask::new(self.title.clone()).with_status(self.status);
        if !self.description.is_empty() {
            new_task = new_task.with_description(self.description.clone());
        }
        new_task
    }

    /// Update payload carrying every form field
    pub fn to_patch(&self) -> TaskPatch {
        TaskPatch::default()
            .title(self.title.clone())
            .description(self.description.clone())
            .status(self.status)
    }
}
