//! List, create and edit flows driven by [`TaskApi`]
//!
//! Controllers own the view state and the last fetched data. Rendering,
//! toasts and navigation are left to the caller: controllers queue
//! [`Notice`]s and return query strings or [`Redirect`]s to act on.

use tracing::{debug, warn};

use taskdesk_core::task::{Pagination, StatusFilter, Task};

use crate::api::TaskApi;
use crate::form::{FieldErrors, FormField, TaskForm};
use crate::view::{group_by_status, StatusColumn, ViewMode, ViewState};

/// A user-facing notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Where the UI should go next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    ToList,
}

/// State behind the task list page
pub struct TaskListController<A> {
    api: A,
    view: ViewState,
    tasks: Vec<Task>,
    pagination: Option<Pagination>,
    loading: bool,
    notices: Vec<Notice>,
}

impl<A: TaskApi> TaskListController<A> {
    pub fn new(api: A, view: ViewState) -> Self {
        Self {
            api,
            view,
            tasks: Vec::new(),
            pagination: None,
            loading: false,
            notices: Vec::new(),
        }
    }

    /// Build the controller for a URL query and fetch the first view
    pub async fn open(api: A, query: &str) -> Self {
        let mut controller = Self::new(api, ViewState::from_query(query));
        controller.refresh().await;
        controller
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Board columns for grid mode, `None` in list mode
    pub fn columns(&self) -> Option<Vec<StatusColumn>> {
        match self.view.mode {
            ViewMode::Grid => Some(group_by_status(&self.tasks)),
            ViewMode::List => None,
        }
    }

    /// Drain queued notifications
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Re-fetch the current page. On failure the previous list is kept.
    pub async fn refresh(&mut self) -> bool {
        self.loading = true;
        let result = self.api.fetch_tasks(self.view.filter, self.view.page).await;
        self.loading = false;

        match result {
            Ok(page) => {
                debug!(
                    count = page.tasks.len(),
                    total = page.pagination.total,
                    "task list refreshed"
                );
                self.tasks = page.tasks;
                self.pagination = Some(page.pagination);
                true
            }
            Err(e) => {
                warn!(error = %e, "task list refresh failed");
                self.notices.push(Notice::Error(
                    "Failed to fetch tasks. Please try again.".to_string(),
                ));
                false
            }
        }
    }

    /// Follow a URL change, such as back/forward navigation
    pub async fn navigate(&mut self, query: &str) -> String {
        self.apply(ViewState::from_query(query)).await
    }

    /// Change the status filter and return the new query string
    pub async fn set_filter(&mut self, filter: StatusFilter) -> String {
        self.apply(self.view.with_filter(filter)).await
    }

    /// Change the page and return the new query string
    pub async fn set_page(&mut self, page: u32) -> String {
        self.apply(self.view.with_page(page)).await
    }

    /// Switch between list and board layout
    pub async fn set_mode(&mut self, mode: ViewMode) -> String {
        self.apply(self.view.with_mode(mode)).await
    }

    async fn apply(&mut self, view: ViewState) -> String {
        self.view = view;
        self.refresh().await;
        self.view.to_query()
    }

    /// Delete a task, then re-fetch the same page and filter.
    ///
    /// The list is not edited locally, so a page emptied by the deletion
    /// shows no items until pagination catches up. A failed delete also
    /// re-fetches, since the task may already be gone.
    pub async fn delete_task(&mut self, id: &str) -> bool {
        let deleted = match self.api.delete_task(id).await {
            Ok(()) => {
                self.notices
                    .push(Notice::Success("Task deleted successfully.".to_string()));
                true
            }
            Err(e) => {
                warn!(task_id = %id, error = %e, "delete failed");
                self.notices.push(Notice::Error(
                    "Failed to delete task. Please try again.".to_string(),
                ));
                false
            }
        };
        self.refresh().await;
        deleted
    }
}

/// State behind the create and edit pages
pub struct TaskFormController<A> {
    api: A,
    /// `None` when creating
    task_id: Option<String>,
    form: TaskForm,
    errors: FieldErrors,
    submitting: bool,
    notices: Vec<Notice>,
}

impl<A: TaskApi> TaskFormController<A> {
    /// Blank form for a new task
    pub fn create(api: A) -> Self {
        Self {
            api,
            task_id: None,
            form: TaskForm::default(),
            errors: FieldErrors::new(),
            submitting: false,
            notices: Vec::new(),
        }
    }

    /// Load a task for editing. If it cannot be loaded the UI should show
    /// the notice and go back to the list.
    pub async fn edit(api: A, id: &str) -> Result<Self, (Redirect, Notice)> {
        match api.fetch_task(id).await {
            Ok(task) => Ok(Self {
                form: TaskForm::from_task(&task),
                task_id: Some(task.id),
                api,
                errors: FieldErrors::new(),
                submitting: false,
                notices: Vec::new(),
            }),
            Err(e) => {
                warn!(task_id = %id, error = %e, "failed to load task for editing");
                Err((
                    Redirect::ToList,
                    Notice::Error("Failed to load task. Please try again.".to_string()),
                ))
            }
        }
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Update one field; its error message is cleared
    pub fn set_field(&mut self, field: FormField, value: &str) {
        self.form.set(field, value);
        self.errors.remove(&field);
    }

    /// Validate and send the form. Returns the saved task and a redirect to
    /// the list on success; `None` when validation or the request failed.
    pub async fn submit(&mut self) -> Option<(Task, Redirect)> {
        if let Err(errors) = self.form.validate() {
            self.errors = errors;
            return None;
        }
        self.errors.clear();

        self.submitting = true;
        let result = match &self.task_id {
            Some(id) => self.api.update_task(id, &self.form.to_patch()).await,
            None => self.api.create_task(&self.form.to_new_task()).await,
        };
        self.submitting = false;

        let verb = if self.task_id.is_some() { "update" } else { "create" };
        match result {
            Ok(task) => {
                let done = if self.task_id.is_some() { "updated" } else { "created" };
                self.notices
                    .push(Notice::Success(format!("Task {} successfully.", done)));
                Some((task, Redirect::ToList))
            }
            Err(e) => {
                warn!(error = %e, "failed to {} task", verb);
                self.notices.push(Notice::Error(format!(
                    "Failed to {} task. Please try again.",
                    verb
                )));
                None
            }
        }
    }
}
