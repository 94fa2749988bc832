//! Task API endpoints
//!
//! RESTful API for task CRUD operations. Mounted both at `/tasks` and
//! `/api/tasks`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use taskdesk_core::task::{
    NewTask, PageRequest, Pagination, StatusFilter, Task, TaskPatch, TaskStatus,
};
use taskdesk_core::Error;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<TaskResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub message: String,
}

fn iso8601(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            created_at: iso8601(task.created_at),
            updated_at: iso8601(task.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a store error to a response. `failure` is the message used for
/// anything that is neither bad input nor a missing task.
fn map_task_error(failure: &'static str) -> impl Fn(Error) -> ApiError {
    move |err| match err {
        Error::Validation { field, message } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Validation failed".to_string(),
                field: Some(field.to_string()),
                details: Some(message),
            }),
        ),
        Error::TaskNotFound(id) => {
            tracing::debug!(task_id = %id, "task not found");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Task not found".to_string(),
                    field: None,
                    details: None,
                }),
            )
        }
        other => {
            tracing::error!(error = %other, "{}", failure);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: failure.to_string(),
                    field: None,
                    details: Some(other.to_string()),
                }),
            )
        }
    }
}

/// A body that cannot be read as JSON is an unexpected failure, not a
/// validation error.
fn body_rejected(failure: &'static str) -> impl Fn(JsonRejection) -> ApiError {
    move |rejection| {
        tracing::warn!(error = %rejection.body_text(), "{}", failure);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: failure.to_string(),
                field: None,
                details: Some(rejection.body_text()),
            }),
        )
    }
}

fn query_rejected(rejection: QueryRejection) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Validation failed".to_string(),
            field: None,
            details: Some(rejection.body_text()),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /tasks - List one page of tasks
async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> Result<Json<ListTasksResponse>, ApiError> {
    const FAILURE: &str = "Failed to fetch tasks";

    let Query(query) = query.map_err(query_rejected)?;
    let filter = StatusFilter::parse(query.status.as_deref()).map_err(map_task_error(FAILURE))?;
    let page =
        PageRequest::from_optional(query.page, query.limit).map_err(map_task_error(FAILURE))?;

    let result = state
        .task_store()
        .list(filter, page)
        .await
        .map_err(map_task_error(FAILURE))?;

    tracing::debug!(
        returned = result.tasks.len(),
        total = result.pagination.total,
        %filter,
        "listed tasks"
    );

    Ok(Json(ListTasksResponse {
        tasks: result.tasks.into_iter().map(TaskResponse::from).collect(),
        pagination: result.pagination,
    }))
}

/// POST /tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    const FAILURE: &str = "Failed to create task";

    let Json(req) = payload.map_err(body_rejected(FAILURE))?;
    let created = state
        .task_store()
        .create(req)
        .await
        .map_err(map_task_error(FAILURE))?;

    tracing::info!(task_id = %created.id, "task created");
    Ok((StatusCode::CREATED, Json(TaskResponse::from(created))))
}

/// GET /tasks/{id} - Get a single task
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .task_store()
        .get(&id)
        .await
        .map_err(map_task_error("Failed to fetch task"))?;

    Ok(Json(TaskResponse::from(task)))
}

/// PUT or PATCH /tasks/{id} - Merge the supplied fields into a task
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    const FAILURE: &str = "Failed to update task";

    let Json(patch) = payload.map_err(body_rejected(FAILURE))?;
    let updated = state
        .task_store()
        .update(&id, patch)
        .await
        .map_err(map_task_error(FAILURE))?;

    tracing::info!(task_id = %updated.id, status = %updated.status, "task updated");
    Ok(Json(TaskResponse::from(updated)))
}

/// DELETE /tasks/{id} - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTaskResponse>, ApiError> {
    state
        .task_store()
        .delete(&id)
        .await
        .map_err(map_task_error("Failed to delete task"))?;

    tracing::info!(task_id = %id, "task deleted");
    Ok(Json(DeleteTaskResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

// ============================================================================
// Router
// ============================================================================

fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task)
                .put(update_task)
                .patch(update_task)
                .delete(delete_task),
        )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(task_routes())
        .nest("/api", task_routes())
}
