//! Typed access to the task REST API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use taskdesk_core::task::{NewTask, StatusFilter, Task, TaskPage, TaskPatch, DEFAULT_LIMIT};

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8081";

/// Operations the list and edit views need from a backend
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn fetch_tasks(&self, filter: StatusFilter, page: u32) -> Result<TaskPage>;

    async fn fetch_task(&self, id: &str) -> Result<Task>;

    async fn create_task(&self, new_task: &NewTask) -> Result<Task>;

    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task>;

    async fn delete_task(&self, id: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, without the `/tasks` suffix
    pub base_url: String,
    pub page_size: u32,
    pub timeout: Duration,
    /// Ignore proxy settings from the environment
    pub no_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_LIMIT,
            timeout: Duration::from_secs(10),
            no_proxy: false,
        }
    }
}

impl ClientConfig {
    /// Defaults, with the base URL taken from `TASKDESK_API_URL` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TASKDESK_API_URL") {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn without_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }
}

/// [`TaskApi`] over HTTP
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl HttpTaskApi {
    pub fn new(config: ClientConfig) -> Self {
        let mut builder = Client::builder().timeout(config.timeout);
        if config.no_proxy {
            builder = builder.no_proxy();
        }
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        }
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: &str) -> String {
        format!("{}/tasks/{}", self.base_url, urlencoding::encode(id))
    }

    /// Send `request` and decode a 2xx JSON body into `T`
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        failure: &'static str,
    ) -> Result<T> {
        let response = checked(request, failure).await?;
        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, "{}", failure);
            ClientError::new(failure, format!("invalid response body: {}", e))
        })
    }
}

/// Send `request`, collapsing transport errors and non-2xx statuses
async fn checked(request: RequestBuilder, failure: &'static str) -> Result<Response> {
    let response = request.send().await.map_err(|e| {
        warn!(error = %e, "{}", failure);
        ClientError::new(failure, format!("request failed: {}", e))
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(%status, body = %body, "{}", failure);
        return Err(ClientError::new(
            failure,
            format!("server returned {}: {}", status, body),
        ));
    }
    Ok(response)
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn fetch_tasks(&self, filter: StatusFilter, page: u32) -> Result<TaskPage> {
        let mut query = vec![
            ("page", page.to_string()),
            ("limit", self.page_size.to_string()),
        ];
        if let Some(status) = filter.as_query_value() {
            query.push(("status", status.to_string()));
        }

        debug!(page, %filter, "fetching tasks");
        self.send_json(
            self.client.get(self.tasks_url()).query(&query),
            "Failed to fetch tasks",
        )
        .await
    }

    async fn fetch_task(&self, id: &str) -> Result<Task> {
        self.send_json(self.client.get(self.task_url(id)), "Failed to fetch task")
            .await
    }

    async fn create_task(&self, new_task: &NewTask) -> Result<Task> {
        self.send_json(
            self.client.post(self.tasks_url()).json(new_task),
            "Failed to create task",
        )
        .await
    }

    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task> {
        self.send_json(
            self.client.patch(self.task_url(id)).json(patch),
            "Failed to update task",
        )
        .await
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        // 204 has no body and 200 only carries a confirmation message
        let response =
            checked(self.client.delete(self.task_url(id)), "Failed to delete task").await?;
        debug!(task_id = %id, status = %response.status(), "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use api_server::config::StoreBackend;
    use api_server::state::AppState;
    use taskdesk_core::task::{InMemoryTaskStore, TaskStatus};

    async fn spawn_server(store: InMemoryTaskStore) -> String {
        let state = AppState::with_store(Arc::new(store), StoreBackend::Memory);
        let app = api_server::app(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn api_for(store: InMemoryTaskStore) -> HttpTaskApi {
        let base_url = spawn_server(store).await;
        HttpTaskApi::new(
            ClientConfig::default()
                .with_base_url(base_url)
                .without_proxy(),
        )
    }

    #[tokio::test]
    async fn fetches_a_filtered_page() {
        let api = api_for(InMemoryTaskStore::seeded()).await;

        let page = api
            .fetch_tasks(StatusFilter::Only(TaskStatus::ToDo), 1)
            .await
            .unwrap();
        assert_eq!(page.tasks.len(), 2);
        assert!(page.tasks.iter().all(|t| t.status == TaskStatus::ToDo));
        assert_eq!(page.pagination.limit, DEFAULT_LIMIT);
        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn create_update_delete_round_trip() {
        let api = api_for(InMemoryTaskStore::new()).await;

        let created = api
            .create_task(&NewTask::new("From client").with_description("typed"))
            .await
            .unwrap();
        assert_eq!(api.fetch_task(&created.id).await.unwrap(), created);

        let updated = api
            .update_task(&created.id, &TaskPatch::default().status(TaskStatus::Done))
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, "From client");
        assert_eq!(updated.created_at, created.created_at);

        api.delete_task(&created.id).await.unwrap();
        let err = api.fetch_task(&created.id).await.unwrap_err();
        assert_eq!(err.message, "Failed to fetch task");
        assert!(err.detail.contains("404"));
    }

    #[tokio::test]
    async fn server_side_validation_surfaces_as_client_error() {
        let api = api_for(InMemoryTaskStore::new()).await;

        let err = api.create_task(&NewTask::new("")).await.unwrap_err();
        assert_eq!(err.message, "Failed to create task");
        assert!(err.detail.contains("400"));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_client_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpTaskApi::new(
            ClientConfig::default()
                .with_base_url(format!("http://{}/", addr))
                .without_proxy(),
        );
        let err = api.fetch_tasks(StatusFilter::All, 1).await.unwrap_err();
        assert_eq!(err.message, "Failed to fetch tasks");
    }

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let api = HttpTaskApi::new(ClientConfig::default().with_base_url("http://host:1/api/"));
        assert_eq!(api.tasks_url(), "http://host:1/api/tasks");
        assert_eq!(api.task_url("a b"), "http://host:1/api/tasks/a%20b");
    }
}
