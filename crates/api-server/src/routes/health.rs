//! Health check endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    version: String,
    backend: String,
    task_count: usize,
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let mut response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.backend().as_str().to_string(),
        task_count: 0,
    };

    match state.task_store().count().await {
        Ok(count) => {
            response.task_count = count;
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            response.status = "error".to_string();
            Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
