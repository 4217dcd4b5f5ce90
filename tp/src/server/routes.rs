//! Request handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use taskstore::{NewTask, Task, TaskId};
use tracing::{debug, info};

use super::AppState;
use super::error::ApiError;
use crate::domain::TaskRecord;
use crate::state::StateError;

/// Liveness reply for `GET /api/tasks/test`
pub const LIVENESS: &str = "Controller is working!";

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub goal: Option<String>,
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        debug!(rejection = %rejection.body_text(), "json_body: rejected");
        ApiError::BadRequest(rejection.body_text())
    })
}

/// Read the generate body; an absent or whitespace-only body carries no goal
fn generate_body(body: &[u8]) -> Result<GenerateBody, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        debug!("generate_body: empty body");
        return Ok(GenerateBody { goal: None });
    }
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "generate_body: rejected");
        ApiError::BadRequest(format!("Failed to parse the request body as JSON: {}", e))
    })
}

pub async fn generate_tasks(State(state): State<AppState>, body: Bytes) -> Result<Json<Vec<TaskRecord>>, ApiError> {
    debug!(body_len = body.len(), "generate_tasks: called");
    let goal = generate_body(&body)?.goal.unwrap_or_default();

    let tasks = state.generator.generate_tasks(&goal).await?;
    info!(count = tasks.len(), "Returning generated tasks");
    Ok(Json(tasks))
}

pub async fn liveness() -> &'static str {
    LIVENESS
}

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    debug!("list_tasks: called");
    Ok(Json(state.store.list_tasks().await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    debug!("create_task: called");
    let task = state.store.create_task(json_body(body)?).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(State(state): State<AppState>, Path(id): Path<TaskId>) -> Result<Json<Task>, ApiError> {
    debug!(%id, "get_task: called");
    state
        .store
        .get_task(id)
        .await?
        .map(Json)
        .ok_or_else(|| StateError::NotFound(id).into())
}

pub async fn delete_task(State(state): State<AppState>, Path(id): Path<TaskId>) -> Result<StatusCode, ApiError> {
    debug!(%id, "delete_task: called");
    state.store.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
