//! Request handlers for tasks and subtasks.
//!
//! Thin translation from HTTP to the repository: extract path and body,
//! call the matching database operation, map the result to a payload and
//! status code. Error mapping lives in [`crate::error::ApiError`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use super::ApiServer;
use crate::error::{ApiError, ApiResult};
use crate::types::{NewTask, Task, TaskUpdate};

/// Response body for the toggle endpoints.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: i64,
    pub completed: bool,
}

/// Response body for task deletion.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub id: i64,
}

pub async fn list_tasks(State(state): State<ApiServer>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state.db().list_tasks()?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<ApiServer>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = state
        .db()
        .get_task(id)?
        .ok_or_else(|| ApiError::task_not_found(id))?;
    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<ApiServer>,
    Json(draft): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = state.db().create_task(draft)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<ApiServer>,
    Path(id): Path<i64>,
    Json(update): Json<TaskUpdate>,
) -> ApiResult<Json<Task>> {
    let task = state.db().update_task(id, update)?;
    Ok(Json(task))
}

pub async fn toggle_task(
    State(state): State<ApiServer>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ToggleResponse>> {
    let completed = state.db().toggle_task(id)?;
    Ok(Json(ToggleResponse { id, completed }))
}

pub async fn toggle_subtask(
    State(state): State<ApiServer>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ToggleResponse>> {
    let completed = state.db().toggle_subtask(id)?;
    Ok(Json(ToggleResponse { id, completed }))
}

pub async fn delete_task(
    State(state): State<ApiServer>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    state.db().delete_task(id)?;
    Ok(Json(DeleteResponse {
        message: "Task deleted",
        id,
    }))
}
