//! API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::api::AppState;
use crate::error::Error;
use crate::types::{CreateTodo, TodoItem, TodoPatch};

/// Map the crate error taxonomy onto HTTP status codes.
fn error_response(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "Request failed");
    } else {
        tracing::debug!(error = %err, "Request rejected");
    }

    (status, err.to_string())
}

/// Health check with system status
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, String)> {
    let todos = state.store.count().await.map_err(error_response)?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        todos,
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub todos: i64,
}

/// Create a todo; the store assigns the id.
pub async fn create_todo(
    State(state): State<AppState>,
    Json(payload): Json<CreateTodo>,
) -> Result<Json<TodoItem>, (StatusCode, String)> {
    let item = state.store.insert(payload).await.map_err(error_response)?;

    tracing::info!(id = item.id, "Created todo");

    Ok(Json(item))
}

/// List every todo, id ascending.
pub async fn list_todos(
    State(state): State<AppState>,
) -> Result<Json<Vec<TodoItem>>, (StatusCode, String)> {
    let items = state.store.list().await.map_err(error_response)?;

    Ok(Json(items))
}

/// Apply a partial patch to an existing todo.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TodoPatch>,
) -> Result<Json<TodoItem>, (StatusCode, String)> {
    let item = state
        .store
        .update(id, payload)
        .await
        .map_err(error_response)?;

    tracing::info!(id, "Updated todo");

    Ok(Json(item))
}

/// Delete a todo and return its last persisted state.
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TodoItem>, (StatusCode, String)> {
    let item = state.store.delete(id).await.map_err(error_response)?;

    tracing::info!(id, "Deleted todo");

    Ok(Json(item))
}
