//! Todo list handlers.
//!
//! All four operations require a session principal established by the
//! cookie middleware and respond with the entire post-operation list, so
//! the frontend always reconciles to latest state instead of patching.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::auth::SessionPrincipal;
use crate::store::{StoreError, Todo, TodoStore};

use super::ErrorResponse;

// =============================================================================
// DTOs
// =============================================================================

/// Todo response DTO
#[derive(Serialize, ToSchema)]
pub struct TodoResponse {
    /// Server-generated identifier
    #[schema(example = "0193a1f2-7b5c-7f7e-9d8a-2f4b6c8d0e1a")]
    pub id: String,
    #[schema(example = "Buy milk")]
    pub text: String,
    pub completed: bool,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            text: todo.text,
            completed: todo.completed,
        }
    }
}

/// Full-list response returned by every todo operation
#[derive(Serialize, ToSchema)]
pub struct TodoListResponse {
    pub todos: Vec<TodoResponse>,
}

impl TodoListResponse {
    fn from_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: todos.into_iter().map(TodoResponse::from).collect(),
        }
    }
}

/// Create todo request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// Text of the todo to append
    #[serde(rename = "todoText")]
    #[schema(example = "Buy milk")]
    pub todo_text: String,
}

fn internal_error(error: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// List the authenticated user's todos
#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "todos",
    responses(
        (status = 200, description = "Current todo list", body = TodoListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[instrument(skip(state, principal), fields(user_id = %principal.user_id))]
pub async fn list_todos<S: TodoStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<SessionPrincipal>,
) -> Result<Json<TodoListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let todos = state
        .store()
        .get(&principal.user_id)
        .await
        .map_err(internal_error)?;
    Ok(Json(TodoListResponse::from_todos(todos)))
}

/// Append a new todo
#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 200, description = "Updated todo list", body = TodoListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[instrument(skip(state, principal, request), fields(user_id = %principal.user_id))]
pub async fn create_todo<S: TodoStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<SessionPrincipal>,
    Json(request): Json<CreateTodoRequest>,
) -> Result<Json<TodoListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let todos = state
        .store()
        .add(&principal.user_id, &request.todo_text)
        .await
        .map_err(internal_error)?;
    Ok(Json(TodoListResponse::from_todos(todos)))
}

/// Mark a todo as complete. Unknown ids are a no-op.
#[utoipa::path(
    post,
    path = "/api/todos/{id}/complete",
    tag = "todos",
    params(
        ("id" = String, Path, description = "Todo ID")
    ),
    responses(
        (status = 200, description = "Updated todo list", body = TodoListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[instrument(skip(state, principal), fields(user_id = %principal.user_id))]
pub async fn complete_todo<S: TodoStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<SessionPrincipal>,
    Path(id): Path<String>,
) -> Result<Json<TodoListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let todos = state
        .store()
        .mark_completed(&principal.user_id, &id)
        .await
        .map_err(internal_error)?;
    Ok(Json(TodoListResponse::from_todos(todos)))
}

/// Delete a todo. Unknown ids are a no-op, so the call is idempotent.
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "todos",
    params(
        ("id" = String, Path, description = "Todo ID")
    ),
    responses(
        (status = 200, description = "Updated todo list", body = TodoListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[instrument(skip(state, principal), fields(user_id = %principal.user_id))]
pub async fn delete_todo<S: TodoStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<SessionPrincipal>,
    Path(id): Path<String>,
) -> Result<Json<TodoListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let todos = state
        .store()
        .delete(&principal.user_id, &id)
        .await
        .map_err(internal_error)?;
    Ok(Json(TodoListResponse::from_todos(todos)))
}
