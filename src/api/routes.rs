//! Route configuration.

use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::auth::{bearer_auth, session_auth};
use crate::mcp::create_mcp_service;
use crate::store::TodoStore;

use super::handlers::{
    self, CreateTodoRequest, ErrorResponse, HealthResponse, TodoListResponse, TodoResponse,
};
use super::state::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TODO Service API",
        version = "0.1.0",
        description = "Per-user TODO list over REST, consumed by the browser frontend",
        license(name = "MIT")
    ),
    paths(
        handlers::health,
        handlers::oauth_metadata,
        handlers::list_todos,
        handlers::create_todo,
        handlers::complete_todo,
        handlers::delete_todo,
    ),
    components(
        schemas(
            HealthResponse,
            TodoResponse,
            TodoListResponse,
            CreateTodoRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "Health and OAuth discovery endpoints"),
        (name = "todos", description = "Session-authenticated todo operations")
    )
)]
pub struct ApiDoc;

/// Assemble the full application router.
///
/// `/api` is guarded by the session-cookie middleware, `/sse` (the MCP
/// service) by the bearer middleware; discovery and health are public.
pub fn create_router<S: TodoStore + 'static>(
    state: AppState<S>,
    shutdown: CancellationToken,
) -> Router {
    let api = ApiDoc::openapi();

    let todo_routes = Router::new()
        .route(
            "/todos",
            get(handlers::list_todos::<S>).post(handlers::create_todo::<S>),
        )
        .route("/todos/{id}/complete", post(handlers::complete_todo::<S>))
        .route("/todos/{id}", delete(handlers::delete_todo::<S>))
        .layer(middleware::from_fn_with_state(
            state.auth_arc(),
            session_auth,
        ))
        .with_state(state.clone());

    let mcp_routes = Router::new()
        .nest_service("/sse", create_mcp_service(state.store_arc(), shutdown))
        .layer(middleware::from_fn_with_state(state.auth_arc(), bearer_auth));

    let system_routes = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/.well-known/oauth-authorization-server",
            get(handlers::oauth_metadata::<S>),
        )
        .with_state(state);

    system_routes
        .nest("/api", todo_routes)
        .merge(mcp_routes)
        .merge(Scalar::with_url("/docs", api))
        .layer(CorsLayer::permissive())
}
