//! MCP server handler for the todo domain.

use std::sync::Arc;

use axum::http::request::Parts;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars,
    schemars::JsonSchema,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::BearerPrincipal;
use crate::store::{StoreError, Todo, TodoStore};

/// URI prefix under which todos are addressable.
const TODO_URI_PREFIX: &str = "todoapp://todos/";
/// Advertised resource template.
const TODO_URI_TEMPLATE: &str = "todoapp://todos/{id}";

// =============================================================================
// Parameter Structs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTodoParams {
    #[serde(rename = "todoText")]
    #[schemars(description = "Text of the TODO task to add")]
    pub todo_text: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MarkTodoCompleteParams {
    #[serde(rename = "todoID")]
    #[schemars(description = "ID of the TODO to mark as complete")]
    pub todo_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteTodoParams {
    #[serde(rename = "todoID")]
    #[schemars(description = "ID of the TODO to delete")]
    pub todo_id: String,
}

// =============================================================================
// Server
// =============================================================================

/// MCP handler over a [`TodoStore`].
///
/// Generic over the store (no dynamic dispatch). Instances are created per
/// session and hold no state of their own; recreating one loses nothing.
#[derive(Clone)]
pub struct TodoMcp<S: TodoStore> {
    store: Arc<S>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl<S: TodoStore + 'static> TodoMcp<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(name = "createTodo", description = "Add a new TODO task")]
    pub async fn create_todo(
        &self,
        params: Parameters<CreateTodoParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let principal = bearer_principal(&context)?;
        self.create_for(principal.user_id(), &params.0.todo_text)
            .await
    }

    #[tool(name = "markTodoComplete", description = "Mark a TODO as complete")]
    pub async fn mark_todo_complete(
        &self,
        params: Parameters<MarkTodoCompleteParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let principal = bearer_principal(&context)?;
        self.complete_for(principal.user_id(), &params.0.todo_id)
            .await
    }

    #[tool(name = "deleteTodo", description = "Mark a TODO as deleted")]
    pub async fn delete_todo(
        &self,
        params: Parameters<DeleteTodoParams>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let principal = bearer_principal(&context)?;
        self.remove_for(principal.user_id(), &params.0.todo_id).await
    }

    // Domain operations, separated from principal plumbing.

    pub(crate) async fn create_for(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<CallToolResult, McpError> {
        let todos = self
            .store
            .add(user_id, text)
            .await
            .map_err(map_store_error)?;
        Ok(success_envelope("TODO added successfully", &todos))
    }

    pub(crate) async fn complete_for(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<CallToolResult, McpError> {
        let todos = self
            .store
            .mark_completed(user_id, id)
            .await
            .map_err(map_store_error)?;
        Ok(success_envelope("TODO completed successfully", &todos))
    }

    pub(crate) async fn remove_for(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<CallToolResult, McpError> {
        let todos = self
            .store
            .delete(user_id, id)
            .await
            .map_err(map_store_error)?;
        Ok(success_envelope("TODO deleted successfully", &todos))
    }

    /// Lightweight descriptors for every todo the user owns.
    pub(crate) async fn todo_descriptors(&self, user_id: &str) -> Result<Vec<Resource>, McpError> {
        let todos = self.store.get(user_id).await.map_err(map_store_error)?;
        Ok(todos
            .iter()
            .map(|todo| {
                RawResource::new(format!("{TODO_URI_PREFIX}{}", todo.id), todo.text.clone())
                    .no_annotation()
            })
            .collect())
    }

    /// Human-readable projection of one todo.
    ///
    /// An unknown id yields the literal sentinel "NOT FOUND" inside a
    /// successful read rather than a protocol error; agent clients treat
    /// the sentinel as the not-found signal.
    pub(crate) async fn todo_projection(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<String, McpError> {
        let todos = self.store.get(user_id).await.map_err(map_store_error)?;
        Ok(todos
            .iter()
            .find(|todo| todo.id == id)
            .map(|todo| format!("text: {} completed: {}", todo.text, todo.completed))
            .unwrap_or_else(|| "NOT FOUND".to_string()))
    }
}

#[tool_handler]
impl<S: TodoStore + 'static> ServerHandler for TodoMcp<S> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(
            ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
        )
        .with_instructions(
            "TODO Service - read the authenticated user's todos as resources, \
             mutate them with the createTodo, markTodoComplete and deleteTodo tools",
        )
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let principal = bearer_principal(&context)?;
        let resources = self.todo_descriptors(principal.user_id()).await?;
        Ok(ListResourcesResult {
            meta: None,
            resources,
            next_cursor: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        todo_resource_templates()
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let principal = bearer_principal(&context)?;
        let Some(id) = todo_id_from_uri(&request.uri) else {
            return Err(McpError::resource_not_found(
                "unknown_resource",
                Some(json!({ "uri": request.uri })),
            ));
        };
        let text = self.todo_projection(principal.user_id(), id).await?;
        Ok(ReadResourceResult::new(vec![ResourceContents::text(
            text,
            request.uri,
        )]))
    }
}

/// Extract the todo id from a `todoapp://todos/{id}` URI. URIs outside the
/// advertised template yield `None`.
pub(crate) fn todo_id_from_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix(TODO_URI_PREFIX)
}

/// The bearer principal threaded through the HTTP layer for this request.
fn bearer_principal(context: &RequestContext<RoleServer>) -> Result<BearerPrincipal, McpError> {
    principal_from_extensions(&context.extensions).ok_or_else(|| {
        McpError::invalid_request("Missing or invalid access token", None)
    })
}

/// Look the principal up in a request's extension map. The transport layer
/// may surface the middleware's insertion either directly or wrapped in the
/// original request [`Parts`].
pub(crate) fn principal_from_extensions(extensions: &Extensions) -> Option<BearerPrincipal> {
    if let Some(principal) = extensions.get::<BearerPrincipal>() {
        return Some(principal.clone());
    }
    extensions
        .get::<Parts>()
        .and_then(|parts| parts.extensions.get::<BearerPrincipal>())
        .cloned()
}

/// Uniform tool response: a success preamble plus the full new list state,
/// readable by humans and parseable by agents.
fn success_envelope(description: &str, todos: &[Todo]) -> CallToolResult {
    let state = serde_json::to_string_pretty(todos).expect("todo list serializes");
    CallToolResult::success(vec![Content::text(format!(
        "Success! {description}\n\nNew state:\n{state}"
    ))])
}

fn map_store_error(error: StoreError) -> McpError {
    McpError::internal_error(
        "store_failure",
        Some(json!({ "error": error.to_string() })),
    )
}

/// The single advertised template. Built from its wire form so the shape
/// is exactly what clients see in `resources/templates/list`.
pub(crate) fn todo_resource_templates() -> Result<ListResourceTemplatesResult, McpError> {
    serde_json::from_value(json!({
        "resourceTemplates": [{
            "uriTemplate": TODO_URI_TEMPLATE,
            "name": "Todos",
            "description": "Todo items owned by the authenticated user",
            "mimeType": "text/plain",
        }]
    }))
    .map_err(|error| {
        McpError::internal_error("template_listing", Some(json!({ "error": error.to_string() })))
    })
}
