//! Streamable HTTP service wrapping the MCP handler.

use std::sync::Arc;

use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;

use crate::store::TodoStore;

use super::server::TodoMcp;

/// Create the MCP Streamable HTTP service for nesting into an axum router.
///
/// A fresh [`TodoMcp`] is created per session; all durable state lives in
/// the store behind it. Bearer authentication happens in the surrounding
/// router layer, before requests ever reach this service.
pub fn create_mcp_service<S: TodoStore + 'static>(
    store: Arc<S>,
    cancellation_token: CancellationToken,
) -> StreamableHttpService<TodoMcp<S>, LocalSessionManager> {
    let service_factory = move || -> Result<TodoMcp<S>, std::io::Error> {
        Ok(TodoMcp::new(Arc::clone(&store)))
    };

    let config = StreamableHttpServerConfig::default()
        .with_sse_keep_alive(None)
        .with_sse_retry(None)
        .with_stateful_mode(true)
        .with_cancellation_token(cancellation_token);

    StreamableHttpService::new(
        service_factory,
        LocalSessionManager::default().into(),
        config,
    )
}
