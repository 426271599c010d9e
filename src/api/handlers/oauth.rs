//! OAuth Authorization Server discovery metadata.
//!
//! Served for Dynamic Client Registration by MCP clients. The authorization
//! screen lives in the frontend; token and registration endpoints are the
//! identity provider's own.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use crate::api::AppState;
use crate::store::TodoStore;

/// OAuth Authorization Server metadata (RFC 8414)
#[utoipa::path(
    get,
    path = "/.well-known/oauth-authorization-server",
    tag = "system",
    responses(
        (status = 200, description = "Authorization server metadata")
    )
)]
#[instrument(skip(state))]
pub async fn oauth_metadata<S: TodoStore>(State(state): State<AppState<S>>) -> Json<Value> {
    let config = state.config();
    Json(json!({
        "issuer": config.project_id,
        "authorization_endpoint": format!("{}/oauth/authorize", config.public_origin),
        "token_endpoint": config.oauth_endpoint_url("oauth2/token"),
        "registration_endpoint": config.oauth_endpoint_url("oauth2/register"),
        "scopes_supported": ["openid", "profile", "email", "offline_access"],
        "response_types_supported": ["code"],
        "response_modes_supported": ["query"],
        "grant_types_supported": ["authorization_code", "refresh_token"],
        "token_endpoint_auth_methods_supported": ["none"],
        "code_challenge_methods_supported": ["S256"],
    }))
}
