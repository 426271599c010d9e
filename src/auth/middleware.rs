//! Axum middleware for the two credential paths.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::CookieJar;
use serde_json::json;
use tracing::warn;

use super::{AuthGate, BearerPrincipal, SessionPrincipal};

/// Session cookie set by the Stytch frontend SDK.
pub const SESSION_COOKIE: &str = "stytch_session_jwt";

/// Guard for the REST facade: validates the session cookie and threads a
/// [`SessionPrincipal`] through the request extensions.
///
/// Missing cookie and every verification failure collapse to the same 401;
/// the raw cause is only logged.
pub async fn session_auth(
    State(gate): State<Arc<AuthGate>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        warn!("request without session cookie");
        return unauthenticated("Unauthenticated");
    };

    match gate.verify_token(cookie.value()).await {
        Ok(claims) => {
            request
                .extensions_mut()
                .insert(SessionPrincipal { user_id: claims.sub });
            next.run(request).await
        }
        Err(error) => {
            warn!(%error, "session JWT rejected");
            unauthenticated("Unauthenticated")
        }
    }
}

/// Guard for the MCP endpoint: validates the `Authorization` header and
/// threads a [`BearerPrincipal`] through the request extensions, where it
/// stays available to every call on the connection.
pub async fn bearer_auth(
    State(gate): State<Arc<AuthGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        warn!("request without bearer token");
        return unauthenticated("Missing or invalid access token");
    };

    match gate.verify_token(&token).await {
        Ok(claims) => {
            request.extensions_mut().insert(BearerPrincipal {
                claims,
                access_token: token,
            });
            next.run(request).await
        }
        Err(error) => {
            warn!(%error, "bearer token rejected");
            unauthenticated("Unauthenticated")
        }
    }
}

fn unauthenticated(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}
