//! Authentication against the Stytch identity provider.
//!
//! Two credential forms carry the same kind of RS256 JWT:
//!
//! - the `stytch_session_jwt` cookie set by the frontend SDK, and
//! - the `Authorization: Bearer` token issued at the end of an OAuth flow.
//!
//! Both go through one verification routine on [`AuthGate`]; only the
//! credential-extraction strategy and the client-facing 401 message differ
//! between the two middleware layers. Verification failure causes are
//! logged server-side and never echoed to clients.

mod claims;
mod gate;
mod middleware;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::Claims;
pub use gate::{AuthConfig, AuthGate, RefreshPolicy};
pub use middleware::{SESSION_COOKIE, bearer_auth, session_auth};

use miette::Diagnostic;
use thiserror::Error;

/// Authentication errors. All of them collapse to HTTP 401 at the facade.
#[derive(Error, Diagnostic, Debug)]
pub enum AuthError {
    #[error("token header carries no key id")]
    #[diagnostic(code(todoapp::auth::missing_kid))]
    MissingKeyId,

    #[error("no key '{kid}' in the cached key set")]
    #[diagnostic(code(todoapp::auth::unknown_key))]
    UnknownKey { kid: String },

    #[error("token is not signed with RS256")]
    #[diagnostic(code(todoapp::auth::wrong_algorithm))]
    WrongAlgorithm,

    #[error("token type is not JWT")]
    #[diagnostic(code(todoapp::auth::wrong_type))]
    WrongType,

    #[error("token verification failed: {0}")]
    #[diagnostic(code(todoapp::auth::verification))]
    Verification(#[from] jsonwebtoken::errors::Error),

    #[error("remote key set unavailable: {0}")]
    #[diagnostic(code(todoapp::auth::key_fetch))]
    KeyFetch(#[from] reqwest::Error),
}

/// Identity established from a session cookie.
#[derive(Debug, Clone)]
pub struct SessionPrincipal {
    /// Subject claim of the cookie JWT.
    pub user_id: String,
}

/// Identity established from a bearer token, kept for the whole connection.
#[derive(Debug, Clone)]
pub struct BearerPrincipal {
    /// Verified claim set of the bearer JWT.
    pub claims: Claims,
    /// The raw token, available for downstream calls on the user's behalf.
    pub access_token: String,
}

impl BearerPrincipal {
    /// The store partition key for this principal.
    pub fn user_id(&self) -> &str {
        &self.claims.sub
    }
}
