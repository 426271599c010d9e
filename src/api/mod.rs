//! HTTP server: REST facade, OAuth discovery, and the mounted MCP service.

mod handlers;
mod routes;
mod state;

#[cfg(test)]
mod routes_test;

pub use routes::create_router;
pub use state::AppState;

use std::net::IpAddr;

use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::store::TodoStore;

/// Server errors.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("server I/O error: {0}")]
    #[diagnostic(code(todoapp::api::io))]
    Io(#[from] std::io::Error),
}

/// Server configuration.
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".parse().expect("valid literal address"),
            port: 3000,
        }
    }
}

/// Initialize tracing subscriber with env filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todoapp=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the server until ctrl-c.
///
/// Shutdown cancels the MCP service's token first so in-flight sessions
/// terminate before the listener closes.
pub async fn run<S: TodoStore + 'static>(
    config: Config,
    state: AppState<S>,
) -> Result<(), ApiError> {
    init_tracing();

    let shutdown = CancellationToken::new();
    let app = routes::create_router(state, shutdown.clone()).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
            shutdown.cancel();
        })
        .await?;
    Ok(())
}
