//! TODO service binary.
//!
//! Wires the concrete in-memory store and the auth gate together and
//! hands them to the server. The HTTP layer stays agnostic of both.

use std::net::IpAddr;

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;

use todoapp::api::{self, ApiError, AppState, Config};
use todoapp::auth::{AuthConfig, AuthError, AuthGate};
use todoapp::config::AppConfig;
use todoapp::store::MemoryStore;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Auth setup error: {0}")]
    #[diagnostic(code(todoapp::binary::auth))]
    Auth(#[from] AuthError),

    #[error("Server error: {0}")]
    #[diagnostic(code(todoapp::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "todoapp")]
#[command(author, version, about = "TODO service with REST and MCP facades", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Stytch project id; selects the test or live provider environment
    /// by naming convention and doubles as the expected JWT audience
    #[arg(long, env = "STYTCH_PROJECT_ID")]
    project_id: String,

    /// Origin this service is reachable at, used in OAuth discovery metadata
    #[arg(long, env = "PUBLIC_ORIGIN", default_value = "http://localhost:3000")]
    public_origin: String,
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    let cli = Cli::parse();

    let app_config = AppConfig::new(cli.project_id, cli.public_origin);
    let gate = AuthGate::new(AuthConfig::for_project(&app_config))?;
    let state = AppState::new(MemoryStore::new(), gate, app_config);

    api::run(
        Config {
            host: cli.host,
            port: cli.port,
        },
        state,
    )
    .await?;

    Ok(())
}
