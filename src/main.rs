use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mcp_keycloak_server::config::ServerConfig;
use mcp_keycloak_server::handlers::ServerContext;
use mcp_keycloak_server::server::McpServer;

/// Log to stderr; stdout carries protocol traffic. `RUST_LOG` overrides the `info` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let context = match ServerConfig::from_env().and_then(|config| ServerContext::from_config(&config)) {
        Ok(c) => c,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut server = McpServer::new(context);
    info!("Keycloak MCP Server running on stdio");

    if let Err(e) = server.run().await {
        error!("fatal error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
