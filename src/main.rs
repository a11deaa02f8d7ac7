use anyhow::Result;
use rmcp::ServiceExt;
use tracing_subscriber::{self, EnvFilter};

use payoff_mcp::config::ServerConfig;
use payoff_mcp::server::{self, PayoffServer};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(
        default_lot_size = config.default_lot_size,
        sample_points = config.sample_points,
        cache_capacity = config.cache_capacity,
        "loaded configuration"
    );
    let port = config.port;
    let server = PayoffServer::synthetic(config);

    if let Some(port) = port {
        // HTTP mode for hosted deployments
        let app = server::http_app(server);
        let addr = format!("0.0.0.0:{port}");
        tracing::info!("Starting payoff-mcp HTTP server on {addr}");

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
    } else {
        // stdio mode for local MCP clients
        tracing::info!("Starting payoff-mcp MCP server (stdio)");

        let service = server.serve(rmcp::transport::stdio()).await?;
        service.waiting().await?;
    }

    Ok(())
}
