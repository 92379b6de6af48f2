use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use voting_gateway::config::GatewayConfig;
use voting_gateway::gateway::api::VotesGateway;
use voting_gateway::gateway::handlers::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        eprintln!(
            "Usage: {} [--bind <addr:port>] [--service <name>] [--proxy <host>] \
             [--data-path <path>] [--cluster <endpoint>] [--partitions <lo-hi,...>]",
            args[0]
        );
        eprintln!(
            "Example: {} --bind 127.0.0.1:8080 --partitions 0-12,13-25",
            args[0]
        );
        return Ok(());
    }

    let config = GatewayConfig::from_env()?.apply_args(&args[1..])?;

    tracing::info!("Starting votes gateway on {}", config.bind_addr);
    tracing::info!("Backend service: {}", config.service);
    tracing::info!("Reverse proxy: {}", config.proxy_host);

    let gateway = Arc::new(VotesGateway::from_config(&config)?);
    let app = routes(gateway);

    tracing::info!("HTTP server listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
