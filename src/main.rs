use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use wiso_translator::{config::Config, server, Resolver};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wiso_translator=info".parse()?),
        )
        .init();

    info!("Starting WISO translator");

    // Load configuration from environment
    let config = Config::from_env()?;

    let client = reqwest::Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    let resolver = Resolver::from_config(client, &config);
    info!(
        "Using {} translation endpoints (timeout {:?})",
        resolver.endpoints().len(),
        config.provider_timeout
    );

    let shutdown = CancellationToken::new();
    let state = Arc::new(server::AppState {
        resolver,
        batch: config.batch_options(),
        max_text_chars: config.max_text_chars,
        shutdown: shutdown.clone(),
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(server::shutdown_on(tokio::signal::ctrl_c(), shutdown))
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}
