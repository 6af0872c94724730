use clap::Parser;
use recipe_article::{
    api::{create_router, AppState},
    cli::{Cli, Commands},
    config::{ServiceMode, Settings},
    Error, Result,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recipe_article=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, mode } => {
            let settings = Settings::from_env()?;
            serve(settings, port, host, mode).await?;
        }
        Commands::Query { query, server } => {
            recipe_article::cli::commands::query(&server, &query).await?;
        }
    }

    Ok(())
}

async fn serve(
    mut settings: Settings,
    port: Option<u16>,
    host: Option<String>,
    mode: Option<ServiceMode>,
) -> Result<()> {
    // Override settings with CLI arguments
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(mode) = mode {
        settings.mode = mode;
    }
    settings.validate()?;

    info!("Starting recipe article server");
    info!("Mode: {:?}", settings.mode);
    info!("Model: {}", settings.openai.model);
    if settings.mode == ServiceMode::Full {
        info!(
            "Recipe database: {:?} + {:?} (loaded on first query)",
            settings.retrieval.embeddings_path, settings.retrieval.index_path
        );
    }

    let state = AppState::from_settings(settings.clone())?;
    let app = create_router(state, &settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
