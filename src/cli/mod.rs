use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::router::create_router;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "company-employees-api")]
#[command(about = "Companies and employees REST API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, env = "API_HOST", help = "Address to bind")]
        host: Option<String>,

        #[arg(long, env = "API_PORT", help = "Port to listen on")]
        port: Option<u16>,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli, mut config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.api.host = host;
            }
            if let Some(port) = port {
                config.api.port = port;
            }
            serve(config).await
        }
        Commands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    if config.security.jwt.secret.is_empty() {
        anyhow::bail!("SECRET must be set outside the development profile");
    }
    if crate::is_development!(config) {
        tracing::warn!("Development profile: built-in JWT secret unless SECRET is set, rate limiting off");
    }

    // Lazy so the server starts (and /health reports 503) while the database is down
    let pool = DatabaseManager::connect_lazy(&config.database)?;
    if config.database.run_migrations {
        if let Err(e) = DatabaseManager::migrate(&pool).await {
            tracing::warn!("Skipping migrations, database unavailable: {}", e);
        }
    }

    let bind_addr = format!("{}:{}", config.api.host, config.api.port);
    let app = create_router(AppState::postgres(config, pool));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
