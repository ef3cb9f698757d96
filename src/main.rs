use clap::Parser;
use tracing_subscriber::EnvFilter;

use company_employees::cli::{self, Cli};
use company_employees::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let cli = Cli::parse();
    let config = config::config().clone();
    tracing::info!("Starting company-employees-api in {:?} mode", config.environment);

    if let Err(e) = cli::run(cli, config).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
