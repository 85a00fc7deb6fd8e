//! Elidune Lending - overdue sweep daemon
//!
//! Loads the lending configuration, seeds the in-memory catalog and marks loans
//! overdue on a fixed schedule until interrupted.

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elidune_lending::{config::AppConfig, models::CatalogSeed, Repository, Services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("elidune_lending={}", config.logging.level).into());
    let json = config.logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting Elidune Lending v{}", env!("CARGO_PKG_VERSION"));

    let repository = Repository::new(config.loan_policy());

    if let Some(path) = &config.sweep.seed_file {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read seed file {}", path))?;
        let catalog = CatalogSeed::from_json(&raw)
            .with_context(|| format!("Invalid seed file {}", path))?;
        repository
            .seed(&catalog)
            .with_context(|| format!("Failed to seed catalog from {}", path))?;
    }

    let services = Services::new(repository);
    let period = Duration::from_secs(config.sweep.interval_secs);

    tracing::info!("Overdue sweep every {:?}", period);

    services
        .overdue
        .run(period, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
            }
        })
        .await?;

    Ok(())
}
