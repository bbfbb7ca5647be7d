use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pmhub_migrate::config::{MigrateConfig, DEFAULT_CONFIG_PATH};
use pmhub_migrate::driver;
use pmhub_migrate::error::MigrateError;

/// Migrate a legacy zentao database into the project hub.
#[derive(Debug, Parser)]
#[command(name = "pmhub-migrate", version)]
struct Cli {
    /// Path to the YAML migration config.
    #[arg(long, short, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pmhub_migrate=info,pmhub_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // --- Configuration ---
    let config = MigrateConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let backend = config.target.backend()?;
    tracing::info!(config = %cli.config.display(), target = %backend, "Loaded migration configuration");

    // --- Legacy store ---
    let legacy = pmhub_db::create_pool(&config.legacy.connection_url()?)
        .await
        .map_err(MigrateError::connect("legacy"))?;
    pmhub_db::health_check(&legacy)
        .await
        .map_err(MigrateError::connect("legacy"))?;
    tracing::info!("Connected to legacy store");

    // --- Target store ---
    let target = pmhub_db::create_pool(&config.target.connection_url()?)
        .await
        .map_err(MigrateError::connect("target"))?;
    pmhub_db::health_check(&target)
        .await
        .map_err(MigrateError::connect("target"))?;
    pmhub_db::run_migrations(&target, backend)
        .await
        .map_err(MigrateError::Schema)?;
    tracing::info!("Target schema applied");

    let summary = driver::run(&legacy, &target).await?;
    if summary.total_failed() > 0 {
        tracing::warn!(
            failed = summary.total_failed(),
            "Some rows failed to migrate; see the errors above",
        );
    }
    tracing::warn!("Migrated users share the default password; force a reset on first login");
    Ok(())
}
