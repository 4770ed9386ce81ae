use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polling_services::config::PollingConfig;
use polling_services::scheduler::SyncScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polling_services=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting week relay polling services");

    // Load configuration
    dotenv::dotenv().ok();
    let config = PollingConfig::from_env()?;

    let pipeline = Arc::new(polling_services::build_pipeline(&config).await?);
    let scheduler = SyncScheduler::new(
        pipeline,
        Duration::from_secs(config.sync_interval_seconds),
    );

    let scheduler_handle = tokio::spawn(async move { scheduler.run().await });

    // Wait for shutdown signal
    tracing::info!("Polling services running. Press Ctrl+C to stop.");
    signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping...");

    scheduler_handle.abort();

    tracing::info!("Polling services stopped");
    Ok(())
}
