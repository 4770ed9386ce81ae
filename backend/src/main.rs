mod config;
mod error;
mod handlers;
mod routes;
mod state;

use anyhow::Result;
use axum::Router;
use polling_services::scheduler::SyncScheduler;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::routes::api_routes;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "backend=debug,polling_services=debug,tower_http=debug,axum=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = AppConfig::from_env()?;

    tracing::info!("Starting week relay backend server");

    let pipeline = Arc::new(polling_services::build_pipeline(&config.polling).await?);

    if config.enable_scheduler {
        let scheduler = SyncScheduler::new(
            pipeline.clone(),
            Duration::from_secs(config.polling.sync_interval_seconds),
        );
        tokio::spawn(async move { scheduler.run().await });
        tracing::info!(
            "Periodic sync enabled every {}s",
            config.polling.sync_interval_seconds
        );
    }

    // Build application
    let app = create_app(AppState::new(pipeline));

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
