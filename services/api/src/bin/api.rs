//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{InMemoryRepository, JsonFileRepository},
    config::{Cli, Config, StorageBackend},
    error::ApiError,
    web::{router, state::AppState},
};
use clap::Parser;
use schedule_core::{ScheduleRepository, ScheduleStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let cli = Cli::parse();
    let config = Config::from_env(&cli)?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Choose the Storage Adapter & Load the Schedule ---
    let repository: Arc<dyn ScheduleRepository> = match config.storage {
        StorageBackend::File => {
            info!("Using schedule file {}", config.schedule_file.display());
            Arc::new(JsonFileRepository::new(&config.schedule_file))
        }
        StorageBackend::Memory => {
            info!("Using in-memory schedule storage; changes will not survive a restart");
            Arc::new(InMemoryRepository::new())
        }
    };
    let store = ScheduleStore::load(repository).await?;

    // --- 3. Build the Shared AppState & Router ---
    let app_state = Arc::new(AppState::new(store));
    let app = router(app_state);

    // --- 4. Start the Server ---
    info!("Starting Youth Conference Schedule API on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
