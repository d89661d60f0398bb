use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use movies_api::{AppState, config::ServiceConfig, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting movies API service");

    let config = ServiceConfig::from_env()?;
    let app_state = AppState::from_config(&config).await?;

    info!("Movies API service initialized successfully");

    // Start the web server
    let app = create_router(app_state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Movies API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
