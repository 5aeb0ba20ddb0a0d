//! movistore-server — MoviStore e-commerce REST backend
//!
//! Long-running service that:
//! - Serves the public catalog (products, categories, stores)
//! - Handles account registration and JWT login
//! - Places orders through a stock-checked transaction
//! - Exposes an admin surface for catalog, order, and user management

mod api;
mod auth;
mod config;
mod db;
mod error;
mod models;
mod state;
mod upload;
mod util;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movistore_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting movistore-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("movistore-server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
