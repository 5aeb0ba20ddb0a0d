//! Application state for movistore-server

use sqlx::PgPool;
use std::path::PathBuf;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT secret for user authentication
    pub jwt_secret: String,
    /// Directory where uploaded product images live
    pub image_dir: PathBuf,
}

impl AppState {
    /// Create a new AppState: connect the pool, run migrations, prepare the image dir
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let image_dir = PathBuf::from(&config.image_dir);
        std::fs::create_dir_all(&image_dir)?;

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            image_dir,
        })
    }
}
