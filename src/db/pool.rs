use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;
use crate::db::store::StoreError;

/// Process-wide connection pool. All tenants share one database; isolation
/// is a `gym_id` column enforced by `GymStore`, not separate databases.
pub struct Db;

static POOL: OnceLock<OnceCell<PgPool>> = OnceLock::new();

impl Db {
    pub async fn pool() -> Result<PgPool, StoreError> {
        let cell = POOL.get_or_init(OnceCell::new);
        let pool = cell
            .get_or_try_init(|| async {
                let url = std::env::var("DATABASE_URL")
                    .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;
                let cfg = &config::config().database;
                let pool = PgPoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .acquire_timeout(Duration::from_secs(cfg.connection_timeout))
                    .connect(&url)
                    .await?;
                info!("Created database pool");
                Ok::<_, StoreError>(pool)
            })
            .await?;
        Ok(pool.clone())
    }

    /// Pings the pool to ensure connectivity.
    pub async fn health_check() -> Result<(), StoreError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }
}
