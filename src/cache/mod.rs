//! Expiring key-value storage for short-lived secrets (registration OTPs).
//! Backed by the database rather than an in-process map so values survive
//! restarts and are shared across instances.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::db::store::StoreError;

#[async_trait]
pub trait ExpiringStore: Send + Sync {
    /// Stores `value` under `key` for `ttl_secs`, replacing any prior value.
    async fn put(&self, key: &str, value: &str, ttl_secs: i64) -> Result<(), StoreError>;

    /// Removes and returns the value for `key` if present and not expired.
    async fn take(&self, key: &str) -> Result<Option<String>, StoreError>;
}

pub struct PgExpiringStore {
    pool: PgPool,
}

impl PgExpiringStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpiringStore for PgExpiringStore {
    async fn put(&self, key: &str, value: &str, ttl_secs: i64) -> Result<(), StoreError> {
        let expires_at = Utc::now() + Duration::seconds(ttl_secs);
        sqlx::query(
            "INSERT INTO otp_cache (key, value, expires_at) VALUES ($1, $2, $3) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, expires_at = EXCLUDED.expires_at",
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>, StoreError> {
        // Single round trip: delete-and-return, expired rows excluded
        let value: Option<String> = sqlx::query_scalar(
            "DELETE FROM otp_cache WHERE key = $1 AND expires_at > now() RETURNING value",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        // Lazy purge of anything that lapsed without being taken
        sqlx::query("DELETE FROM otp_cache WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;

        Ok(value)
    }
}
