use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A training slot members can optionally be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Batch {
    pub id: Uuid,
    pub gym_id: Uuid,
    pub name: String,
    /// Free-text schedule descriptor, e.g. "Mon-Fri 06:00-07:30".
    pub schedule: String,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
