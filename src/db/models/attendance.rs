use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One member's presence on one day. Unique per (member_id, date); marking
/// the same day twice upserts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub gym_id: Uuid,
    pub member_id: Uuid,
    pub date: NaiveDate,
    pub present: bool,
    pub created_at: DateTime<Utc>,
}
