use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A walk-in or phone lead. Converted enquiries become members through the
/// normal member-creation flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enquiry {
    pub id: Uuid,
    pub gym_id: Uuid,
    pub name: String,
    pub phone: String,
    pub interest: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub converted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
