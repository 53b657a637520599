use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Membership state. Only the reconciler and explicit admin edits move it
/// after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub id: Uuid,
    pub gym_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub status: MemberStatus,
    pub plan_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub join_date: NaiveDate,
    pub plan_end_date: NaiveDate,
    pub discount_value: Decimal,
    pub admission_fees: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

/// Calendar-month addition used for plan end dates, both at member creation
/// and when the reconciler extends a renewed plan. Month arithmetic, not a
/// fixed day count, so end dates track month length.
pub fn add_plan_months(date: NaiveDate, duration_in_months: i32) -> Option<NaiveDate> {
    if duration_in_months <= 0 {
        return None;
    }
    date.checked_add_months(Months::new(duration_in_months as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn adds_calendar_months() {
        assert_eq!(add_plan_months(d(2024, 1, 1), 1), Some(d(2024, 2, 1)));
        assert_eq!(add_plan_months(d(2024, 1, 15), 3), Some(d(2024, 4, 15)));
        // Clamps to month end rather than spilling over
        assert_eq!(add_plan_months(d(2024, 1, 31), 1), Some(d(2024, 2, 29)));
        assert_eq!(add_plan_months(d(2023, 1, 31), 1), Some(d(2023, 2, 28)));
    }

    #[test]
    fn rejects_non_positive_durations() {
        assert_eq!(add_plan_months(d(2024, 1, 1), 0), None);
        assert_eq!(add_plan_months(d(2024, 1, 1), -2), None);
    }
}
