use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Purpose of a payment, set explicitly at intake. Admission fees never
/// count toward plan-expiry decisions; everything else does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    AdmissionFee,
    PlanRenewal,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub gym_id: Uuid,
    pub member_id: Uuid,
    pub kind: PaymentKind,
    pub amount_paid: Decimal,
    pub total_amount: Decimal,
    /// Stored shortfall, recomputed server-side at intake; never negative.
    pub due_amount: Decimal,
    pub payment_date: NaiveDate,
    pub payment_method: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn is_settled(&self) -> bool {
        self.due_amount.is_zero()
    }

    /// Payments that count toward plan-expiry decisions.
    pub fn counts_toward_plan(&self) -> bool {
        self.kind != PaymentKind::AdmissionFee
    }
}
