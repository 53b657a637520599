use axum::extract::{Extension, Query};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{gym_store, DateRange};
use crate::error::ApiError;
use crate::middleware::AuthGym;
use crate::reports;

#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    /// Horizon in days; the dashboard passes 15, the full report defaults
    /// to 30.
    pub days: Option<i64>,
}

/// GET /api/reports/expiring?days=30
pub async fn expiring(
    Extension(auth): Extension<AuthGym>,
    Query(query): Query<ExpiringQuery>,
) -> Result<Json<Value>, ApiError> {
    let horizon = query.days.unwrap_or(30).max(0);
    let store = gym_store(&auth).await?;
    let members = store.all_members().await?;
    let today = Utc::now().date_naive();

    let report = reports::expiring_memberships(&members, today, horizon);
    Ok(Json(json!({ "success": true, "data": report })))
}

/// GET /api/reports/financial?from&to (admin)
pub async fn financial(
    Extension(auth): Extension<AuthGym>,
    Query(range): Query<DateRange>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let (from, to) = range.resolve();

    let payments = store.payments_in_range(from, to).await?;
    let expenses = store.list_expenses(from, to).await?;

    let summary = reports::financial_summary(&payments, &expenses);
    Ok(Json(json!({ "success": true, "data": summary })))
}

/// GET /api/reports/attendance?from&to
pub async fn attendance(
    Extension(auth): Extension<AuthGym>,
    Query(range): Query<DateRange>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let (from, to) = range.resolve();

    let members = store.all_members().await?;
    let records = store.attendance_in_range(from, to).await?;

    let summary = reports::attendance_summary(&members, &records);
    Ok(Json(json!({ "success": true, "data": summary })))
}
