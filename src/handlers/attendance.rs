use axum::extract::{Extension, Query};
use axum::Json;
use serde_json::{json, Value};

use super::{gym_store, DateRange};
use crate::db::store::MarkAttendance;
use crate::error::ApiError;
use crate::middleware::AuthGym;

/// GET /api/attendance?from&to
pub async fn list(
    Extension(auth): Extension<AuthGym>,
    Query(range): Query<DateRange>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let (from, to) = range.resolve();
    let records = store.attendance_in_range(from, to).await?;
    Ok(Json(json!({ "success": true, "data": records })))
}

/// POST /api/attendance - marks one member for one day, upserting on
/// repeat marks
pub async fn mark(
    Extension(auth): Extension<AuthGym>,
    Json(input): Json<MarkAttendance>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let record = store.mark_attendance(input).await?;
    Ok(Json(json!({ "success": true, "data": record })))
}
