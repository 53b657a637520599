use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{gym_store, DateRange};
use crate::db::store::NewExpense;
use crate::error::ApiError;
use crate::middleware::AuthGym;

/// GET /api/expenses?from&to (admin)
pub async fn list(
    Extension(auth): Extension<AuthGym>,
    Query(range): Query<DateRange>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let (from, to) = range.resolve();
    let expenses = store.list_expenses(from, to).await?;
    Ok(Json(json!({ "success": true, "data": expenses })))
}

/// POST /api/expenses (admin)
pub async fn create(
    Extension(auth): Extension<AuthGym>,
    Json(input): Json<NewExpense>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let expense = store.create_expense(input).await?;
    Ok(Json(json!({ "success": true, "data": expense })))
}

/// GET /api/expenses/:id (admin)
pub async fn get(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let expense = store.get_expense(id).await?;
    Ok(Json(json!({ "success": true, "data": expense })))
}

/// PUT /api/expenses/:id (admin)
pub async fn update(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewExpense>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let expense = store.update_expense(id, input).await?;
    Ok(Json(json!({ "success": true, "data": expense })))
}

/// DELETE /api/expenses/:id (admin)
pub async fn delete(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    store.delete_expense(id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
