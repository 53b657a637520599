use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{gym_store, DateRange};
use crate::db::store::{NewPayment, PaymentCorrection};
use crate::error::ApiError;
use crate::middleware::AuthGym;

/// GET /api/payments?from&to
pub async fn list(
    Extension(auth): Extension<AuthGym>,
    Query(range): Query<DateRange>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let (from, to) = range.resolve();
    let payments = store.payments_in_range(from, to).await?;
    Ok(Json(json!({ "success": true, "data": payments })))
}

/// POST /api/payments - records one payment; the due amount is computed
/// server-side from total and paid
pub async fn create(
    Extension(auth): Extension<AuthGym>,
    Json(input): Json<NewPayment>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let payment = store.create_payment(input).await?;
    Ok(Json(json!({ "success": true, "data": payment })))
}

/// GET /api/payments/:id
pub async fn get(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let payment = store.get_payment(id).await?;
    Ok(Json(json!({ "success": true, "data": payment })))
}

/// PUT /api/payments/:id (admin) - restates a payment to correct a
/// data-entry mistake; due is recomputed server-side
pub async fn correct(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
    Json(input): Json<PaymentCorrection>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let payment = store.update_payment(id, input).await?;
    Ok(Json(json!({ "success": true, "data": payment })))
}

/// DELETE /api/payments/:id (admin) - removes a payment recorded in error
pub async fn delete(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    store.delete_payment(id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}

/// GET /api/payments/member/:id - a member's full ledger
pub async fn member_history(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    // 404 for a foreign or unknown member before exposing any ledger
    let member = store.get_member(id).await?;
    let payments = store.payments_for_member(member.id).await?;
    Ok(Json(json!({ "success": true, "data": payments })))
}
