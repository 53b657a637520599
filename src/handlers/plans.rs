use axum::extract::{Extension, Path};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use super::gym_store;
use crate::db::store::NewPlan;
use crate::error::ApiError;
use crate::middleware::AuthGym;

/// GET /api/plans
pub async fn list(Extension(auth): Extension<AuthGym>) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let plans = store.list_plans().await?;
    Ok(Json(json!({ "success": true, "data": plans })))
}

/// GET /api/plans/:id
pub async fn get(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let plan = store.get_plan(id).await?;
    Ok(Json(json!({ "success": true, "data": plan })))
}

/// POST /api/plans (admin)
pub async fn create(
    Extension(auth): Extension<AuthGym>,
    Json(input): Json<NewPlan>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let plan = store.create_plan(input).await?;
    Ok(Json(json!({ "success": true, "data": plan })))
}

/// PUT /api/plans/:id (admin)
pub async fn update(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewPlan>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let plan = store.update_plan(id, input).await?;
    Ok(Json(json!({ "success": true, "data": plan })))
}

/// DELETE /api/plans/:id (admin)
pub async fn delete(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    store.delete_plan(id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
