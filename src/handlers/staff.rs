use axum::extract::{Extension, Path};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use super::gym_store;
use crate::db::store::NewStaff;
use crate::error::ApiError;
use crate::middleware::AuthGym;

/// GET /api/staff
pub async fn list(Extension(auth): Extension<AuthGym>) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let staff = store.list_staff().await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

/// GET /api/staff/:id (admin)
pub async fn get(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let staff = store.get_staff(id).await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

/// POST /api/staff (admin)
pub async fn create(
    Extension(auth): Extension<AuthGym>,
    Json(input): Json<NewStaff>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let staff = store.create_staff(input).await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

/// PUT /api/staff/:id (admin)
pub async fn update(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewStaff>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let staff = store.update_staff(id, input).await?;
    Ok(Json(json!({ "success": true, "data": staff })))
}

/// DELETE /api/staff/:id (admin)
pub async fn delete(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    store.delete_staff(id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
