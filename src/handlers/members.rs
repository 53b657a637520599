use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{gym_store, Pagination};
use crate::db::store::{NewMember, UpdateMember};
use crate::error::ApiError;
use crate::middleware::AuthGym;

/// GET /api/members
pub async fn list(
    Extension(auth): Extension<AuthGym>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let members = store.list_members(page.limit(), page.offset()).await?;
    Ok(Json(json!({ "success": true, "data": members })))
}

/// POST /api/members
pub async fn create(
    Extension(auth): Extension<AuthGym>,
    Json(input): Json<NewMember>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let member = store.create_member(input).await?;
    Ok(Json(json!({ "success": true, "data": member })))
}

/// GET /api/members/:id
pub async fn get(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let member = store.get_member(id).await?;
    Ok(Json(json!({ "success": true, "data": member })))
}

/// PUT /api/members/:id
pub async fn update(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateMember>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let member = store.update_member(id, input).await?;
    Ok(Json(json!({ "success": true, "data": member })))
}

/// DELETE /api/members/:id
pub async fn delete(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    store.delete_member(id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
