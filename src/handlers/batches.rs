use axum::extract::{Extension, Path};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use super::gym_store;
use crate::db::store::NewBatch;
use crate::error::ApiError;
use crate::middleware::AuthGym;

/// GET /api/batches
pub async fn list(Extension(auth): Extension<AuthGym>) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let batches = store.list_batches().await?;
    Ok(Json(json!({ "success": true, "data": batches })))
}

/// GET /api/batches/:id
pub async fn get(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let batch = store.get_batch(id).await?;
    Ok(Json(json!({ "success": true, "data": batch })))
}

/// POST /api/batches
pub async fn create(
    Extension(auth): Extension<AuthGym>,
    Json(input): Json<NewBatch>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let batch = store.create_batch(input).await?;
    Ok(Json(json!({ "success": true, "data": batch })))
}

/// PUT /api/batches/:id
pub async fn update(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewBatch>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let batch = store.update_batch(id, input).await?;
    Ok(Json(json!({ "success": true, "data": batch })))
}

/// DELETE /api/batches/:id - detaches members, then removes the batch
pub async fn delete(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    store.delete_batch(id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
