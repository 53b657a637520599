use axum::extract::{Extension, Path};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use super::gym_store;
use crate::db::store::{NewEnquiry, UpdateEnquiry};
use crate::error::ApiError;
use crate::middleware::AuthGym;

/// GET /api/enquiries
pub async fn list(Extension(auth): Extension<AuthGym>) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let enquiries = store.list_enquiries().await?;
    Ok(Json(json!({ "success": true, "data": enquiries })))
}

/// POST /api/enquiries
pub async fn create(
    Extension(auth): Extension<AuthGym>,
    Json(input): Json<NewEnquiry>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let enquiry = store.create_enquiry(input).await?;
    Ok(Json(json!({ "success": true, "data": enquiry })))
}

/// GET /api/enquiries/:id
pub async fn get(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let enquiry = store.get_enquiry(id).await?;
    Ok(Json(json!({ "success": true, "data": enquiry })))
}

/// PUT /api/enquiries/:id - partial edit of the lead's contact details
pub async fn update(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateEnquiry>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let enquiry = store.update_enquiry(id, input).await?;
    Ok(Json(json!({ "success": true, "data": enquiry })))
}

/// POST /api/enquiries/:id/convert - flags the lead; actual member
/// creation goes through the member endpoint
pub async fn convert(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    let enquiry = store.mark_enquiry_converted(id).await?;
    Ok(Json(json!({ "success": true, "data": enquiry })))
}

/// DELETE /api/enquiries/:id
pub async fn delete(
    Extension(auth): Extension<AuthGym>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = gym_store(&auth).await?;
    store.delete_enquiry(id).await?;
    Ok(Json(json!({ "success": true, "data": { "deleted": id } })))
}
