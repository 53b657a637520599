use axum::extract::Extension;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use super::gym_store;
use crate::config;
use crate::error::ApiError;
use crate::middleware::AuthGym;
use crate::reconciler;

/// POST /api/members/status-check (admin) - on-demand reconciliation of the
/// caller's gym. Individual member failures stay in the logs; the caller
/// gets the counts either way.
pub async fn status_check(Extension(auth): Extension<AuthGym>) -> Result<Json<Value>, ApiError> {
    auth.require_admin()?;
    let store = gym_store(&auth).await?;
    let today = Utc::now().date_naive();
    let page_size = config::config().sweep.page_size;

    let summary = reconciler::sweep_gym(&store, today, page_size).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "totalChecked": summary.total_checked,
            "totalUpdated": summary.total_updated,
            "updatedMembers": summary.updated_members,
        }
    })))
}
