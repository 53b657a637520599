pub mod attendance;
pub mod auth;
pub mod batches;
pub mod enquiries;
pub mod expenses;
pub mod members;
pub mod payments;
pub mod plans;
pub mod reports;
pub mod staff;
pub mod status_check;

use chrono::Datelike;
use serde::Deserialize;

use crate::config;
use crate::db::{Db, GymStore};
use crate::error::ApiError;
use crate::middleware::AuthGym;

/// Tenant-scoped store for the authenticated caller. The gym id comes from
/// the verified JWT; handlers never pass tenant ids around.
pub(crate) async fn gym_store(auth: &AuthGym) -> Result<GymStore, ApiError> {
    let pool = Db::pool().await?;
    Ok(GymStore::new(auth.gym_id, pool))
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        let cfg = &config::config().api;
        self.limit
            .unwrap_or(cfg.default_page_size)
            .clamp(1, cfg.max_page_size)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Inclusive date range for report and listing queries. Defaults to the
/// current calendar month when absent.
#[derive(Debug, Default, Deserialize)]
pub struct DateRange {
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

impl DateRange {
    pub fn resolve(&self) -> (chrono::NaiveDate, chrono::NaiveDate) {
        let today = chrono::Utc::now().date_naive();
        let month_start = today.with_day(1).unwrap_or(today);
        (self.from.unwrap_or(month_start), self.to.unwrap_or(today))
    }
}
