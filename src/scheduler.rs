//! Scheduled membership sweeps. One round sweeps every gym; gyms run
//! concurrently with each other while members within a gym are processed
//! sequentially, since tenant data is disjoint but per-tenant writes are
//! kept simple.

use chrono::Utc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config;
use crate::db::{store, Db, GymStore};
use crate::reconciler;

/// Runs sweep rounds forever at the configured interval. Spawned as a
/// background task next to the HTTP server.
pub async fn run() {
    let cfg = &config::config().sweep;
    let mut ticker = tokio::time::interval(Duration::from_secs(cfg.interval_hours * 3600));
    // MissedTickBehavior::Skip: a late round never queues a burst
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if let Err(e) = sweep_all_gyms().await {
            error!(error = %e, "sweep round failed to start");
        }
    }
}

/// One round across all gyms. A gym that fails or times out does not
/// affect the others.
pub async fn sweep_all_gyms() -> Result<(), store::StoreError> {
    let pool = Db::pool().await?;
    let gym_ids = store::list_gym_ids(&pool).await?;
    let cfg = &config::config().sweep;

    info!(gyms = gym_ids.len(), "starting membership sweep round");

    let sweeps = gym_ids.into_iter().map(|gym_id| {
        let store = GymStore::new(gym_id, pool.clone());
        async move {
            let today = Utc::now().date_naive();
            let sweep = reconciler::sweep_gym(&store, today, cfg.page_size);
            match tokio::time::timeout(Duration::from_secs(cfg.timeout_secs), sweep).await {
                Ok(Ok(summary)) => {
                    info!(
                        gym_id = %gym_id,
                        checked = summary.total_checked,
                        updated = summary.total_updated,
                        "gym sweep finished"
                    );
                }
                Ok(Err(e)) => {
                    // Tenant-level failure; applied updates stand, nothing
                    // else in this gym was touched
                    error!(gym_id = %gym_id, error = %e, "gym sweep aborted");
                }
                Err(_) => {
                    warn!(gym_id = %gym_id, "gym sweep timed out, remaining members deferred");
                }
            }
        }
    });

    futures::future::join_all(sweeps).await;
    Ok(())
}
