//! Session Sweeper Background Job
//!
//! Removes expired session rows so the sessions table does not grow without
//! bound. Expired sessions are already rejected at auth time; this job is
//! only housekeeping.

use crate::db::session_repo;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Check interval for session cleanup (runs once per hour)
const CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub async fn start_session_sweeper(db: PgPool) {
    tracing::info!(
        "Starting session sweeper background job (check_interval={}m)",
        CHECK_INTERVAL.as_secs() / 60
    );

    loop {
        sleep(CHECK_INTERVAL).await;

        let cycle_start = Instant::now();
        match session_repo::delete_expired_sessions(&db).await {
            Ok(removed) => {
                if removed > 0 {
                    tracing::info!(
                        removed,
                        duration_ms = cycle_start.elapsed().as_millis(),
                        "Expired sessions removed"
                    );
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Session sweep failed");
            }
        }
    }
}
