//! Periodic removal of expired refresh tokens.
//!
//! Expired rows are already rejected on use; this only keeps the table small.

use crate::repositories::refresh_token_repository::RefreshTokenRepository;
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};

pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
pub struct TokenCleanupScheduler {
    pool: SqlitePool,
    period: Duration,
}

impl TokenCleanupScheduler {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            period: CLEANUP_INTERVAL,
        }
    }

    /// Spawns the cleanup loop. The first sweep runs immediately.
    pub fn start(&self) -> JoinHandle<()> {
        let scheduler = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(scheduler.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                scheduler.run_once().await;
            }
        })
    }

    async fn run_once(&self) {
        match RefreshTokenRepository::new(&self.pool)
            .delete_expired(Utc::now())
            .await
        {
            Ok(0) => {}
            Ok(removed) => tracing::info!("Removed {} expired refresh token(s)", removed),
            Err(e) => tracing::error!("Refresh token cleanup failed: {:#}", e),
        }
    }
}
