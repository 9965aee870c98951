use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::models::Session;
use crate::AppState;

/// Background sweeper for expired session rows.
pub struct CleanupService {
    state: Arc<AppState>,
}

impl CleanupService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Runs forever, sweeping on the configured interval.
    pub async fn run(self) {
        let interval = Duration::from_secs(self.state.config.session.cleanup_interval_secs);
        loop {
            self.sweep_expired_sessions().await;
            tokio::time::sleep(interval).await;
        }
    }

    async fn sweep_expired_sessions(&self) {
        match Session::purge_expired(&self.state.db).await {
            Ok(0) => {}
            Ok(purged) => info!("Purged {} expired sessions", purged),
            Err(e) => error!("Session cleanup failed: {:?}", e),
        }
    }
}
