//! Auto-approval sweep
//!
//! Periodically approves pending items whose deadline has passed, recording
//! `system:auto-approve` as the moderator.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::app::ModerationService;
use crate::domain::ports::ModerationRepository;

pub struct AutoApproveWorker<MR>
where
    MR: ModerationRepository,
{
    service: Arc<ModerationService<MR>>,
    interval_seconds: u64,
    batch_size: usize,
}

impl<MR> AutoApproveWorker<MR>
where
    MR: ModerationRepository,
{
    pub fn new(service: Arc<ModerationService<MR>>, interval_seconds: u64, batch_size: usize) -> Self {
        Self {
            service,
            interval_seconds: interval_seconds.max(10),
            batch_size: batch_size.max(1),
        }
    }

    /// Run one sweep, returning how many items were approved
    pub async fn run_once(&self) -> usize {
        match self.service.sweep_expired(Utc::now(), self.batch_size).await {
            Ok(approved) => {
                for item in &approved {
                    tracing::info!(item_id = %item.id, "Auto-approved expired item");
                }
                approved.len()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Auto-approval sweep failed");
                0
            }
        }
    }

    pub async fn start(&self) {
        tracing::info!(
            interval_seconds = self.interval_seconds,
            batch_size = self.batch_size,
            "Auto-approval sweep started"
        );
        loop {
            // Drain the backlog before sleeping
            while self.run_once().await == self.batch_size {}

            tokio::time::sleep(Duration::from_secs(self.interval_seconds)).await;
        }
    }
}
