//! Mock implementations of port traits

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{ModerationDecision, ModerationItemId, ModerationQueueItem};
use crate::domain::ports::ModerationRepository;
use crate::error::DomainError;

/// Repository whose storage is permanently unavailable
pub struct FailingModerationRepository;

fn unavailable() -> DomainError {
    DomainError::Internal("storage unavailable".to_string())
}

#[async_trait]
impl ModerationRepository for FailingModerationRepository {
    async fn find_by_id(
        &self,
        _id: &ModerationItemId,
    ) -> Result<Option<ModerationQueueItem>, DomainError> {
        Err(unavailable())
    }

    async fn list_all(&self) -> Result<Vec<ModerationQueueItem>, DomainError> {
        Err(unavailable())
    }

    async fn insert(&self, _item: ModerationQueueItem) -> Result<ModerationQueueItem, DomainError> {
        Err(unavailable())
    }

    async fn record_decision(
        &self,
        _id: &ModerationItemId,
        _decision: &ModerationDecision,
    ) -> Result<ModerationQueueItem, DomainError> {
        Err(unavailable())
    }

    async fn find_expired_pending(
        &self,
        _now: DateTime<Utc>,
        _limit: usize,
    ) -> Result<Vec<ModerationQueueItem>, DomainError> {
        Err(unavailable())
    }
}
