//! In-memory adapter for ModerationRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moderation_core::ModerationError;
use tokio::sync::RwLock;

use crate::domain::entities::{ModerationDecision, ModerationItemId, ModerationQueueItem};
use crate::domain::ports::ModerationRepository;
use crate::error::DomainError;

#[derive(Default)]
pub struct InMemoryModerationRepository {
    items: RwLock<HashMap<ModerationItemId, ModerationQueueItem>>,
}

impl InMemoryModerationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the queue
    pub fn with_items(items: impl IntoIterator<Item = ModerationQueueItem>) -> Self {
        Self {
            items: RwLock::new(items.into_iter().map(|i| (i.id.clone(), i)).collect()),
        }
    }
}

#[async_trait]
impl ModerationRepository for InMemoryModerationRepository {
    async fn find_by_id(
        &self,
        id: &ModerationItemId,
    ) -> Result<Option<ModerationQueueItem>, DomainError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<ModerationQueueItem>, DomainError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn insert(&self, item: ModerationQueueItem) -> Result<ModerationQueueItem, DomainError> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(DomainError::AlreadyExists(format!("Item {}", item.id)));
        }
        items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn record_decision(
        &self,
        id: &ModerationItemId,
        decision: &ModerationDecision,
    ) -> Result<ModerationQueueItem, DomainError> {
        // Held across check and write
        let mut items = self.items.write().await;
        let item = items
            .get_mut(id)
            .ok_or_else(|| DomainError::Transition(ModerationError::NotFound(id.to_string())))?;

        item.apply(decision).map_err(DomainError::Transition)?;
        Ok(item.clone())
    }

    async fn find_expired_pending(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ModerationQueueItem>, DomainError> {
        let items = self.items.read().await;
        let mut expired: Vec<ModerationQueueItem> = items
            .values()
            .filter(|item| item.is_auto_approved_at(now))
            .cloned()
            .collect();
        expired.sort_by(|a, b| a.expires_at.cmp(&b.expires_at).then_with(|| a.id.cmp(&b.id)));
        expired.truncate(limit);
        Ok(expired)
    }
}
