//! Test fixtures and a scripted gateway

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use moderation_core::entities::{
    ContentType, ModerationAction, ModerationDecision, ModerationItemId, ModerationQueueItem,
    ModerationStatus,
};
use moderation_core::wire::ActionResponse;
use moderation_core::ModerationError;

use crate::gateway::ModerationGateway;

/// Pending post created a minute ago, expiring in a day
pub fn test_item(id: &str) -> ModerationQueueItem {
    let created_at = Utc::now() - chrono::Duration::minutes(1);
    ModerationQueueItem {
        id: ModerationItemId::from(id),
        content_id: format!("content-{}", id),
        content_type: ContentType::Post,
        creator_id: "creator-1".to_string(),
        creator_name: "Casey Creator".to_string(),
        creator_avatar: None,
        content: format!("Test content for {}", id),
        media_urls: Vec::new(),
        category: None,
        created_at,
        expires_at: created_at + chrono::Duration::days(1),
        status: ModerationStatus::Pending,
        moderated_by: None,
        moderated_at: None,
        reason: None,
    }
}

/// Gateway that confirms every action as `mod1` unless told to fail
#[derive(Default)]
pub struct MockGateway {
    queue: Vec<ModerationQueueItem>,
    actor: Option<String>,
    delay: Duration,
    failures: Mutex<VecDeque<ModerationError>>,
    calls: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queue(mut self, queue: Vec<ModerationQueueItem>) -> Self {
        self.queue = queue;
        self
    }

    /// Confirm actions as `actor` instead of `mod1`
    pub fn confirming_as(mut self, actor: &str) -> Self {
        self.actor = Some(actor.to_string());
        self
    }

    /// Delay every call by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the next action with `error`
    pub fn fail_next(&self, error: ModerationError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModerationGateway for MockGateway {
    async fn fetch_queue(&self) -> Result<Vec<ModerationQueueItem>, ModerationError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.queue.clone())
    }

    async fn submit_action(
        &self,
        item_id: &ModerationItemId,
        action: ModerationAction,
        reason: Option<&str>,
    ) -> Result<ActionResponse, ModerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let failure = self.failures.lock().unwrap().pop_front();
        if let Some(error) = failure {
            return Err(error);
        }
        let actor = self.actor.as_deref().unwrap_or("mod1");
        let decision = ModerationDecision::new(action, actor, reason.map(str::to_string));
        Ok(ActionResponse::confirm(item_id.clone(), &decision))
    }
}
