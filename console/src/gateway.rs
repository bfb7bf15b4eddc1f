//! Port between the console and wherever moderation actions are recorded

use async_trait::async_trait;
use moderation_core::entities::{ModerationAction, ModerationItemId, ModerationQueueItem};
use moderation_core::wire::ActionResponse;
use moderation_core::ModerationError;

#[async_trait]
pub trait ModerationGateway: Send + Sync + 'static {
    /// The full queue as the server currently sees it
    async fn fetch_queue(&self) -> Result<Vec<ModerationQueueItem>, ModerationError>;

    /// Record an action. Success means the server committed the transition.
    async fn submit_action(
        &self,
        item_id: &ModerationItemId,
        action: ModerationAction,
        reason: Option<&str>,
    ) -> Result<ActionResponse, ModerationError>;
}
