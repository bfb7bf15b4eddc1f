//! Repository port traits
//!
//! These traits define the interface for queue and actor persistence.
//! Implementations are provided by adapters (e.g., in-memory).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Actor, ModerationDecision, ModerationItemId, ModerationQueueItem,
};
use crate::error::DomainError;

/// Repository for moderation queue items
#[async_trait]
pub trait ModerationRepository: Send + Sync {
    /// Find an item by ID
    async fn find_by_id(&self, id: &ModerationItemId)
        -> Result<Option<ModerationQueueItem>, DomainError>;

    /// Snapshot of every item, in no particular order
    async fn list_all(&self) -> Result<Vec<ModerationQueueItem>, DomainError>;

    /// Add a new item to the queue
    async fn insert(&self, item: ModerationQueueItem) -> Result<ModerationQueueItem, DomainError>;

    /// Apply a decision if and only if the item is still pending.
    ///
    /// Check and write happen atomically: of two concurrent decisions for the
    /// same item, exactly one succeeds and the other gets
    /// `DomainError::Transition(InvalidState)`.
    async fn record_decision(
        &self,
        id: &ModerationItemId,
        decision: &ModerationDecision,
    ) -> Result<ModerationQueueItem, DomainError>;

    /// Pending items whose deadline is at or before `now`, oldest deadline first
    async fn find_expired_pending(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<ModerationQueueItem>, DomainError>;
}

/// Repository for actors allowed to call the API
#[async_trait]
pub trait ActorRepository: Send + Sync {
    /// Find an actor by API key hash
    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<Actor>, DomainError>;

    /// Find an actor by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Actor>, DomainError>;

    /// Register an actor under an API key hash
    async fn create(&self, actor: Actor, api_key_hash: &str) -> Result<Actor, DomainError>;
}
