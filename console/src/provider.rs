//! Moderation provider
//!
//! Session-wide state for the console: the item collection, in-flight
//! actions and a broadcast channel of changes. Views hold an
//! `Arc<ModerationProvider<_>>` and never mutate items themselves.
//!
//! Actions on one item are serialised by a per-item lock. The local
//! transition is committed only after the gateway confirms it, so a failed,
//! timed out or cancelled action leaves the collection exactly as it was.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use moderation_core::entities::{
    ModerationAction, ModerationFilter, ModerationItemId, ModerationQueueItem, ModerationStats,
};
use moderation_core::ModerationError;
use tokio::sync::{broadcast, Mutex, RwLock};

use crate::gateway::ModerationGateway;

const EVENT_CAPACITY: usize = 64;

/// Change notifications for subscribed views
#[derive(Debug, Clone)]
pub enum QueueEvent {
    ItemModerated {
        item: ModerationQueueItem,
    },
    ActionFailed {
        item_id: ModerationItemId,
        action: ModerationAction,
        error: ModerationError,
    },
}

type InFlightActions = HashMap<ModerationItemId, ModerationAction>;

/// Marks an item as awaiting confirmation until dropped.
///
/// Dropping happens on every exit from an action, including the caller
/// abandoning the future mid-call.
struct InFlightMarker<'a> {
    actions: &'a StdMutex<InFlightActions>,
    id: ModerationItemId,
}

impl<'a> InFlightMarker<'a> {
    fn set(
        actions: &'a StdMutex<InFlightActions>,
        id: ModerationItemId,
        action: ModerationAction,
    ) -> Self {
        lock_in_flight(actions).insert(id.clone(), action);
        Self { actions, id }
    }
}

impl Drop for InFlightMarker<'_> {
    fn drop(&mut self) {
        lock_in_flight(self.actions).remove(&self.id);
    }
}

fn lock_in_flight(actions: &StdMutex<InFlightActions>) -> MutexGuard<'_, InFlightActions> {
    // Entries are plain values; a panicked holder cannot leave them torn
    actions.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ModerationProvider<G: ModerationGateway> {
    gateway: Arc<G>,
    items: RwLock<HashMap<ModerationItemId, ModerationQueueItem>>,
    in_flight: StdMutex<InFlightActions>,
    item_locks: Mutex<HashMap<ModerationItemId, Arc<Mutex<()>>>>,
    events: broadcast::Sender<QueueEvent>,
    action_timeout: Duration,
}

impl<G: ModerationGateway> ModerationProvider<G> {
    pub fn new(gateway: Arc<G>, action_timeout: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            gateway,
            items: RwLock::new(HashMap::new()),
            in_flight: StdMutex::new(HashMap::new()),
            item_locks: Mutex::new(HashMap::new()),
            events,
            action_timeout,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.events.subscribe()
    }

    /// Replace the session collection
    pub async fn load(&self, items: Vec<ModerationQueueItem>) {
        let count = items.len();
        *self.items.write().await = items.into_iter().map(|i| (i.id.clone(), i)).collect();

        // Locks nobody holds or waits on belong to finished actions
        let mut locks = self.item_locks.lock().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        tracing::debug!(count, active_locks = locks.len(), "Queue loaded");
    }

    /// Reload the collection from the gateway
    pub async fn refresh(&self) -> Result<usize, ModerationError> {
        let items = self.with_timeout(self.gateway.fetch_queue()).await?;
        let count = items.len();
        self.load(items).await;
        Ok(count)
    }

    pub async fn list(&self, filter: &ModerationFilter) -> Vec<ModerationQueueItem> {
        filter.apply(self.items.read().await.values())
    }

    pub async fn get(&self, id: &str) -> Option<ModerationQueueItem> {
        self.items
            .read()
            .await
            .get(&ModerationItemId::from(id))
            .cloned()
    }

    pub async fn stats(&self) -> ModerationStats {
        self.stats_at(Utc::now()).await
    }

    pub async fn stats_at(&self, now: DateTime<Utc>) -> ModerationStats {
        ModerationStats::from_items(self.items.read().await.values(), now)
    }

    /// The action awaiting confirmation for `id`, if any
    pub async fn pending_action(&self, id: &ModerationItemId) -> Option<ModerationAction> {
        lock_in_flight(&self.in_flight).get(id).copied()
    }

    /// Apply `action` to a pending item.
    ///
    /// Returns the item in its new state once the gateway has confirmed.
    /// Every outcome is also published to subscribers.
    pub async fn apply_action(
        &self,
        item_id: &str,
        action: ModerationAction,
        reason: Option<String>,
        acting_user_id: &str,
    ) -> Result<ModerationQueueItem, ModerationError> {
        let result = self
            .try_apply(item_id.trim(), action, reason, acting_user_id)
            .await;

        match &result {
            Ok(item) => {
                tracing::info!(item_id = %item.id, action = %action, "Action confirmed");
                self.emit(QueueEvent::ItemModerated { item: item.clone() });
            }
            Err(error) => {
                tracing::warn!(item_id = item_id.trim(), action = %action, error = %error, "Action failed");
                self.emit(QueueEvent::ActionFailed {
                    item_id: ModerationItemId::from(item_id.trim()),
                    action,
                    error: error.clone(),
                });
            }
        }
        result
    }

    async fn try_apply(
        &self,
        item_id: &str,
        action: ModerationAction,
        reason: Option<String>,
        acting_user_id: &str,
    ) -> Result<ModerationQueueItem, ModerationError> {
        if item_id.is_empty() {
            return Err(ModerationError::MissingItemId);
        }
        if acting_user_id.trim().is_empty() {
            return Err(ModerationError::Unauthorized(
                "no acting user for this session".to_string(),
            ));
        }
        let id = ModerationItemId::from(item_id);

        let lock = self.item_lock(&id).await;
        let _guard = lock.lock().await;

        let marker = {
            let items = self.items.read().await;
            let item = items
                .get(&id)
                .ok_or_else(|| ModerationError::NotFound(id.to_string()))?;
            if !item.is_pending() {
                return Err(ModerationError::InvalidState {
                    id: id.to_string(),
                    status: item.status,
                });
            }
            InFlightMarker::set(&self.in_flight, id.clone(), action)
        };

        tracing::debug!(item_id = %id, action = %action, actor_id = acting_user_id, "Submitting action");
        let outcome = self
            .with_timeout(self.gateway.submit_action(&id, action, reason.as_deref()))
            .await;

        let mut items = self.items.write().await;
        drop(marker);
        let decision = outcome?.decision();

        // The server stamps whoever owns the API key; local state must agree
        if decision.moderated_by != acting_user_id {
            tracing::warn!(
                item_id = %id,
                expected = acting_user_id,
                recorded = %decision.moderated_by,
                "Server recorded a different moderator"
            );
            return Err(ModerationError::Unauthorized(format!(
                "API key acts as '{}', not '{}'",
                decision.moderated_by, acting_user_id
            )));
        }

        let item = items
            .get_mut(&id)
            .ok_or_else(|| ModerationError::NotFound(id.to_string()))?;
        // A refresh during the call may already show the new status
        if item.is_pending() {
            item.apply(&decision)?;
        }
        Ok(item.clone())
    }

    async fn item_lock(&self, id: &ModerationItemId) -> Arc<Mutex<()>> {
        self.item_locks
            .lock()
            .await
            .entry(id.clone())
            .or_default()
            .clone()
    }

    async fn with_timeout<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, ModerationError>>,
    ) -> Result<T, ModerationError> {
        match tokio::time::timeout(self.action_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ModerationError::TransientIo(format!(
                "No response within {}s",
                self.action_timeout.as_secs_f32()
            ))),
        }
    }

    fn emit(&self, event: QueueEvent) {
        // No subscribers is fine: nothing is mounted
        let _ = self.events.send(event);
    }
}
