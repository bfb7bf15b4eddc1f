//! Queue view
//!
//! Lists the filtered queue with row numbers, renders item details and
//! triggers actions without waiting for them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use moderation_core::entities::{
    ModerationAction, ModerationFilter, ModerationItemId, ModerationQueueItem,
};
use moderation_core::ModerationError;
use tokio::task::JoinHandle;

use super::{truncate, StatusBadge};
use crate::command::ItemRef;
use crate::gateway::ModerationGateway;
use crate::provider::ModerationProvider;

/// One rendered line of the queue
#[derive(Debug, Clone)]
pub struct QueueRow {
    /// One-based, as typed in commands
    pub number: usize,
    pub item: ModerationQueueItem,
    pub in_flight: Option<ModerationAction>,
}

pub struct QueueView<G: ModerationGateway> {
    provider: Arc<ModerationProvider<G>>,
    /// Ids in the order last shown, for resolving row numbers
    shown: Vec<ModerationItemId>,
}

impl<G: ModerationGateway> QueueView<G> {
    pub fn new(provider: Arc<ModerationProvider<G>>) -> Self {
        Self {
            provider,
            shown: Vec::new(),
        }
    }

    /// Project the queue through `filter` and remember the row order
    pub async fn rows(&mut self, filter: &ModerationFilter) -> Vec<QueueRow> {
        let items = self.provider.list(filter).await;
        self.shown = items.iter().map(|item| item.id.clone()).collect();

        let mut rows = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            let in_flight = self.provider.pending_action(&item.id).await;
            rows.push(QueueRow {
                number: i + 1,
                item,
                in_flight,
            });
        }
        rows
    }

    /// Turn a row number or id into an item id
    pub fn resolve(&self, item: &ItemRef) -> Option<ModerationItemId> {
        match item {
            ItemRef::Row(index) => self.shown.get(*index).cloned(),
            ItemRef::Id(id) => Some(ModerationItemId::from(id.as_str())),
        }
    }

    /// Start an action and return immediately.
    ///
    /// The spawned task owns its provider handle, so dropping the view or
    /// navigating away does not cancel it. The outcome arrives as a
    /// provider event; the handle is only for callers that want to wait.
    pub fn trigger(
        &self,
        item_id: ModerationItemId,
        action: ModerationAction,
        reason: Option<String>,
        acting_user_id: String,
    ) -> JoinHandle<Result<ModerationQueueItem, ModerationError>> {
        let provider = self.provider.clone();
        tokio::spawn(async move {
            provider
                .apply_action(item_id.as_str(), action, reason, &acting_user_id)
                .await
        })
    }
}

/// Render queue rows for a pane `width` columns wide
pub fn render_rows(rows: &[QueueRow], now: DateTime<Utc>, width: u16) -> String {
    if rows.is_empty() {
        return "No items match the current filter.\n".to_string();
    }

    let mut buf = String::new();
    for row in rows {
        let marker = match row.in_flight {
            Some(action) => format!(" ({}...)", action),
            None => String::new(),
        };
        let line = format!(
            "[{}] {} {} {} {} by {}: {}{}",
            row.number,
            StatusBadge::for_item(&row.item, now),
            row.item.id,
            row.item.content_type,
            row.item.category.as_deref().unwrap_or("-"),
            row.item.creator_name,
            row.item.content.replace('\n', " "),
            marker
        );
        buf.push_str(&truncate(&line, width as usize));
        buf.push('\n');
    }
    buf
}

/// Render the detail pane for one item
pub fn render_detail(
    item: &ModerationQueueItem,
    in_flight: Option<ModerationAction>,
    now: DateTime<Utc>,
    width: u16,
) -> String {
    let width = width as usize;
    let mut buf = String::new();

    buf.push_str(&format!("{} {}\n", item.id, StatusBadge::for_item(item, now)));
    buf.push_str(&format!(
        "{} {} by {} ({})\n",
        item.content_type, item.content_id, item.creator_name, item.creator_id
    ));
    if let Some(category) = &item.category {
        buf.push_str(&format!("Category: {}\n", category));
    }
    buf.push_str(&format!(
        "Created: {}\n",
        item.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    if item.is_pending() {
        let remaining = item.expires_at - now;
        if remaining > chrono::Duration::zero() {
            buf.push_str(&format!(
                "Auto-approves in {}h {}m\n",
                remaining.num_hours(),
                remaining.num_minutes() % 60
            ));
        } else {
            buf.push_str("Auto-approval deadline passed\n");
        }
    }

    buf.push('\n');
    for line in item.content.lines() {
        buf.push_str(&truncate(line, width));
        buf.push('\n');
    }
    if !item.media_urls.is_empty() {
        buf.push_str(&format!("\nMedia ({}):\n", item.media_urls.len()));
        for url in &item.media_urls {
            buf.push_str(&format!("  {}\n", truncate(url, width.saturating_sub(2))));
        }
    }

    if let (Some(by), Some(at)) = (&item.moderated_by, &item.moderated_at) {
        buf.push_str(&format!(
            "\n{} by {} at {}\n",
            item.status,
            by,
            at.format("%Y-%m-%d %H:%M UTC")
        ));
        if let Some(reason) = &item.reason {
            buf.push_str(&format!("Reason: {}\n", reason));
        }
    }
    if let Some(action) = in_flight {
        buf.push_str(&format!("\n{} in progress...\n", action));
    }

    buf
}
